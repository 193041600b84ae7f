use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Deserialize;

use crate::bindings::{
    self, NDIlib_frame_format_type_e, NDIlib_recv_bandwidth_e, NDIlib_recv_color_format_e,
};

/// Pixel formats the receiver asks the SDK to deliver
///
/// C equivalent: `NDIlib_recv_color_format_e`
#[repr(i32)]
#[non_exhaustive]
#[allow(non_camel_case_types)]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Deserialize,
)]
pub enum NDIColorFormat {
    #[serde(rename = "fastest")]
    Fastest = bindings::NDIlib_recv_color_format_e_NDIlib_recv_color_format_fastest as i32,
    #[serde(rename = "best")]
    Best = bindings::NDIlib_recv_color_format_e_NDIlib_recv_color_format_best as i32,

    #[default]
    #[serde(rename = "bgrx_bgra")]
    BGRX_BGRA = bindings::NDIlib_recv_color_format_e_NDIlib_recv_color_format_BGRX_BGRA as i32,
    #[serde(rename = "uyvy_bgra")]
    UYVY_BGRA = bindings::NDIlib_recv_color_format_e_NDIlib_recv_color_format_UYVY_BGRA as i32,
    #[serde(rename = "rgbx_rgba")]
    RGBX_RGBA = bindings::NDIlib_recv_color_format_e_NDIlib_recv_color_format_RGBX_RGBA as i32,
    #[serde(rename = "uyvy_rgba")]
    UYVY_RGBA = bindings::NDIlib_recv_color_format_e_NDIlib_recv_color_format_UYVY_RGBA as i32,
}

impl NDIColorFormat {
    pub fn to_ffi(self) -> NDIlib_recv_color_format_e {
        i32::from(self) as NDIlib_recv_color_format_e
    }
}

#[repr(i32)]
#[non_exhaustive]
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum NDIBandwidthMode {
    #[default]
    Default = bindings::NDIlib_recv_bandwidth_e_NDIlib_recv_bandwidth_highest as i32,
    Preview = bindings::NDIlib_recv_bandwidth_e_NDIlib_recv_bandwidth_lowest as i32,
    AudioOnly = bindings::NDIlib_recv_bandwidth_e_NDIlib_recv_bandwidth_audio_only as i32,
    MetadataOnly = bindings::NDIlib_recv_bandwidth_e_NDIlib_recv_bandwidth_metadata_only as i32,
}

impl NDIBandwidthMode {
    pub fn to_ffi(self) -> NDIlib_recv_bandwidth_e {
        i32::from(self) as NDIlib_recv_bandwidth_e
    }
}

#[repr(i32)]
#[non_exhaustive]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum NDIFieldedFrameMode {
    #[default]
    Progressive =
        bindings::NDIlib_frame_format_type_e_NDIlib_frame_format_type_progressive as i32,
    /// This is a frame of video that is comprised of two fields.
    /// The upper field comes first, and the lower comes second
    Interleaved =
        bindings::NDIlib_frame_format_type_e_NDIlib_frame_format_type_interleaved as i32,
    /// This is an individual field 0 from a fielded video frame. This is the first temporal, upper field
    Field0 = bindings::NDIlib_frame_format_type_e_NDIlib_frame_format_type_field_0 as i32,
    /// This is an individual field 1 from a fielded video frame. This is the second temporal, lower field
    Field1 = bindings::NDIlib_frame_format_type_e_NDIlib_frame_format_type_field_1 as i32,
}

impl NDIFieldedFrameMode {
    pub fn from_ffi(value: NDIlib_frame_format_type_e) -> Option<Self> {
        Self::try_from_primitive(value as i32).ok()
    }

    /// Single fields carry half the lines of the full frame
    pub fn is_single_field(self) -> bool {
        matches!(self, NDIFieldedFrameMode::Field0 | NDIFieldedFrameMode::Field1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Settings {
        color_format: NDIColorFormat,
        bandwidth: NDIBandwidthMode,
    }

    #[test]
    fn test_deserialize_settings() {
        let settings: Settings =
            toml::from_str("color_format = \"uyvy_bgra\"\nbandwidth = \"audio_only\"").unwrap();
        assert_eq!(settings.color_format, NDIColorFormat::UYVY_BGRA);
        assert_eq!(settings.bandwidth, NDIBandwidthMode::AudioOnly);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(NDIColorFormat::default(), NDIColorFormat::BGRX_BGRA);
        assert_eq!(NDIBandwidthMode::default(), NDIBandwidthMode::Default);
        assert!(NDIFieldedFrameMode::Field1.is_single_field());
        assert!(!NDIFieldedFrameMode::Interleaved.is_single_field());
    }
}
