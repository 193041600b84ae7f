//! FourCC (Four Character Code) is a sequence of four bytes used to uniquely identify data formats.
//!
//! https://docs.ndi.video/all/developing-with-ndi/sdk/frame-types#video-frames-ndilib_video_frame_v2_t
//! https://en.wikipedia.org/wiki/FourCC

use std::fmt::{Debug, Display};

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::bindings;

/// Possible FourCC values for video frames.
///
/// The SDK enum is unsigned on some platforms, every code fits into an i32.
#[repr(i32)]
#[non_exhaustive]
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum FourCCVideo {
    UYVY = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_UYVY as i32,
    UYVA = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_UYVA as i32,
    P216 = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_P216 as i32,
    PA16 = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_PA16 as i32,
    YV12 = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_YV12 as i32,
    I420 = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_I420 as i32,
    NV12 = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_NV12 as i32,
    /// Red, Green, Blue, Alpha (8bit)
    RGBA = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_RGBA as i32,
    /// RGBA with ignored alpha channel
    RGBX = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_RGBX as i32,
    /// Blue, Green, Red, Alpha (8bit)
    BGRA = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_BGRA as i32,
    /// BGRA with ignored alpha channel
    BGRX = bindings::NDIlib_FourCC_video_type_e_NDIlib_FourCC_video_type_BGRX as i32,
}

impl FourCCVideo {
    pub fn from_ffi(value: i32) -> Option<Self> {
        Self::try_from_primitive(value).ok()
    }

    /// Bytes per pixel of the packed formats, None for planar ones
    pub const fn pixel_stride(self) -> Option<usize> {
        use FourCCVideo::*;
        match self {
            UYVY => Some(2),
            BGRA | BGRX | RGBA | RGBX => Some(4),
            _ => None,
        }
    }
}

/// Represents a generic FourCC code.
#[repr(transparent)]
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct FourCC {
    // use anything with 32bit, using signed reduces the number of casts
    code: i32,
}

impl FourCC {
    /// Creates a new FourCC from an i32 code.
    pub fn from_ffi(code: i32) -> Self {
        FourCC { code }
    }

    /// Attempts to convert the FourCC to a FourCCVideo.
    pub fn as_video(&self) -> Option<FourCCVideo> {
        FourCCVideo::from_ffi(self.code)
    }
}

impl Display for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes: [u8; 4] = self.code.to_le_bytes();

        let ascii = String::from_utf8_lossy(&bytes);

        write!(f, "{}", ascii)
    }
}

impl Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FourCC({})", self)
    }
}

impl From<FourCCVideo> for FourCC {
    fn from(value: FourCCVideo) -> Self {
        FourCC { code: value.into() }
    }
}
