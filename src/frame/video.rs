use std::ffi::CStr;
use std::fmt::Debug;

use num::{Rational32, ToPrimitive};

pub(crate) use crate::bindings::NDIlib_video_frame_v2_t as NDIRawVideoFrame;
use crate::{
    bindings,
    enums::NDIFieldedFrameMode,
    four_cc::FourCC,
    resolution::{Resolution, ResolutionError},
};

use super::{NDIFrame, RawBufferManagement, RawFrame};

impl RawBufferManagement for NDIRawVideoFrame {
    #[inline]
    unsafe fn free_with_recv(
        &mut self,
        api: &bindings::NDIlib,
        recv: bindings::NDIlib_recv_instance_t,
    ) {
        unsafe { api.NDIlib_recv_free_video_v2(recv, self) }
    }

    fn assert_unwritten(&self) {
        assert!(
            self.p_data.is_null(),
            "[Fatal FFI Error] NDIRawVideoFrame data is not null, but should be."
        );
        assert!(
            self.p_metadata.is_null(),
            "[Fatal FFI Error] NDIRawVideoFrame metadata is not null, but should be."
        );
    }
}

impl RawFrame for NDIRawVideoFrame {}

/// An empty frame descriptor for the SDK to write into
pub(crate) fn blank() -> NDIRawVideoFrame {
    NDIRawVideoFrame {
        xres: 0,
        yres: 0,
        FourCC: 0,
        frame_rate_N: 0,
        frame_rate_D: 0,
        picture_aspect_ratio: 0.0,
        frame_format_type: 0,
        timecode: 0,
        p_data: std::ptr::null_mut(),
        __bindgen_anon_1: bindings::NDIlib_video_frame_v2_t__bindgen_ty_1 {
            line_stride_in_bytes: 0,
        },
        p_metadata: std::ptr::null(),
        timestamp: 0,
    }
}

/// Borrowed description of a packed video buffer, enough to turn it into an image
#[derive(Debug, Clone, Copy)]
pub struct VideoView<'a> {
    /// Width and number of lines stored in `data`
    pub resolution: Resolution,
    pub four_cc: FourCC,
    /// Bytes from the start of one line to the start of the next
    pub line_stride: usize,
    pub data: &'a [u8],
}

/// Anything that holds received video data
pub trait VideoBuffer: Debug {
    fn view(&self) -> Result<VideoView<'_>, ResolutionError>;
}

/// Represents a received video frame.
/// C equivalent: `NDIlib_video_frame_v2_t`
pub type VideoFrame = NDIFrame<NDIRawVideoFrame>;

// Property accessors
impl VideoFrame {
    /// Gets the resolution of the frame.
    pub fn resolution(&self) -> Result<Resolution, ResolutionError> {
        Resolution::from_i32(self.raw.xres, self.raw.yres)
    }

    /// Gets the FourCC format of the frame
    pub fn four_cc(&self) -> FourCC {
        FourCC::from_ffi(self.raw.FourCC as i32)
    }

    pub fn frame_rate(&self) -> Rational32 {
        Rational32::new_raw(self.raw.frame_rate_N, self.raw.frame_rate_D)
    }

    /// Access the metadata associated with the frame if any
    pub fn metadata(&self) -> Option<&CStr> {
        if self.raw.p_metadata.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(self.raw.p_metadata) })
        }
    }

    /// gets the current field mode of the frame
    pub fn field_mode(&self) -> Option<NDIFieldedFrameMode> {
        NDIFieldedFrameMode::from_ffi(self.raw.frame_format_type)
    }

    pub fn line_stride(&self) -> usize {
        usize::try_from(unsafe { self.raw.__bindgen_anon_1.line_stride_in_bytes }).unwrap_or(0)
    }

    /// Number of lines in the buffer, a single field only holds every other line
    fn lines(&self) -> Result<usize, ResolutionError> {
        let resolution = self.resolution()?;
        if self.field_mode().is_some_and(NDIFieldedFrameMode::is_single_field) {
            Ok(resolution.y / 2)
        } else {
            Ok(resolution.y)
        }
    }

    /// Read access to the frame data (the packed plane)
    pub fn video_data(&self) -> Result<&[u8], ResolutionError> {
        if self.is_released() || self.raw.p_data.is_null() {
            return Ok(&[]);
        }
        let size = self.line_stride() * self.lines()?;
        Ok(unsafe { std::slice::from_raw_parts(self.raw.p_data, size) })
    }
}

impl VideoBuffer for VideoFrame {
    fn view(&self) -> Result<VideoView<'_>, ResolutionError> {
        Ok(VideoView {
            resolution: Resolution::new(self.resolution()?.x, self.lines()?),
            four_cc: self.four_cc(),
            line_stride: self.line_stride(),
            data: self.video_data()?,
        })
    }
}

impl Debug for VideoFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VideoFrame {{ ")?;

        write!(f, "resolution: {}x{}, ", self.raw.xres, self.raw.yres)?;

        write!(
            f,
            "frame rate: {:.2}fps, ",
            self.frame_rate().to_f64().unwrap_or(-1.)
        )?;

        write!(f, "FourCC: {:?}, ", self.four_cc())?;

        write!(f, "format: {:?}, ", self.field_mode())?;

        write!(f, "stride: {}, ", self.line_stride())?;

        write!(f, "metadata: {:?}, ", self.metadata())?;

        write!(f, "timestamp: {}, ", self.raw.timestamp)?;

        write!(f, "alloc: {:?} @ {:?} }}", self.raw.p_data, self.alloc)
    }
}
