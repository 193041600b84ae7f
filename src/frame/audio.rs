use std::ffi::CStr;
use std::fmt::Debug;

pub(crate) use crate::bindings::NDIlib_audio_frame_v3_t as NDIRawAudioFrame;
use crate::{bindings, four_cc::FourCC};

use super::{NDIFrame, RawBufferManagement, RawFrame};

impl RawBufferManagement for NDIRawAudioFrame {
    #[inline]
    unsafe fn free_with_recv(
        &mut self,
        api: &bindings::NDIlib,
        recv: bindings::NDIlib_recv_instance_t,
    ) {
        unsafe { api.NDIlib_recv_free_audio_v3(recv, self) }
    }

    fn assert_unwritten(&self) {
        assert!(
            self.p_data.is_null(),
            "[Fatal FFI Error] NDIRawAudioFrame data is not null, but should be."
        );
        assert!(
            self.p_metadata.is_null(),
            "[Fatal FFI Error] NDIRawAudioFrame metadata is not null, but should be."
        );
    }
}

impl RawFrame for NDIRawAudioFrame {}

pub(crate) fn blank() -> NDIRawAudioFrame {
    NDIRawAudioFrame {
        sample_rate: 0,
        no_channels: 0,
        no_samples: 0,
        timecode: 0,
        FourCC: 0,
        p_data: std::ptr::null_mut(),
        __bindgen_anon_1: bindings::NDIlib_audio_frame_v3_t__bindgen_ty_1 {
            channel_stride_in_bytes: 0,
        },
        p_metadata: std::ptr::null(),
        timestamp: 0,
    }
}

/// Represents a received audio frame.
/// C equivalent: `NDIlib_audio_frame_v3_t`
pub type AudioFrame = NDIFrame<NDIRawAudioFrame>;

impl AudioFrame {
    pub fn four_cc(&self) -> FourCC {
        FourCC::from_ffi(self.raw.FourCC as i32)
    }

    pub fn metadata(&self) -> Option<&CStr> {
        if self.raw.p_metadata.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(self.raw.p_metadata) })
        }
    }
}

impl Debug for AudioFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioFrame")
            .field("sample_rate", &self.raw.sample_rate)
            .field("channels", &self.raw.no_channels)
            .field("samples", &self.raw.no_samples)
            .field("four_cc", &self.four_cc())
            .field("metadata", &self.metadata())
            .field("timestamp", &self.raw.timestamp)
            .field("alloc", &self.alloc)
            .finish()
    }
}
