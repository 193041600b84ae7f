use std::ffi::CStr;
use std::fmt::Debug;

use crate::bindings;
pub(crate) use crate::bindings::NDIlib_metadata_frame_t as NDIRawMetadataFrame;

use super::{NDIFrame, RawBufferManagement, RawFrame};

impl RawBufferManagement for NDIRawMetadataFrame {
    #[inline]
    unsafe fn free_with_recv(
        &mut self,
        api: &bindings::NDIlib,
        recv: bindings::NDIlib_recv_instance_t,
    ) {
        unsafe { api.NDIlib_recv_free_metadata(recv, self) }
    }

    fn assert_unwritten(&self) {
        assert!(
            self.p_data.is_null(),
            "NDIRawMetadataFrame data is not null, but should be. This is a bug, most likely due to an FFI contract violation."
        );
    }
}

impl RawFrame for NDIRawMetadataFrame {}

pub(crate) fn blank() -> NDIRawMetadataFrame {
    NDIRawMetadataFrame {
        length: 0,
        timecode: 0,
        p_data: std::ptr::null_mut(),
    }
}

/// Represents a received metadata frame, usually an XML snippet.
/// C equivalent: `NDIlib_metadata_frame_t`
pub type MetadataFrame = NDIFrame<NDIRawMetadataFrame>;

impl MetadataFrame {
    pub fn text(&self) -> Option<&CStr> {
        if self.raw.p_data.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(self.raw.p_data) })
        }
    }
}

impl Debug for MetadataFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataFrame")
            .field("length", &self.raw.length)
            .field("text", &self.text())
            .field("alloc", &self.alloc)
            .finish()
    }
}
