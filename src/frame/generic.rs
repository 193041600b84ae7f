use std::sync::Arc;

use crate::receiver::ReceiverHandle;

use super::{RawFrame, drop_guard::FrameDataDropGuard};

unsafe impl<Raw: RawFrame> Send for NDIFrame<Raw> {}

/// A frame filled by a receiver
///
/// The buffer is freed exactly once, when the frame is dropped.
pub struct NDIFrame<Raw: RawFrame> {
    pub(crate) raw: Raw,
    pub(crate) alloc: FrameDataDropGuard,
}

impl<Raw: RawFrame> NDIFrame<Raw> {
    pub(crate) fn received(raw: Raw, recv: Arc<ReceiverHandle>) -> Self {
        NDIFrame {
            raw,
            alloc: FrameDataDropGuard::Receiver(recv),
        }
    }

    #[inline]
    pub fn is_released(&self) -> bool {
        self.alloc.is_released()
    }
}

impl<Raw: RawFrame> Drop for NDIFrame<Raw> {
    fn drop(&mut self) {
        self.alloc.release(&mut self.raw);
    }
}
