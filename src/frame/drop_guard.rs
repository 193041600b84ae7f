use std::fmt::Debug;
use std::sync::Arc;

use crate::receiver::ReceiverHandle;

use super::RawFrame;

/// Tracks who has to free the buffer of a frame
///
/// The guard keeps the receiver alive, so it cannot be destroyed while one of its frames is still around.
pub(crate) enum FrameDataDropGuard {
    /// Nothing left to free
    Released,
    /// The buffer was written by this receiver and has to be freed by it
    Receiver(Arc<ReceiverHandle>),
}

impl Debug for FrameDataDropGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Released => write!(f, "Released"),
            Self::Receiver(recv) => f.debug_tuple("Receiver").field(&recv.raw()).finish(),
        }
    }
}

impl FrameDataDropGuard {
    #[inline]
    pub fn is_released(&self) -> bool {
        matches!(self, FrameDataDropGuard::Released)
    }

    /// Frees the buffer if it is still held, afterwards the guard is [FrameDataDropGuard::Released]
    pub fn release(&mut self, raw: &mut impl RawFrame) {
        if let FrameDataDropGuard::Receiver(recv) =
            std::mem::replace(self, FrameDataDropGuard::Released)
        {
            unsafe { raw.free_with_recv(recv.api(), recv.raw()) }
        }
    }
}
