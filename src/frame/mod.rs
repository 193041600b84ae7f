//! Captured units of data
//!
//! Every capture yields exactly one [Frame]. The data-bearing variants own a buffer that was
//! allocated by the SDK, it is handed back to the receiver that produced it when the frame is dropped.

pub mod audio;
pub(crate) mod drop_guard;
pub mod generic;
pub mod metadata;
pub mod video;

use crate::bindings;

pub use audio::AudioFrame;
pub use generic::NDIFrame;
pub use metadata::MetadataFrame;
pub use video::{VideoFrame, VideoView};

/// One unit of data returned by a capture call
#[derive(Debug)]
pub enum Frame<V, A, M> {
    Video(V),
    Audio(A),
    Metadata(M),
    /// The source changed some of its settings (tally, PTZ, ...), no data attached
    StatusChange,
    /// Nothing arrived within the timeout
    None,
    /// The SDK returned a frame type this crate does not know about
    Unknown(i64),
}

impl<V, A, M> Frame<V, A, M> {
    pub fn kind(&self) -> FrameKind {
        match self {
            Frame::Video(_) => FrameKind::Video,
            Frame::Audio(_) => FrameKind::Audio,
            Frame::Metadata(_) => FrameKind::Metadata,
            Frame::StatusChange => FrameKind::StatusChange,
            Frame::None => FrameKind::None,
            Frame::Unknown(_) => FrameKind::Unknown,
        }
    }
}

/// Discriminator of a [Frame]
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(test, derive(strum::EnumIter))]
pub enum FrameKind {
    Video,
    Audio,
    Metadata,
    StatusChange,
    None,
    Unknown,
}

#[allow(private_bounds)]
pub trait RawFrame: RawBufferManagement {}

pub(crate) trait RawBufferManagement {
    /// Hands the buffer back to the receiver that filled it
    ///
    /// # Safety
    ///
    /// Must be called at most once per capture, with the receiver that filled the frame.
    unsafe fn free_with_recv(
        &mut self,
        api: &bindings::NDIlib,
        recv: bindings::NDIlib_recv_instance_t,
    );
    /// A frame the SDK did not report must not have been written to
    fn assert_unwritten(&self);
}
