//! NDI receiver
//!
//! A receiver is connected to exactly one source and pulls video, audio and metadata frames from it.
//!
//! <https://docs.ndi.video/all/developing-with-ndi/sdk/ndi-recv>

#![allow(non_upper_case_globals)]

use std::{
    ffi::NulError,
    sync::Arc,
    thread::sleep,
    time::{Duration, Instant},
};

use thiserror::Error;

use crate::{
    bindings,
    blocking_update::BlockingUpdate,
    enums::{NDIBandwidthMode, NDIColorFormat},
    frame::{AudioFrame, Frame, MetadataFrame, NDIFrame, VideoFrame, audio, metadata, video},
    sdk::NDIRuntime,
    source::NDISource,
    tally::Tally,
    util::{duration_to_ms, optional_c_string},
};

#[cfg(any(debug_assertions, feature = "strict_assertions"))]
use crate::frame::RawBufferManagement;

/// Granularity of [NDIReceiver::wait_for_connections], the SDK has no blocking variant
const CONNECTION_POLL_STEP: Duration = Duration::from_millis(10);

/// A frame captured by an [NDIReceiver]
pub type ReceivedFrame = Frame<VideoFrame, AudioFrame, MetadataFrame>;

/// Builder for an [NDIReceiver] connected to `source`
#[derive(Debug, Clone)]
pub struct NDIReceiverBuilder {
    pub source: NDISource,
    pub name: Option<String>,
    pub color_format: NDIColorFormat,
    pub bandwidth: NDIBandwidthMode,
    pub allow_fielded_video: bool,
}

impl NDIReceiverBuilder {
    pub fn new(source: NDISource) -> Self {
        Self {
            source,
            name: None,
            color_format: NDIColorFormat::default(),
            bandwidth: NDIBandwidthMode::default(),
            allow_fielded_video: false,
        }
    }

    /// Name of the receiver as shown to other NDI applications
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn color_format(mut self, color_format: NDIColorFormat) -> Self {
        self.color_format = color_format;
        self
    }

    pub fn bandwidth(mut self, bandwidth: NDIBandwidthMode) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn allow_fielded_video(mut self, allow: bool) -> Self {
        self.allow_fielded_video = allow;
        self
    }

    pub fn build(self, runtime: &NDIRuntime) -> Result<NDIReceiver, ReceiverError> {
        let name = optional_c_string(self.name.as_deref()).map_err(ReceiverError::InvalidName)?;

        let handle = self.source.with_descriptor(|descriptor| {
            let options = bindings::NDIlib_recv_create_v3_t {
                source_to_connect_to: *descriptor,
                color_format: self.color_format.to_ffi(),
                bandwidth: self.bandwidth.to_ffi(),
                allow_video_fields: self.allow_fielded_video,
                p_ndi_recv_name: name
                    .as_ref()
                    .map(|s| s.as_ptr())
                    .unwrap_or(std::ptr::null()),
            };

            unsafe { runtime.api().NDIlib_recv_create_v3(&options) }
        });

        if handle.is_null() {
            Err(ReceiverError::CreateFailed {
                source_name: self.source.name().to_owned(),
            })
        } else {
            Ok(NDIReceiver {
                handle: Arc::new(ReceiverHandle {
                    runtime: runtime.clone(),
                    handle,
                }),
            })
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("receiver name contains a nul character")]
    InvalidName(#[source] NulError),
    #[error("the NDI runtime could not create a receiver for {source_name:?}")]
    CreateFailed { source_name: String },
    #[error("active connection query returned {0}")]
    ConnectionQuery(i32),
}

/// Owns the SDK receiver instance, shared with every frame it produced
pub(crate) struct ReceiverHandle {
    runtime: NDIRuntime,
    handle: bindings::NDIlib_recv_instance_t,
}
unsafe impl Send for ReceiverHandle {}
unsafe impl Sync for ReceiverHandle {}

impl ReceiverHandle {
    pub(crate) fn api(&self) -> &bindings::NDIlib {
        self.runtime.api()
    }

    pub(crate) fn raw(&self) -> bindings::NDIlib_recv_instance_t {
        self.handle
    }
}

impl Drop for ReceiverHandle {
    fn drop(&mut self) {
        unsafe { self.runtime.api().NDIlib_recv_destroy(self.handle) };
    }
}

/// Connection to one NDI source
///
/// C equivalent: `NDIlib_recv_instance_t`
pub struct NDIReceiver {
    handle: Arc<ReceiverHandle>,
}

impl std::fmt::Debug for NDIReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NDIReceiver").field(&self.handle.raw()).finish()
    }
}

impl NDIReceiver {
    /// Number of peers currently connected to this receiver
    pub fn connection_count(&self) -> Result<usize, ReceiverError> {
        let count = unsafe { self.handle.api().NDIlib_recv_get_no_connections(self.handle.raw()) };
        usize::try_from(count).map_err(|_| ReceiverError::ConnectionQuery(count))
    }

    /// Blocks until at least one peer is connected or the timeout is reached
    pub fn wait_for_connections(
        &self,
        timeout: Duration,
    ) -> Result<BlockingUpdate<usize>, ReceiverError> {
        let deadline = Instant::now() + timeout;
        loop {
            let count = self.connection_count()?;
            if count > 0 {
                return Ok(BlockingUpdate::new(count, true));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(BlockingUpdate::new(0, false));
            }
            sleep(CONNECTION_POLL_STEP.min(deadline - now));
        }
    }

    /// Tells the source whether it is on program/preview.
    /// Returns false if the SDK rejected the update
    pub fn set_tally(&self, tally: Tally) -> bool {
        let tally = tally.to_ffi();
        unsafe { self.handle.api().NDIlib_recv_set_tally(self.handle.raw(), &tally) }
    }

    /// Waits up to `timeout` for the next frame of any type
    pub fn capture(&self, timeout: Duration) -> ReceivedFrame {
        let mut video = video::blank();
        let mut audio = audio::blank();
        let mut meta = metadata::blank();

        let recv_type = unsafe {
            self.handle.api().NDIlib_recv_capture_v3(
                self.handle.raw(),
                &mut video,
                &mut audio,
                &mut meta,
                duration_to_ms(timeout),
            )
        };

        match recv_type {
            bindings::NDIlib_frame_type_e_NDIlib_frame_type_video => {
                #[cfg(any(debug_assertions, feature = "strict_assertions"))]
                {
                    audio.assert_unwritten();
                    meta.assert_unwritten();
                }

                Frame::Video(NDIFrame::received(video, self.handle.clone()))
            }
            bindings::NDIlib_frame_type_e_NDIlib_frame_type_audio => {
                #[cfg(any(debug_assertions, feature = "strict_assertions"))]
                {
                    video.assert_unwritten();
                    meta.assert_unwritten();
                }

                Frame::Audio(NDIFrame::received(audio, self.handle.clone()))
            }
            bindings::NDIlib_frame_type_e_NDIlib_frame_type_metadata => {
                #[cfg(any(debug_assertions, feature = "strict_assertions"))]
                {
                    video.assert_unwritten();
                    audio.assert_unwritten();
                }

                Frame::Metadata(NDIFrame::received(meta, self.handle.clone()))
            }
            bindings::NDIlib_frame_type_e_NDIlib_frame_type_status_change => {
                #[cfg(any(debug_assertions, feature = "strict_assertions"))]
                {
                    video.assert_unwritten();
                    audio.assert_unwritten();
                    meta.assert_unwritten();
                }

                Frame::StatusChange
            }
            bindings::NDIlib_frame_type_e_NDIlib_frame_type_none => {
                #[cfg(any(debug_assertions, feature = "strict_assertions"))]
                {
                    video.assert_unwritten();
                    audio.assert_unwritten();
                    meta.assert_unwritten();
                }

                Frame::None
            }
            other => Frame::Unknown(other as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_source() {
        let source = NDISource::with_address("STUDIO (Camera 1)", "192.168.0.107:5961").unwrap();
        let builder = NDIReceiverBuilder::new(source.clone())
            .name(Some("Monitor".to_owned()))
            .bandwidth(NDIBandwidthMode::Preview);

        assert_eq!(builder.source, source);
        assert_eq!(builder.name.as_deref(), Some("Monitor"));
        assert_eq!(builder.color_format, NDIColorFormat::BGRX_BGRA);
        assert_eq!(builder.bandwidth, NDIBandwidthMode::Preview);
        assert!(!builder.allow_fielded_video);
    }

    #[test]
    fn test_create_failure_names_source() {
        let err = ReceiverError::CreateFailed {
            source_name: "STUDIO (Camera 1)".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "the NDI runtime could not create a receiver for \"STUDIO (Camera 1)\""
        );
    }
}
