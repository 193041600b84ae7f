//! Capture loop of a connected receiver

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::FrameReceiver;
use crate::{
    cancel::CancelToken,
    display::{DisplayError, DisplaySurface, QUIT_KEYS},
    frame::{Frame, FrameKind, VideoBuffer},
    resolution::ResolutionError,
};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PumpError {
    #[error("invalid video frame")]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Number of captures per frame type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub video: u64,
    pub audio: u64,
    pub metadata: u64,
    pub status_changes: u64,
    pub empty: u64,
    pub unknown: u64,
}

impl PumpStats {
    fn record(&mut self, kind: FrameKind) {
        let counter = match kind {
            FrameKind::Video => &mut self.video,
            FrameKind::Audio => &mut self.audio,
            FrameKind::Metadata => &mut self.metadata,
            FrameKind::StatusChange => &mut self.status_changes,
            FrameKind::None => &mut self.empty,
            FrameKind::Unknown => &mut self.unknown,
        };
        *counter += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpControl {
    Continue,
    /// A quit key was pressed in the display
    Quit,
}

/// Moves frames from a receiver to a display
///
/// Every captured buffer is dropped, and thereby released, at the end of the step that captured it,
/// also when showing it failed.
pub struct FramePump<'a, R, S> {
    receiver: &'a mut R,
    display: &'a mut S,
    capture_timeout: Duration,
    event_wait: Duration,
    stats: PumpStats,
}

impl<'a, R, S> FramePump<'a, R, S>
where
    R: FrameReceiver,
    S: DisplaySurface,
{
    pub fn new(
        receiver: &'a mut R,
        display: &'a mut S,
        capture_timeout: Duration,
        event_wait: Duration,
    ) -> Self {
        FramePump {
            receiver,
            display,
            capture_timeout,
            event_wait,
            stats: PumpStats::default(),
        }
    }

    pub fn stats(&self) -> PumpStats {
        self.stats
    }

    /// Captures and handles a single frame
    pub fn step(&mut self) -> Result<PumpControl, PumpError> {
        let frame = self.receiver.capture(self.capture_timeout);
        self.stats.record(frame.kind());

        match frame {
            Frame::Video(video) => return self.present(&video),
            Frame::Audio(audio) => debug!(?audio, "audio frame"),
            Frame::Metadata(metadata) => debug!(?metadata, "metadata frame"),
            Frame::StatusChange => info!("source status changed"),
            Frame::None => debug!("no frame"),
            Frame::Unknown(frame_type) => warn!(frame_type, "unknown frame type"),
        }
        Ok(PumpControl::Continue)
    }

    fn present(&mut self, video: &R::Video) -> Result<PumpControl, PumpError> {
        let view = video.view()?;
        let image = self.display.decode(&view)?;
        self.display.show(&image)?;

        match self.display.pump_events(self.event_wait)? {
            Some(key) if QUIT_KEYS.contains(&key) => {
                info!(key, "quit key pressed");
                Ok(PumpControl::Quit)
            }
            _ => Ok(PumpControl::Continue),
        }
    }

    /// Steps until cancelled or a quit key is pressed
    pub fn run(mut self, cancel: &CancelToken) -> Result<PumpStats, PumpError> {
        while !cancel.is_cancelled() {
            if self.step()? == PumpControl::Quit {
                break;
            }
        }
        Ok(self.stats)
    }
}
