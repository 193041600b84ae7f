//! The discover → connect → show pipeline
//!
//! The stages only talk to their collaborators through the traits in this module, [ndi] implements
//! them on top of the SDK wrappers.
//!
//! 1. [matcher] polls the discovery snapshot until the target name shows up and a receiver could be created
//! 2. [gate] waits until the receiver reports at least one connected peer
//! 3. [pump] captures frames and shows the video ones until cancelled

pub mod gate;
pub mod matcher;
pub mod ndi;
pub mod pump;

use std::{fmt::Debug, time::Duration};

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cancel::CancelToken,
    display::DisplaySurface,
    frame::{Frame, VideoBuffer},
    receiver::ReceiverError,
    source::NDISource,
    tally::Tally,
};

pub use gate::GateError;
pub use matcher::MatchError;
pub use pump::{FramePump, PumpError, PumpStats};

/// Snapshot based view of the sources on the network
pub trait SourceDiscovery {
    fn current_sources(&mut self) -> Vec<NDISource>;

    /// Pause between two polls, implementations may return early when the source list changes
    fn wait_for_change(&mut self, timeout: Duration);
}

/// Opens receive channels
pub trait Connector {
    type Receiver: FrameReceiver;

    fn connect(&mut self, source: &NDISource) -> Result<Self::Receiver, ReceiverError>;
}

/// An open receive channel
pub trait FrameReceiver {
    type Video: VideoBuffer;
    type Audio: Debug;
    type Metadata: Debug;

    /// Returns false if the tally could not be sent
    fn set_tally(&mut self, tally: Tally) -> bool;

    /// Number of connected peers, waits up to `timeout` for the first one
    fn connection_count(&mut self, timeout: Duration) -> Result<usize, ReceiverError>;

    fn capture(&mut self, timeout: Duration) -> Frame<Self::Video, Self::Audio, Self::Metadata>;
}

/// Fixed-interval retry without backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    /// None retries forever
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        RetryPolicy {
            interval,
            max_attempts: None,
        }
    }

    pub fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    /// Counts one more attempt, returns true once no attempt is left
    pub fn record_attempt(&self, attempts: &mut u32) -> bool {
        *attempts = attempts.saturating_add(1);
        self.exhausted(*attempts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub source_name: String,
    pub discovery: RetryPolicy,
    pub connection: RetryPolicy,
    pub capture_timeout: Duration,
    pub event_wait: Duration,
    pub tally: Tally,
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Pump(#[from] PumpError),
}

impl MonitorError {
    /// The user asked to stop while waiting, nothing failed
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            MonitorError::Match(MatchError::Cancelled) | MonitorError::Gate(GateError::Cancelled)
        )
    }

    /// A failed connection query ends the program like a cancel, after logging it
    pub fn is_clean_exit(&self) -> bool {
        self.is_cancelled() || matches!(self, MonitorError::Gate(GateError::Query(_)))
    }
}

/// Runs all three stages, returns once the pump stops
///
/// `discovery` is dropped as soon as a receiver is connected.
pub fn run<D, C, S>(
    mut discovery: D,
    mut connector: C,
    display: &mut S,
    settings: &MonitorSettings,
    cancel: &CancelToken,
) -> Result<PumpStats, MonitorError>
where
    D: SourceDiscovery,
    C: Connector,
    S: DisplaySurface,
{
    info!(source = %settings.source_name, "Searching for NDI sources...");

    let (source, mut receiver) = matcher::find_and_connect(
        &mut discovery,
        &mut connector,
        &settings.source_name,
        &settings.discovery,
        cancel,
    )?;
    drop(discovery);

    if !receiver.set_tally(settings.tally) {
        warn!(tally = ?settings.tally, "could not set tally");
    }

    let peers = gate::wait_for_peers(&mut receiver, &settings.connection, cancel)?;
    info!(%source, peers, "Reading video...");

    let stats = FramePump::new(
        &mut receiver,
        display,
        settings.capture_timeout,
        settings.event_wait,
    )
    .run(cancel)?;
    Ok(stats)
}
