//! Holds the pipeline back until the receiver has a peer

use thiserror::Error;
use tracing::debug;

use super::{FrameReceiver, RetryPolicy};
use crate::{cancel::CancelToken, receiver::ReceiverError};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GateError {
    #[error("could not query connections")]
    Query(#[source] ReceiverError),
    #[error("cancelled while waiting for a connection")]
    Cancelled,
    #[error("no peer connected after {attempts} checks")]
    AttemptsExhausted { attempts: u32 },
}

/// Queries the connection count until it is non-zero and returns it
///
/// Each query waits up to `policy.interval`, so a peer that connects in between is noticed right away.
pub fn wait_for_peers<R: FrameReceiver>(
    receiver: &mut R,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<usize, GateError> {
    let mut attempts = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(GateError::Cancelled);
        }

        let peers = receiver
            .connection_count(policy.interval)
            .map_err(GateError::Query)?;
        if peers > 0 {
            return Ok(peers);
        }
        debug!("no connections yet");

        if policy.record_attempt(&mut attempts) {
            return Err(GateError::AttemptsExhausted { attempts });
        }
    }
}
