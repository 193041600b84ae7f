//! Waits for the target source to show up and connects to it

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{Connector, RetryPolicy, SourceDiscovery};
use crate::{cancel::CancelToken, source::NDISource};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("cancelled while searching for the source")]
    Cancelled,
    #[error("source not found after {attempts} polls")]
    AttemptsExhausted { attempts: u32 },
}

/// First source whose name equals `target` exactly (case sensitive)
pub fn select_source<'a>(sources: &'a [NDISource], target: &str) -> Option<&'a NDISource> {
    sources.iter().find(|source| source.name() == target)
}

/// Polls `discovery` until a receiver for `target` could be created
///
/// Every poll tries at most one connection. A failed connection is logged and the next poll retries,
/// a poll without a match just waits for the next one.
pub fn find_and_connect<D, C>(
    discovery: &mut D,
    connector: &mut C,
    target: &str,
    policy: &RetryPolicy,
    cancel: &CancelToken,
) -> Result<(NDISource, C::Receiver), MatchError>
where
    D: SourceDiscovery,
    C: Connector,
{
    let mut attempts = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(MatchError::Cancelled);
        }

        let sources = discovery.current_sources();
        for source in &sources {
            debug!(%source, "found source");
        }

        if let Some(source) = select_source(&sources, target) {
            info!(%source, "connecting");
            match connector.connect(source) {
                Ok(receiver) => return Ok((source.clone(), receiver)),
                Err(err) => warn!(%source, %err, "could not connect, retrying"),
            }
        }

        if policy.record_attempt(&mut attempts) {
            return Err(MatchError::AttemptsExhausted { attempts });
        }
        discovery.wait_for_change(policy.interval);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fakes::{EventLog, FakeConnector, FakeDiscovery};

    fn policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::ZERO,
            max_attempts,
        }
    }

    #[test]
    fn test_select_exact_name() {
        let sources = [
            NDISource::with_address("target", "1.1.1.1").unwrap(),
            NDISource::with_address("Target (2)", "2.2.2.2").unwrap(),
            NDISource::with_address("Target", "3.3.3.3").unwrap(),
            NDISource::with_address("Target", "4.4.4.4").unwrap(),
        ];
        let selected = select_source(&sources, "Target").unwrap();
        assert_eq!(selected.address(), Some("3.3.3.3"));
        assert!(select_source(&sources, "Targe").is_none());
        assert!(select_source(&[], "Target").is_none());
    }

    #[test]
    fn test_connects_to_matching_address() {
        let log = EventLog::default();
        let mut discovery =
            FakeDiscovery::new(&log, vec![vec![("A", "1.2.3.4"), ("Target", "5.6.7.8")]]);
        let mut connector = FakeConnector::new(&log, vec![true], vec![], vec![]);

        let (source, _receiver) = find_and_connect(
            &mut discovery,
            &mut connector,
            "Target",
            &policy(None),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(source.address(), Some("5.6.7.8"));
        assert_eq!(
            log.connect_attempts(),
            [("Target".to_owned(), Some("5.6.7.8".to_owned()))]
        );
    }

    #[test]
    fn test_never_connects_without_match() {
        let log = EventLog::default();
        let mut discovery = FakeDiscovery::new(
            &log,
            vec![vec![], vec![("A", "1.2.3.4")], vec![("target", "5.6.7.8")]],
        );
        let mut connector = FakeConnector::new(&log, vec![], vec![], vec![]);

        let err = find_and_connect(
            &mut discovery,
            &mut connector,
            "Target",
            &policy(Some(5)),
            &CancelToken::new(),
        )
        .unwrap_err();

        assert!(matches!(err, MatchError::AttemptsExhausted { attempts: 5 }));
        assert!(log.connect_attempts().is_empty());
        assert_eq!(log.polls(), 5);
    }

    #[test]
    fn test_retries_after_failed_connect() {
        let log = EventLog::default();
        let mut discovery = FakeDiscovery::new(
            &log,
            vec![
                vec![("Target", "5.6.7.8")],
                vec![],
                vec![("Target", "5.6.7.9")],
                vec![("Target", "5.6.7.9")],
            ],
        );
        let mut connector = FakeConnector::new(&log, vec![false, false, true], vec![], vec![]);

        let (source, _receiver) = find_and_connect(
            &mut discovery,
            &mut connector,
            "Target",
            &policy(None),
            &CancelToken::new(),
        )
        .unwrap();

        // one attempt per poll that saw the source, none for the empty poll
        assert_eq!(log.polls(), 4);
        let addresses: Vec<_> = log
            .connect_attempts()
            .into_iter()
            .map(|(_, address)| address.unwrap())
            .collect();
        assert_eq!(addresses, ["5.6.7.8", "5.6.7.9", "5.6.7.9"]);
        assert_eq!(source.address(), Some("5.6.7.9"));
    }

    #[test]
    fn test_cancel_stops_polling() {
        let log = EventLog::default();
        let mut discovery = FakeDiscovery::new(&log, vec![vec![("Target", "5.6.7.8")]]);
        let mut connector = FakeConnector::new(&log, vec![], vec![], vec![]);
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = find_and_connect(
            &mut discovery,
            &mut connector,
            "Target",
            &policy(None),
            &cancel,
        )
        .unwrap_err();

        assert!(matches!(err, MatchError::Cancelled));
        assert_eq!(log.polls(), 0);
    }
}
