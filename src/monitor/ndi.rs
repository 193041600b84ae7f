//! The monitor traits on top of the NDI SDK wrappers

use std::time::Duration;

use tracing::debug;

use super::{Connector, FrameReceiver, SourceDiscovery};
use crate::{
    config::ReceiverConfig,
    find::NDISourceFinder,
    frame::{AudioFrame, MetadataFrame, VideoFrame},
    receiver::{NDIReceiver, NDIReceiverBuilder, ReceivedFrame, ReceiverError},
    sdk::NDIRuntime,
    source::NDISource,
    tally::Tally,
};

impl SourceDiscovery for NDISourceFinder {
    fn current_sources(&mut self) -> Vec<NDISource> {
        NDISourceFinder::current_sources(self)
    }

    fn wait_for_change(&mut self, timeout: Duration) {
        if NDISourceFinder::wait_for_change(self, timeout).value_updated() {
            debug!("source list changed");
        }
    }
}

/// Creates receivers with the configured options
#[derive(Debug)]
pub struct NDIConnector {
    runtime: NDIRuntime,
    config: ReceiverConfig,
}

impl NDIConnector {
    pub fn new(runtime: &NDIRuntime, config: ReceiverConfig) -> Self {
        NDIConnector {
            runtime: runtime.clone(),
            config,
        }
    }
}

impl Connector for NDIConnector {
    type Receiver = NDIReceiver;

    fn connect(&mut self, source: &NDISource) -> Result<NDIReceiver, ReceiverError> {
        NDIReceiverBuilder::new(source.clone())
            .name(self.config.name.clone())
            .color_format(self.config.color_format)
            .bandwidth(self.config.bandwidth)
            .allow_fielded_video(self.config.allow_fielded_video)
            .build(&self.runtime)
    }
}

impl FrameReceiver for NDIReceiver {
    type Video = VideoFrame;
    type Audio = AudioFrame;
    type Metadata = MetadataFrame;

    fn set_tally(&mut self, tally: Tally) -> bool {
        NDIReceiver::set_tally(self, tally)
    }

    fn connection_count(&mut self, timeout: Duration) -> Result<usize, ReceiverError> {
        Ok(self.wait_for_connections(timeout)?.value)
    }

    fn capture(&mut self, timeout: Duration) -> ReceivedFrame {
        NDIReceiver::capture(self, timeout)
    }
}
