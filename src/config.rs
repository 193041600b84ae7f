//! Application configuration
//!
//! Everything can be set in a TOML file, every field has a default. Only the source name is required,
//! usually it is given on the command line:
//!
//! ```toml
//! source_name = "STUDIO (Camera 1)"
//!
//! [discovery]
//! extra_ips = "192.168.0.107,192.168.0.108"
//! poll_interval_ms = 1000
//!
//! [receiver]
//! color_format = "bgrx_bgra"
//! tally = { program = true, preview = false }
//!
//! [display]
//! width = 1280
//! height = 720
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    enums::{NDIBandwidthMode, NDIColorFormat},
    monitor::{MonitorSettings, RetryPolicy},
    resolution::Resolution,
    sdk::{DEFAULT_LIBRARY_NAME, DEFAULT_RUNTIME_DIR_VAR},
    tally::Tally,
    util::{SourceNameError, validate_source_name},
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Exact name of the source to show, e.g. `MACHINE (Channel)`
    pub source_name: String,
    pub runtime: RuntimeConfig,
    pub discovery: DiscoveryConfig,
    pub receiver: ReceiverConfig,
    pub display: DisplayConfig,
}

/// Where the NDI runtime library is loaded from
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Environment variable naming the runtime directory
    pub env_var: String,
    pub library_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            env_var: DEFAULT_RUNTIME_DIR_VAR.to_owned(),
            library_name: DEFAULT_LIBRARY_NAME.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub show_local_sources: bool,
    pub groups: Option<String>,
    pub extra_ips: Option<String>,
    pub poll_interval_ms: u64,
    /// None polls until the source shows up
    pub max_polls: Option<u32>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            show_local_sources: true,
            groups: None,
            extra_ips: None,
            poll_interval_ms: 1000,
            max_polls: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReceiverConfig {
    /// Name of this receiver as other NDI applications see it
    pub name: Option<String>,
    pub color_format: NDIColorFormat,
    pub bandwidth: NDIBandwidthMode,
    pub allow_fielded_video: bool,
    /// Upper bound of a single active connection check
    pub connection_timeout_ms: u64,
    /// None waits for a peer forever
    pub max_connection_checks: Option<u32>,
    pub capture_timeout_ms: u64,
    pub tally: Tally,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            name: None,
            color_format: NDIColorFormat::default(),
            bandwidth: NDIBandwidthMode::default(),
            allow_fielded_video: false,
            connection_timeout_ms: 1000,
            max_connection_checks: None,
            capture_timeout_ms: 1000,
            tally: Tally::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Defaults to `NDI <source name>`
    pub title: Option<String>,
    pub width: usize,
    pub height: usize,
    /// How long the window waits for key presses after each shown frame
    pub event_wait_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 1920,
            height: 1080,
            event_wait_ms: 1,
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("no source name given")]
    MissingSourceName,
    #[error("invalid source name")]
    InvalidSourceName(#[source] SourceNameError),
    #[error("window size {0} is empty")]
    EmptyWindow(Resolution),
    #[error("{field} must be at least 1 ms")]
    ZeroInterval { field: &'static str },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_name.is_empty() {
            return Err(ConfigError::MissingSourceName);
        }
        validate_source_name(&self.source_name).map_err(ConfigError::InvalidSourceName)?;

        // both pace an otherwise unbounded loop
        if self.discovery.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "discovery.poll_interval_ms",
            });
        }
        if self.receiver.connection_timeout_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                field: "receiver.connection_timeout_ms",
            });
        }

        let window = self.window_size();
        if window.is_empty() {
            return Err(ConfigError::EmptyWindow(window));
        }
        Ok(())
    }

    pub fn window_title(&self) -> String {
        self.display
            .title
            .clone()
            .unwrap_or_else(|| format!("NDI {}", self.source_name))
    }

    pub fn window_size(&self) -> Resolution {
        Resolution::new(self.display.width, self.display.height)
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            source_name: self.source_name.clone(),
            discovery: RetryPolicy {
                interval: Duration::from_millis(self.discovery.poll_interval_ms),
                max_attempts: self.discovery.max_polls,
            },
            connection: RetryPolicy {
                interval: Duration::from_millis(self.receiver.connection_timeout_ms),
                max_attempts: self.receiver.max_connection_checks,
            },
            capture_timeout: Duration::from_millis(self.receiver.capture_timeout_ms),
            event_wait: Duration::from_millis(self.display.event_wait_ms),
            tally: self.receiver.tally,
        }
    }
}
