//! NDI source finder
//!
//! This is provided to locate sources available on the network and is normally used in conjunction with **NDI-Receive**.
//! Internally, it uses a cross-process P2P mDNS implementation to locate sources on the network.
//! (It commonly takes a few seconds to locate all the sources available since this requires other running machines to send response messages.)
//!
//! Be aware that some network routers might block mDNS traffic between network segments,
//! sources behind them can still be found by listing their IPs in `extra_ips`.
//!
//! <https://docs.ndi.video/all/developing-with-ndi/sdk/ndi-find>

use core::slice;
use std::{ffi::NulError, ptr, time::Duration};

use thiserror::Error;
use tracing::warn;

use crate::{
    bindings, blocking_update::BlockingUpdate, sdk::NDIRuntime, source::NDISource,
    util::{duration_to_ms, optional_c_string},
};

/// Builder for [NDISourceFinder]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct NDISourceFinderBuilder {
    show_local_sources: bool,
    groups: Option<String>,
    extra_ips: Option<String>,
}

impl Default for NDISourceFinderBuilder {
    fn default() -> Self {
        Self {
            show_local_sources: true,
            groups: None,
            extra_ips: None,
        }
    }
}

impl NDISourceFinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show sources from this device (default: true)
    pub fn show_local_sources(mut self, show: bool) -> Self {
        self.show_local_sources = show;
        self
    }

    /// Comma separated list of groups to search, None searches the default group
    pub fn groups(mut self, groups: Option<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Comma separated list of IPs that are queried directly, in addition to mDNS
    pub fn extra_ips(mut self, extra_ips: Option<String>) -> Self {
        self.extra_ips = extra_ips;
        self
    }

    pub fn build(self, runtime: &NDIRuntime) -> Result<NDISourceFinder, FinderError> {
        let groups = optional_c_string(self.groups.as_deref()).map_err(FinderError::InvalidGroups)?;
        let extra_ips =
            optional_c_string(self.extra_ips.as_deref()).map_err(FinderError::InvalidExtraIps)?;

        // the strings only need to outlive the create call
        let options = bindings::NDIlib_find_create_t {
            show_local_sources: self.show_local_sources,
            p_groups: groups.as_ref().map(|s| s.as_ptr()).unwrap_or(ptr::null()),
            p_extra_ips: extra_ips.as_ref().map(|s| s.as_ptr()).unwrap_or(ptr::null()),
        };
        let handle = unsafe { runtime.api().NDIlib_find_create_v2(&options) };
        if handle.is_null() {
            Err(FinderError::CreateFailed)
        } else {
            Ok(NDISourceFinder {
                runtime: runtime.clone(),
                handle,
            })
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("group list contains a nul character")]
    InvalidGroups(#[source] NulError),
    #[error("extra IP list contains a nul character")]
    InvalidExtraIps(#[source] NulError),
    #[error("could not create finder")]
    CreateFailed,
}

/// NDI Source finder
///
/// For more information see module docs
///
/// C equivalent: `NDIlib_find_instance_t`
#[derive(Debug)]
pub struct NDISourceFinder {
    runtime: NDIRuntime,
    handle: bindings::NDIlib_find_instance_t,
}

impl NDISourceFinder {
    /// Returns the sources currently known to this device
    pub fn current_sources(&mut self) -> Vec<NDISource> {
        let mut num_sources = 0u32;

        // SDK Docs: The pointer returned by NDIlib_find_get_current_sources is owned by the finder instance, so there is no reason to free it. It will be retained until the next call to NDIlib_find_get_current_sources, or until the NDIlib_find_destroy function is destroyed.
        let sources = unsafe {
            self.runtime
                .api()
                .NDIlib_find_get_current_sources(self.handle, &mut num_sources)
        };

        if sources.is_null() || num_sources == 0 {
            return Vec::new();
        }

        let src_slice = unsafe { slice::from_raw_parts(sources, num_sources as usize) };

        src_slice
            .iter()
            .filter_map(|src| {
                let source = unsafe { NDISource::from_ffi(src) };
                if source.is_none() {
                    warn!("[Fatal FFI Error] NDI SDK returned nullptr for source name, skipping");
                }
                source
            })
            .collect()
    }

    /// Blocks until the source list changes or the timeout is reached
    pub fn wait_for_change(&mut self, timeout: Duration) -> BlockingUpdate<()> {
        let changed = unsafe {
            self.runtime
                .api()
                .NDIlib_find_wait_for_sources(self.handle, duration_to_ms(timeout))
        };

        BlockingUpdate::new((), changed)
    }
}

impl Drop for NDISourceFinder {
    fn drop(&mut self) {
        unsafe { self.runtime.api().NDIlib_find_destroy(self.handle) }
    }
}
