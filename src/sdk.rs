//! Contains methods for the whole SDK like loading the runtime, startup/shutdown, CPU support tests and version lookup
//!
//! The NDI runtime is not linked at build time. It is opened from the directory named by an
//! environment variable (`NDI_RUNTIME_DIR_V5` by default), the same way the official tools locate it.
//!
//! <https://docs.ndi.video/all/developing-with-ndi/sdk/startup-and-shutdown>

use std::{
    env,
    ffi::{CStr, OsString},
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;
use tracing::debug;

use crate::bindings;

/// File name of the runtime library inside the runtime directory
#[cfg(target_os = "windows")]
pub const DEFAULT_LIBRARY_NAME: &str = "Processing.NDI.Lib.x64.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY_NAME: &str = "libndi.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_LIBRARY_NAME: &str = "libndi.so.6";

/// Environment variable the NDI runtime installer sets
pub const DEFAULT_RUNTIME_DIR_VAR: &str = "NDI_RUNTIME_DIR_V5";

/// Resolves the path of the runtime library from the directory stored in `var`.
pub fn library_path_from_env(var: &str, library_name: &str) -> Result<PathBuf, NDILoadError> {
    library_path_in(env::var_os(var), var, library_name)
}

fn library_path_in(
    dir: Option<OsString>,
    var: &str,
    library_name: &str,
) -> Result<PathBuf, NDILoadError> {
    match dir {
        Some(dir) if !dir.is_empty() => Ok(Path::new(&dir).join(library_name)),
        _ => Err(NDILoadError::MissingRuntimeDir {
            var: var.to_owned(),
        }),
    }
}

struct RuntimeInner {
    api: bindings::NDIlib,
}

impl Drop for RuntimeInner {
    fn drop(&mut self) {
        debug!("shutting down NDI runtime");
        unsafe { self.api.NDIlib_destroy() }
    }
}

/// A loaded and initialized NDI runtime
///
/// Cloning is cheap, every finder, receiver and received frame holds a clone so the library
/// stays loaded until the last of them is gone. `NDIlib_destroy` is called after that.
///
/// C equivalent: `NDIlib_initialize` / `NDIlib_destroy`
#[derive(Clone)]
pub struct NDIRuntime {
    inner: Arc<RuntimeInner>,
}

impl NDIRuntime {
    /// Opens the runtime library at `path` and starts the SDK
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NDILoadError> {
        let path = path.as_ref();

        let api = unsafe { bindings::NDIlib::new(path) }.map_err(|source| {
            NDILoadError::Library {
                path: path.to_owned(),
                source,
            }
        })?;

        // Detect whether the current CPU in the system is capable of running NDILib.
        // Currently NDILib requires SSE4.2 instructions.
        // <https://docs.ndi.video/all/developing-with-ndi/sdk/cpu-requirements>
        if !unsafe { api.NDIlib_is_supported_CPU() } {
            return Err(NDILoadError::UnsupportedCPU);
        }

        if !unsafe { api.NDIlib_initialize() } {
            return Err(NDILoadError::InitializationFailed);
        }

        Ok(NDIRuntime {
            inner: Arc::new(RuntimeInner { api }),
        })
    }

    /// Get the version of the NDI SDK.
    /// This may return None if the version cannot be determined.
    pub fn version(&self) -> Option<&str> {
        let version_ptr = unsafe { self.api().NDIlib_version() };
        if version_ptr.is_null() {
            return None;
        }
        let version = unsafe { CStr::from_ptr(version_ptr) };
        version.to_str().ok()
    }

    pub(crate) fn api(&self) -> &bindings::NDIlib {
        &self.inner.api
    }
}

impl std::fmt::Debug for NDIRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NDIRuntime")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NDILoadError {
    /// The variable naming the runtime directory is not set
    #[error("the NDI runtime is not installed (${var} is not set)")]
    MissingRuntimeDir { var: String },
    #[error("failed to load the NDI runtime from {}", .path.display())]
    Library {
        path: PathBuf,
        source: libloading::Error,
    },
    /// The CPU is not supported by the NDI SDK.
    /// NDI requires SSE4.2 instructions
    #[error("the CPU is not supported by the NDI runtime (SSE4.2 is required)")]
    UnsupportedCPU,
    #[error("failed to initialize the NDI runtime")]
    InitializationFailed,
}
