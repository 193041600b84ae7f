//! Finds an [NDI (ndi.video)](https://ndi.video/) source by name, connects to it and shows its video in an OpenCV window.
//!
//! The SDK wrappers never expose raw pointers and use Rust types for everything (timeouts are handled as `std::time::Duration`, not `time_in_ms: u32`).
//! The pipeline itself lives in [monitor], it only depends on the SDK through a few traits.
//!
//! ## Building
//!
//! 1. Make sure to have the [NDI SDK](https://ndi.video/for-developers/#ndi-sdk) installed and `NDI_SDK_DIR` pointing at it
//! 2. Make sure to have Clang/LLVM installed. [see rust-bindgen requirements](https://rust-lang.github.io/rust-bindgen/requirements.html)
//! 3. OpenCV has to be installed for the `opencv` crate
//!
//! The NDI runtime itself is not linked, it is loaded at startup from the directory named by `NDI_RUNTIME_DIR_V5`.
//!
//! ## Docs
//!
//! The wrappers stay close to the C SDK, the [original documentation](https://docs.ndi.video/all/developing-with-ndi/sdk) is still useful.
//! Look out for `C Equivalent: ...` comments, they are intended to help selecting the right Rust equivalent of C structs and functions
//!
//! ## Cargo features
//!
//! ### `strict_assertions`
//!
//! This crate uses a lot of unsafe ffi bindings and therefore a lot of assertions.
//!
//! You can turn on this feature to ensure debug assertions are in place even for
//! release builds.

mod bindings;

pub mod blocking_update;
pub mod cancel;
pub mod config;
pub mod display;
pub mod enums;
pub mod find;
pub mod four_cc;
pub mod frame;
pub mod monitor;
pub mod receiver;
pub mod resolution;
pub mod sdk;
pub mod source;
pub mod tally;
pub mod util;

#[cfg(test)]
mod fakes;
