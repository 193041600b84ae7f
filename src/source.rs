//! Source descriptors are used to get the name of discovered senders as well as telling a receiver unambiguously which source to connect to
//!
//! A source descriptor contains the name (exposed via `.name()`) and
//! optional connection info (the URL address the finder reported, exposed via `.address()`)

use std::{
    ffi::{CStr, CString},
    fmt::{Debug, Display},
    ptr,
};

use static_assertions::assert_impl_all;

use crate::{
    bindings,
    util::{SourceNameError, validate_source_name},
};

/// Owned source descriptor
///
/// C equivalent: `NDIlib_source_t`
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct NDISource {
    name: String,
    name_c: CString,
    address: Option<CString>,
}

assert_impl_all!(NDISource: Send, Sync);

impl NDISource {
    /// A descriptor without address, the SDK resolves the name itself when connecting
    pub fn from_name(name: &str) -> Result<Self, SourceNameError> {
        let name_c = validate_source_name(name)?;
        Ok(NDISource {
            name: name.to_owned(),
            name_c,
            address: None,
        })
    }

    pub fn with_address(name: &str, address: &str) -> Result<Self, SourceNameError> {
        let mut source = Self::from_name(name)?;
        source.address = Some(CString::new(address).map_err(SourceNameError::NulError)?);
        Ok(source)
    }

    /// Copies a descriptor out of the finder's source list
    ///
    /// # Safety
    ///
    /// The pointers inside `source_t` must be null or point to valid C strings.
    pub(crate) unsafe fn from_ffi(source_t: &bindings::NDIlib_source_t) -> Option<Self> {
        if source_t.p_ndi_name.is_null() {
            return None;
        }

        let name_c = unsafe { CStr::from_ptr(source_t.p_ndi_name) }.to_owned();
        let address = unsafe { source_t.__bindgen_anon_1.p_url_address };
        let address = if address.is_null() {
            None
        } else {
            Some(unsafe { CStr::from_ptr(address) }.to_owned())
        };

        Some(NDISource {
            name: name_c.to_string_lossy().into_owned(),
            name_c,
            address,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The address the source was discovered at, if known
    pub fn address(&self) -> Option<&str> {
        self.address.as_ref().and_then(|addr| addr.to_str().ok())
    }

    /// Builds a source descriptor for the NDI library that is valid for the duration of the closure call
    pub(crate) fn with_descriptor<R>(&self, f: impl FnOnce(&bindings::NDIlib_source_t) -> R) -> R {
        let descriptor = bindings::NDIlib_source_t {
            p_ndi_name: self.name_c.as_ptr(),
            __bindgen_anon_1: bindings::NDIlib_source_t__bindgen_ty_1 {
                p_url_address: self
                    .address
                    .as_ref()
                    .map(|s| s.as_ptr())
                    .unwrap_or(ptr::null()),
            },
        };
        f(&descriptor)
    }
}

impl Display for NDISource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.address() {
            Some(address) => write!(f, "{} ({})", self.name, address),
            None => write!(f, "{}", self.name),
        }
    }
}

impl Debug for NDISource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NDISource")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish()
    }
}
