use std::{
    ffi::{CString, NulError},
    time::Duration,
};

use thiserror::Error;

pub(crate) fn duration_to_ms(dur: Duration) -> u32 {
    dur.as_millis().try_into().unwrap_or(u32::MAX)
}

/// Converts an optional setting to the nullable C string the SDK expects
pub(crate) fn optional_c_string(value: Option<&str>) -> Result<Option<CString>, NulError> {
    value.map(CString::new).transpose()
}

/// The total length of an NDI source name should be limited to 253 characters. The following characters
/// are considered invalid: `\ / : * ? " < > |`. If any of these characters are found in the name, they will
/// be replaced with a space. These characters are reserved according to Windows file system naming conventions
pub fn validate_source_name(name: &str) -> Result<CString, SourceNameError> {
    let name = CString::new(name).map_err(SourceNameError::NulError)?;
    if name.count_bytes() >= 253 {
        Err(SourceNameError::TooLong)
    } else {
        Ok(name)
    }
}

/// see [validate_source_name] for more information
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceNameError {
    /// The input name contained Nul characters
    #[error("source name contains a nul character: {0}")]
    NulError(NulError),
    /// The total length of an NDI source name should be limited to 253 characters
    #[error("source name is longer than 253 characters")]
    TooLong,
}
