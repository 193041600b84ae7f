//! Tally indicator

use serde::Deserialize;

use crate::bindings;

/// Tally indicator state
///
/// C equivalent: `NDIlib_tally_t`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct Tally {
    pub program: bool,
    pub preview: bool,
}

impl Tally {
    pub fn new(program: bool, preview: bool) -> Self {
        Tally { program, preview }
    }

    pub(crate) fn to_ffi(self) -> bindings::NDIlib_tally_t {
        bindings::NDIlib_tally_t {
            on_program: self.program,
            on_preview: self.preview,
        }
    }
}

/// A monitor is both on program and on preview
impl Default for Tally {
    fn default() -> Self {
        Tally::new(true, true)
    }
}
