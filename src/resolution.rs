use std::fmt::{Debug, Display};

use thiserror::Error;

/// Width and height of a video frame or window, in pixels
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub x: usize,
    pub y: usize,
}

impl Resolution {
    pub const fn new(x: usize, y: usize) -> Self {
        Resolution { x, y }
    }

    /// Converts the `xres`/`yres` pair the SDK reports
    pub fn from_i32(x: i32, y: i32) -> Result<Self, ResolutionError> {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) => Ok(Resolution { x, y }),
            _ => Err(ResolutionError::Negative { x, y }),
        }
    }

    /// OpenCV takes rows/cols as i32
    pub fn to_i32(self) -> Result<(i32, i32), ResolutionError> {
        match (i32::try_from(self.x), i32::try_from(self.y)) {
            (Ok(x), Ok(y)) => Ok((x, y)),
            _ => Err(ResolutionError::TooLarge(self)),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.x == 0 || self.y == 0
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

impl Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Resolution({}x{})", self.x, self.y)
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("negative resolution {x}x{y}")]
    Negative { x: i32, y: i32 },
    #[error("resolution {0} does not fit into i32")]
    TooLarge(Resolution),
}
