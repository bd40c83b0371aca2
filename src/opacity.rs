//! Watermark opacity.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A watermark opacity factor, guaranteed to lie in `[0, 1]`.
///
/// The factor multiplies the alpha channel of the watermark layer before it is
/// composited, so `0.0` leaves the base image untouched and `1.0` keeps the
/// watermark's own alpha.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Opacity(f32);

impl Opacity {
    /// Opacity used when none is given on the command line.
    pub const DEFAULT: Self = Self(0.3);

    /// Fully transparent: the watermark has no effect.
    pub const TRANSPARENT: Self = Self(0.0);

    /// Fully opaque: the watermark alpha is used unchanged.
    pub const OPAQUE: Self = Self(1.0);

    /// Create an opacity from a float.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOpacity`] if `value` is NaN or outside `[0, 1]`.
    pub fn new(value: f32) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidOpacity(value.to_string()))
        }
    }

    /// The raw factor.
    #[must_use]
    pub fn get(self) -> f32 {
        self.0
    }

    /// Scale an 8-bit alpha value, truncating toward zero.
    #[must_use]
    pub fn scale_alpha(self, alpha: u8) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (f32::from(alpha) * self.0) as u8
        }
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Opacity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidOpacity(s.to_string()))?;
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidOpacity(s.to_string()))
        }
    }
}

impl TryFrom<f32> for Opacity {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}
