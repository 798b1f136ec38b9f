//! # Scale Conversion
//!
//! Converts a dimension between its real-world size and its size on a drawing
//! at a `1:N` architectural scale.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::calculations::scale::{convert, ScaleDirection, ScaleRatio};
//!
//! let ratio = ScaleRatio::new(50)?;
//! assert_eq!(convert(100.0, ratio, ScaleDirection::RealToScaled), 2.0);
//! assert_eq!(convert(2.0, ratio, ScaleDirection::ScaledToReal), 100.0);
//! # Ok::<(), stair_core::errors::StairError>(())
//! ```

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};

/// Ratio denominators offered by pickers. Any positive denominator converts.
pub const SUPPORTED_SCALES: [u32; 5] = [20, 50, 100, 200, 500];

/// A `1:N` scale ratio with a non-zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ScaleRatio(NonZeroU32);

impl ScaleRatio {
    /// Create a ratio `1:denominator`.
    ///
    /// Returns `StairError::InvalidInput` for a zero denominator.
    pub fn new(denominator: u32) -> StairResult<Self> {
        NonZeroU32::new(denominator).map(ScaleRatio).ok_or_else(|| {
            StairError::invalid_input("ratio_denominator", "0", "Scale denominator must be positive")
        })
    }

    pub fn denominator(self) -> u32 {
        self.0.get()
    }

    /// Whether this ratio is one of [`SUPPORTED_SCALES`].
    pub fn is_supported(self) -> bool {
        SUPPORTED_SCALES.contains(&self.denominator())
    }
}

impl Default for ScaleRatio {
    fn default() -> Self {
        ScaleRatio(NonZeroU32::new(50).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<u32> for ScaleRatio {
    type Error = StairError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        ScaleRatio::new(value)
    }
}

impl From<ScaleRatio> for u32 {
    fn from(ratio: ScaleRatio) -> Self {
        ratio.denominator()
    }
}

impl fmt::Display for ScaleRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1:{}", self.denominator())
    }
}

/// Which way a conversion goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleDirection {
    /// Real-world size to drawing size (divide by N)
    #[default]
    RealToScaled,
    /// Drawing size to real-world size (multiply by N)
    ScaledToReal,
}

impl ScaleDirection {
    pub fn flipped(self) -> Self {
        match self {
            ScaleDirection::RealToScaled => ScaleDirection::ScaledToReal,
            ScaleDirection::ScaledToReal => ScaleDirection::RealToScaled,
        }
    }

    /// Label for the value being entered.
    pub fn input_label(self) -> &'static str {
        match self {
            ScaleDirection::RealToScaled => "Real dimension",
            ScaleDirection::ScaledToReal => "Scaled dimension",
        }
    }

    /// Label for the converted value.
    pub fn output_label(self) -> &'static str {
        self.flipped().input_label()
    }
}

impl fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleDirection::RealToScaled => f.write_str("Real → Scaled"),
            ScaleDirection::ScaledToReal => f.write_str("Scaled → Real"),
        }
    }
}

/// Convert `value` at the given ratio.
pub fn convert(value: f64, ratio: ScaleRatio, direction: ScaleDirection) -> f64 {
    let n = f64::from(ratio.denominator());
    match direction {
        ScaleDirection::RealToScaled => value / n,
        ScaleDirection::ScaledToReal => value * n,
    }
}

/// Convert with a raw denominator, rejecting zero.
pub fn convert_with_denominator(value: f64, denominator: u32, direction: ScaleDirection) -> StairResult<f64> {
    Ok(convert(value, ScaleRatio::new(denominator)?, direction))
}
