//! # Unit Types
//!
//! Lightweight length wrappers. All calculator inputs and stored records are
//! plain `f64` centimetres; these types exist for presenting or entering a
//! value in another metric length unit.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::units::{Centimeters, Millimeters, LengthUnit};
//!
//! let riser = Centimeters(16.5);
//! let riser_mm: Millimeters = riser.into();
//! assert_eq!(riser_mm.0, 165.0);
//!
//! assert_eq!(LengthUnit::Meters.cm_to_unit(250.0), 2.5);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StairError;

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in centimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Millimeters {
    fn from(cm: Centimeters) -> Self {
        Millimeters(cm.0 * 10.0)
    }
}

impl From<Millimeters> for Centimeters {
    fn from(mm: Millimeters) -> Self {
        Centimeters(mm.0 / 10.0)
    }
}

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

/// Display unit selector for lengths held in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimeters,
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
}

impl LengthUnit {
    /// Convert a centimetre value into this unit.
    pub fn cm_to_unit(self, value_cm: f64) -> f64 {
        match self {
            LengthUnit::Millimeters => Millimeters::from(Centimeters(value_cm)).0,
            LengthUnit::Centimeters => value_cm,
            LengthUnit::Meters => Meters::from(Centimeters(value_cm)).0,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for LengthUnit {
    type Err = StairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mm" => Ok(LengthUnit::Millimeters),
            "cm" => Ok(LengthUnit::Centimeters),
            "m" => Ok(LengthUnit::Meters),
            other => Err(StairError::invalid_input(
                "unit",
                other,
                "Expected one of: mm, cm, m",
            )),
        }
    }
}
