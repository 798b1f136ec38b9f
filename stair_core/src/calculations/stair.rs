//! # Stair Calculation
//!
//! Derives riser count, actual riser height and total horizontal run from
//! the overall floor-to-floor height and the preferred riser height.
//!
//! ## Method
//!
//! 1. `risers = round(total_height / ideal_riser_height)`, rounding half away
//!    from zero. A non-positive ideal riser (or a ratio that is negative or
//!    not finite) yields zero risers. A finite ratio above `u32::MAX`
//!    saturates to `u32::MAX` risers.
//! 2. `actual_riser_height = total_height / risers`. The rounded count is
//!    used, so the remainder is spread evenly across every riser and the
//!    actual height can differ from the ideal one.
//! 3. `total_run = (risers - 1) * tread_depth`, plus `landing_depth` when a
//!    landing is included. The top riser lands on the upper floor and has no
//!    tread of its own.
//!
//! The calculation is total: it never fails and never returns NaN.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::calculations::stair::{compute, CalculationInput};
//!
//! let input = CalculationInput {
//!     total_height: 300.0,
//!     ideal_riser_height: 16.5,
//!     tread_depth: 26.0,
//!     include_landing: false,
//!     landing_depth: 120.0,
//! };
//!
//! let result = compute(&input);
//! assert_eq!(result.number_of_risers, 18);
//! assert_eq!(result.total_run, 442.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{StairError, StairResult};

/// Default floor-to-floor height (cm)
pub const DEFAULT_TOTAL_HEIGHT: f64 = 300.0;
/// Default preferred riser height (cm)
pub const DEFAULT_IDEAL_RISER_HEIGHT: f64 = 16.5;
/// Default tread depth (cm)
pub const DEFAULT_TREAD_DEPTH: f64 = 26.0;
/// Default landing depth (cm)
pub const DEFAULT_LANDING_DEPTH: f64 = 120.0;

/// Input dimensions for a straight stair, all in centimetres.
///
/// ## JSON Example
///
/// ```json
/// {
///   "totalHeight": 300.0,
///   "idealRiserHeight": 16.5,
///   "treadDepth": 26.0,
///   "includeLanding": true,
///   "landingDepth": 120.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    /// Floor-to-floor height to climb
    pub total_height: f64,

    /// Preferred height of a single riser; drives the riser count
    pub ideal_riser_height: f64,

    /// Horizontal depth of one tread
    pub tread_depth: f64,

    /// Whether a landing is inserted into the run
    pub include_landing: bool,

    /// Landing depth, only counted when `include_landing` is set
    pub landing_depth: f64,
}

impl Default for CalculationInput {
    fn default() -> Self {
        CalculationInput {
            total_height: DEFAULT_TOTAL_HEIGHT,
            ideal_riser_height: DEFAULT_IDEAL_RISER_HEIGHT,
            tread_depth: DEFAULT_TREAD_DEPTH,
            include_landing: false,
            landing_depth: DEFAULT_LANDING_DEPTH,
        }
    }
}

impl CalculationInput {
    /// Caller-side validation of the entered dimensions.
    ///
    /// [`compute`] does not call this; it degrades to zero outputs instead of
    /// failing. Forms call it before accepting the input.
    pub fn validate(&self) -> StairResult<()> {
        if !(self.total_height > 0.0) || !self.total_height.is_finite() {
            return Err(StairError::invalid_input(
                "total_height",
                self.total_height.to_string(),
                "Total height must be greater than 0",
            ));
        }
        if !(self.ideal_riser_height > 0.0) || !self.ideal_riser_height.is_finite() {
            return Err(StairError::invalid_input(
                "ideal_riser_height",
                self.ideal_riser_height.to_string(),
                "Ideal riser height must be greater than 0",
            ));
        }
        if self.tread_depth < 0.0 || !self.tread_depth.is_finite() {
            return Err(StairError::invalid_input(
                "tread_depth",
                self.tread_depth.to_string(),
                "Tread depth cannot be negative",
            ));
        }
        if self.include_landing && (self.landing_depth < 0.0 || !self.landing_depth.is_finite()) {
            return Err(StairError::invalid_input(
                "landing_depth",
                self.landing_depth.to_string(),
                "Landing depth cannot be negative",
            ));
        }
        Ok(())
    }
}

/// Derived stair geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Number of risers after rounding
    pub number_of_risers: u32,

    /// Riser height once the total height is split across all risers
    pub actual_riser_height: f64,

    /// Horizontal length of all treads plus the landing, if any
    pub total_run: f64,
}

impl CalculationResult {
    /// Number of treads between the bottom and top floor (risers - 1).
    pub fn tread_count(&self) -> u32 {
        self.number_of_risers.saturating_sub(1)
    }
}

/// Compute stair geometry for the given input.
pub fn compute(input: &CalculationInput) -> CalculationResult {
    let number_of_risers = riser_count(input.total_height, input.ideal_riser_height);

    let actual_riser_height = if number_of_risers == 0 {
        0.0
    } else {
        input.total_height / f64::from(number_of_risers)
    };

    let mut total_run = f64::from(number_of_risers.saturating_sub(1)) * input.tread_depth;
    if input.include_landing {
        total_run += input.landing_depth;
    }

    CalculationResult {
        number_of_risers,
        actual_riser_height,
        total_run,
    }
}

fn riser_count(total_height: f64, ideal_riser_height: f64) -> u32 {
    if !(ideal_riser_height > 0.0) {
        return 0;
    }
    let ratio = (total_height / ideal_riser_height).round();
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX for absurdly large ratios
    ratio as u32
}
