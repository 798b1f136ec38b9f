//! # Calculations
//!
//! Pure calculation functions. Neither module keeps state or touches the
//! filesystem.
//!
//! ## Available Calculations
//!
//! - [`stair`] - Riser count, actual riser height and total run
//! - [`scale`] - Real/scaled dimension conversion at `1:N`

pub mod scale;
pub mod stair;

// Re-export commonly used types
pub use scale::{convert, ScaleDirection, ScaleRatio, SUPPORTED_SCALES};
pub use stair::{compute, CalculationInput, CalculationResult};
