//! # stair_core - Staircase Calculation Engine
//!
//! `stair_core` is the computational heart of Stairwise: straight-stair
//! geometry, architectural scale conversion, and a small persistent list of
//! saved calculations. Inputs, results and stored projects are all
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Total calculations**: The stair calculator never fails; bad numbers
//!   degrade to zero outputs
//! - **Frozen snapshots**: Saved projects keep the results computed at save time
//! - **Whole-file persistence**: Every store mutation rewrites the file atomically
//!
//! ## Quick Start
//!
//! ```rust
//! use stair_core::calculations::{compute, CalculationInput};
//!
//! let result = compute(&CalculationInput {
//!     total_height: 300.0,
//!     ideal_riser_height: 16.5,
//!     tread_depth: 26.0,
//!     include_landing: true,
//!     landing_depth: 120.0,
//! });
//!
//! assert_eq!(result.number_of_risers, 18);
//! assert_eq!(result.total_run, 562.0);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Stair geometry and scale conversion
//! - [`project`] - Saved project snapshots and the store file format
//! - [`store`] - The project store
//! - [`config`] - Store location and user preferences
//! - [`units`] - Metric length wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic writes and file locking

pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod store;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute, convert, CalculationInput, CalculationResult, ScaleDirection, ScaleRatio};
pub use config::{Preferences, StoreConfig};
pub use errors::{StairError, StairResult};
pub use project::StairProject;
pub use store::ProjectStore;
