//! bo-core: stable foundation for the black-oil simulator.
//!
//! Contains:
//! - units (uom SI types + field-unit constructors: bar, day, millidarcy)
//! - numeric (range checks, guarded ratios)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{BoError, BoResult};
pub use numeric::*;
pub use units::*;
