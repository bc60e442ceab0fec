//! bo-fluids: black-oil PVT property evaluation.
//!
//! Provides:
//! - Phase and component indexing (`Phase`, `Component`, `PhaseVec`, `CompVec`)
//! - Region-indexed saturated/undersaturated PVT tables
//! - `PvtModel`: live gas, live oil and dead-fluid property models
//! - Scalar and batched (rayon) evaluation with analytic pressure derivatives
//! - Pressure sweeps for inspection
//!
//! # Example
//!
//! ```
//! use bo_fluids::{
//!     CompVec, MiscibleTable, PressurePoint, PvtModel, RegionTables, SaturatedPoint, TableRow,
//! };
//!
//! let table = MiscibleTable::new(
//!     0,
//!     vec![TableRow {
//!         saturated: SaturatedPoint { pressure: 1.0e7, ratio: 1.0e-4, b: 0.01, viscosity: 2.0e-5 },
//!         undersaturated: vec![PressurePoint { pressure: 2.0e7, b: 0.008, viscosity: 2.2e-5 }],
//!     }],
//! )
//! .unwrap();
//! let model = PvtModel::LiveGas(RegionTables::new(vec![table]));
//! let props = model.evaluate(0, 1.0e7, &CompVec::new(0.0, 1.0e-4, 1.0)).unwrap();
//! assert_eq!(props.b, 0.01);
//! ```

pub mod error;
pub mod model;
pub mod phase;
pub mod sweep;
pub mod table;

// Re-exports for ergonomics
pub use error::{PvtError, PvtErrorKind, PvtResult};
pub use model::{PvtModel, RegionTables};
pub use phase::{CompVec, Component, NUM_COMPONENTS, NUM_PHASES, Phase, PhaseVec};
pub use sweep::{PressureSweep, SweepType, execute_pressure_sweep};
pub use table::{
    DeadTable, MiscibleTable, PressurePoint, PvtProps, SaturatedPoint, SaturationState, TableRow,
};
