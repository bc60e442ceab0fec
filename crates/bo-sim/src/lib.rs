//! Black-oil simulation driver.
//!
//! Provides:
//! - Simulation state and start-of-step snapshots for rollback
//! - Collaborator interfaces (grid, rock, fluid, wells, flow and transport solvers)
//! - Flow boundary conditions, a generated Cartesian grid and uniform rock
//! - Initial conditions with optional hydrostatic column and pore-volume rescaling
//! - The adaptive time-stepping controller
//! - VTK and plain-text step output

pub mod boundary;
pub mod collaborators;
pub mod controller;
pub mod error;
pub mod grid;
pub mod init;
pub mod output;
pub mod state;

// Re-exports for public API
pub use boundary::{BoundaryConditions, CARTESIAN_BOUNDARY_IDS, FlowBc};
pub use collaborators::{
    FlowOutcome, FlowRefusal, FlowSolver, FluidSystem, Grid, NoWells, OperatingMode,
    RefusalReason, Reservoir, Rock, StructuredView, TransportRequest, TransportScheme,
    TransportSolver, Wells,
};
pub use controller::{
    Collaborators, ControllerState, SimOptions, SimProgress, SimReport, Simulator, cut_back,
    next_stepsize_after_accept,
};
pub use error::{SimError, SimResult};
pub use grid::{CartesianGrid, UniformRock};
pub use init::{InitialConditions, initial_state};
pub use output::{FileOutput, OutputSink, estimate_cell_velocity};
pub use state::{SimulationState, StepSnapshot};
