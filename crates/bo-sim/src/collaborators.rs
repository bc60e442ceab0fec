//! Capability interfaces the controller consumes.
//!
//! Grid, rock, fluid, wells and the flow/transport solvers are supplied from
//! outside. Each is injected independently as a trait object, so any one of
//! them can be replaced by a test double.

use crate::boundary::BoundaryConditions;
use crate::error::SimResult;
use crate::state::SimulationState;
use bo_fluids::{CompVec, PhaseVec};
use std::fmt;
use thiserror::Error;

/// Regular lattice description used by the structured visualization export.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StructuredView {
    /// Cells per axis.
    pub dims: [usize; 3],
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
}

pub trait Grid {
    fn num_cells(&self) -> usize;
    fn num_faces(&self) -> usize;
    /// Cells on side 0 and side 1 of `face`; `None` outside the domain.
    fn face_cells(&self, face: usize) -> [Option<usize>; 2];
    fn cell_centroid(&self, cell: usize) -> [f64; 3];
    fn cell_volume(&self, cell: usize) -> f64;
    fn face_centroid(&self, face: usize) -> [f64; 3];
    /// Boundary condition identifier; 0 for interior faces.
    fn boundary_id(&self, face: usize) -> usize;
    /// Lattice view for output, if the grid has one.
    fn structured_view(&self) -> Option<StructuredView>;
}

pub trait Rock {
    fn porosity(&self, cell: usize) -> f64;
    /// Isotropic permeability [m²].
    fn permeability(&self, cell: usize) -> f64;
}

pub trait FluidSystem {
    /// Surface densities by component [kg/m³].
    fn surface_densities(&self) -> CompVec;
    /// Total phase volume occupied by surface volumes `z` at `pressure`.
    fn total_volume(&self, pressure: &PhaseVec, z: &CompVec) -> SimResult<f64>;
}

pub trait Wells {
    fn num_perforations(&self) -> usize;
    /// Push new perforation pressures and fluxes after a flow solve.
    fn update(&mut self, num_cells: usize, well_pressure: &[f64], well_flux: &[f64]);
}

/// Well set for reservoirs without wells.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoWells;

impl Wells for NoWells {
    fn num_perforations(&self) -> usize {
        0
    }

    fn update(&mut self, _num_cells: usize, _well_pressure: &[f64], _well_flux: &[f64]) {}
}

/// Borrowed view of the static reservoir description handed to solver setup.
///
/// Solvers copy what they need; they must not keep these references.
#[derive(Clone, Copy)]
pub struct Reservoir<'a> {
    pub grid: &'a dyn Grid,
    pub rock: &'a dyn Rock,
    pub fluid: &'a dyn FluidSystem,
    pub wells: &'a dyn Wells,
}

/// How pressure and transport are coupled within a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OperatingMode {
    /// Flow solve followed by a transport update.
    #[default]
    FullyImplicit,
    /// Transport from a single flow solve; the flow solver judges the discrepancy.
    Impes,
}

/// Numerical scheme selector passed through to the transport solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransportScheme {
    Legacy,
    #[default]
    Current,
}

/// Machine-readable reason for a flow-solve refusal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefusalReason {
    /// The pressure system could not be solved within the discrepancy limit.
    VolumeDiscrepancy,
    LinearSolve,
    NonlinearDivergence,
}

impl fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RefusalReason::VolumeDiscrepancy => "volume discrepancy too large",
            RefusalReason::LinearSolve => "linear solve failed",
            RefusalReason::NonlinearDivergence => "nonlinear iteration diverged",
        };
        f.write_str(s)
    }
}

/// Failure variant of a flow solve. Always fatal for the run.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{reason}: {message}")]
pub struct FlowRefusal {
    pub reason: RefusalReason,
    pub message: String,
}

impl FlowRefusal {
    pub fn new(reason: RefusalReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }
}

pub type FlowOutcome = Result<(), FlowRefusal>;

pub trait FlowSolver {
    fn setup(
        &mut self,
        reservoir: Reservoir<'_>,
        gravity: [f64; 3],
        bc: &BoundaryConditions,
    ) -> SimResult<()>;

    /// Advance pressures and fluxes in `state` over `dt`.
    ///
    /// Updates cell/face pressure, face flux and well pressure/flux.
    fn solve(
        &mut self,
        state: &mut SimulationState,
        src: &[f64],
        dt: f64,
        mode: OperatingMode,
    ) -> FlowOutcome;

    fn face_transmissibilities(&self) -> Vec<f64>;
    fn inflow_mixture(&self) -> CompVec;
    fn volume_discrepancy_limit(&self) -> f64;
    fn volume_discrepancy_acceptable(&self, state: &SimulationState, dt: f64) -> bool;
}

/// Inputs to one transport update.
#[derive(Clone, Copy, Debug)]
pub struct TransportRequest<'a> {
    pub boundary_pressure: PhaseVec,
    pub boundary_z: CompVec,
    pub face_flux: &'a [f64],
    pub cell_pressure: &'a [PhaseVec],
    pub face_pressure: &'a [PhaseVec],
    pub dt: f64,
    pub discrepancy_limit: f64,
    pub scheme: TransportScheme,
}

pub trait TransportSolver {
    fn setup(
        &mut self,
        reservoir: Reservoir<'_>,
        face_transmissibilities: &[f64],
        gravity: [f64; 3],
    ) -> SimResult<()>;

    /// Update `cell_z` and return the time actually integrated (at most `request.dt`).
    ///
    /// A shorter time means the discrepancy limit would otherwise have been exceeded.
    fn transport(&mut self, request: &TransportRequest<'_>, cell_z: &mut [CompVec])
    -> SimResult<f64>;
}
