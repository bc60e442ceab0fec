//! Simulation state and the per-step snapshot used for rollback.

use bo_fluids::{CompVec, PhaseVec};

/// Everything the controller advances through time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationState {
    /// Per-cell phase pressures [Pa]
    pub cell_pressure: Vec<PhaseVec>,
    /// Per-face phase pressures [Pa]
    pub face_pressure: Vec<PhaseVec>,
    /// Per-cell surface volumes by component
    pub cell_z: Vec<CompVec>,
    /// Per-face total flux, positive from side 0 to side 1
    pub face_flux: Vec<f64>,
    /// Per-perforation well pressures
    pub well_pressure: Vec<f64>,
    /// Per-perforation well fluxes
    pub well_flux: Vec<f64>,
}

impl SimulationState {
    pub fn num_cells(&self) -> usize {
        self.cell_pressure.len()
    }

    pub fn num_faces(&self) -> usize {
        self.face_pressure.len()
    }
}

/// Full copy of the rollback-relevant state taken at the start of a step attempt.
///
/// Fluxes and well quantities are not included: every attempt begins with a
/// flow solve that overwrites them.
#[derive(Clone, Debug, PartialEq)]
pub struct StepSnapshot {
    cell_pressure: Vec<PhaseVec>,
    face_pressure: Vec<PhaseVec>,
    cell_z: Vec<CompVec>,
}

impl StepSnapshot {
    pub fn capture(state: &SimulationState) -> Self {
        Self {
            cell_pressure: state.cell_pressure.clone(),
            face_pressure: state.face_pressure.clone(),
            cell_z: state.cell_z.clone(),
        }
    }

    /// Put the captured values back, consuming the snapshot.
    pub fn restore(self, state: &mut SimulationState) {
        state.cell_pressure = self.cell_pressure;
        state.face_pressure = self.face_pressure;
        state.cell_z = self.cell_z;
    }

    /// True if `state` holds exactly the captured values.
    pub fn matches(&self, state: &SimulationState) -> bool {
        self.cell_pressure == state.cell_pressure
            && self.face_pressure == state.face_pressure
            && self.cell_z == state.cell_z
    }
}
