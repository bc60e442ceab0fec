//! Scripted collaborator doubles shared by the controller tests.

#![allow(dead_code)]

use bo_fluids::{CompVec, PhaseVec};
use bo_sim::{
    BoundaryConditions, CartesianGrid, Collaborators, FlowOutcome, FlowRefusal, FlowSolver,
    FluidSystem, Grid, OperatingMode, OutputSink, RefusalReason, Reservoir, SimResult,
    SimulationState, TransportRequest, TransportSolver, UniformRock, Wells,
};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Fluid whose volume equals its total surface volume.
pub struct UnitFluid;

impl FluidSystem for UnitFluid {
    fn surface_densities(&self) -> CompVec {
        CompVec::new(1000.0, 800.0, 1.0)
    }

    fn total_volume(&self, _p: &PhaseVec, z: &CompVec) -> SimResult<f64> {
        Ok(z.as_slice().iter().sum())
    }
}

#[derive(Default)]
pub struct Log {
    /// State handed to each flow solve, before it is modified
    pub flow_inputs: Vec<SimulationState>,
    pub flow_dts: Vec<f64>,
    pub flow_modes: Vec<OperatingMode>,
    pub transport_dts: Vec<f64>,
    /// Composition handed to each transport call
    pub transport_z: Vec<Vec<CompVec>>,
    pub transport_flux: Vec<Vec<f64>>,
    pub transport_boundary_z: Vec<CompVec>,
    pub impes_checks: usize,
    pub well_updates: Vec<usize>,
    pub flow_setups: usize,
    pub transport_setups: usize,
}

pub type SharedLog = Rc<RefCell<Log>>;

/// Flow solver that bumps pressures, sets a unit flux and follows a script.
pub struct ScriptedFlow {
    pub log: SharedLog,
    /// Solve call index that is refused
    pub refuse_at: Option<usize>,
    /// IMPES acceptance answers; `true` once exhausted
    pub impes_script: VecDeque<bool>,
}

impl FlowSolver for ScriptedFlow {
    fn setup(
        &mut self,
        reservoir: Reservoir<'_>,
        _gravity: [f64; 3],
        _bc: &BoundaryConditions,
    ) -> SimResult<()> {
        assert!(reservoir.grid.num_cells() > 0);
        self.log.borrow_mut().flow_setups += 1;
        Ok(())
    }

    fn solve(
        &mut self,
        state: &mut SimulationState,
        _src: &[f64],
        dt: f64,
        mode: OperatingMode,
    ) -> FlowOutcome {
        let mut log = self.log.borrow_mut();
        let call = log.flow_dts.len();
        log.flow_inputs.push(state.clone());
        log.flow_dts.push(dt);
        log.flow_modes.push(mode);
        if self.refuse_at == Some(call) {
            return Err(FlowRefusal::new(RefusalReason::LinearSolve, "scripted"));
        }
        for p in &mut state.cell_pressure {
            *p += PhaseVec::uniform(1.0e5);
        }
        for p in &mut state.face_pressure {
            *p += PhaseVec::uniform(1.0e5);
        }
        state.face_flux.fill(1.0);
        state.well_pressure = vec![2.0e7];
        state.well_flux = vec![-1.0];
        Ok(())
    }

    fn face_transmissibilities(&self) -> Vec<f64> {
        Vec::new()
    }

    fn inflow_mixture(&self) -> CompVec {
        CompVec::new(0.0, 0.0, 1.0)
    }

    fn volume_discrepancy_limit(&self) -> f64 {
        0.01
    }

    fn volume_discrepancy_acceptable(&self, _state: &SimulationState, _dt: f64) -> bool {
        let mut log = self.log.borrow_mut();
        let i = log.impes_checks;
        log.impes_checks += 1;
        self.impes_script.get(i).copied().unwrap_or(true)
    }
}

/// Transport that falls short of the requested time while the script says so.
pub struct ScriptedTransport {
    pub log: SharedLog,
    /// Per call: `false` means integrate only half the step. `true` once exhausted.
    pub script: VecDeque<bool>,
    /// Reject every call regardless of the script
    pub always_short: bool,
}

impl TransportSolver for ScriptedTransport {
    fn setup(
        &mut self,
        _reservoir: Reservoir<'_>,
        _face_transmissibilities: &[f64],
        _gravity: [f64; 3],
    ) -> SimResult<()> {
        self.log.borrow_mut().transport_setups += 1;
        Ok(())
    }

    fn transport(
        &mut self,
        request: &TransportRequest<'_>,
        cell_z: &mut [CompVec],
    ) -> SimResult<f64> {
        let mut log = self.log.borrow_mut();
        log.transport_dts.push(request.dt);
        log.transport_z.push(cell_z.to_vec());
        log.transport_flux.push(request.face_flux.to_vec());
        log.transport_boundary_z.push(request.boundary_z);
        for z in cell_z.iter_mut() {
            *z *= 0.9;
        }
        let full = !self.always_short && self.script.pop_front().unwrap_or(true);
        Ok(if full { request.dt } else { request.dt * 0.5 })
    }
}

pub struct CountingWells {
    pub log: SharedLog,
}

impl Wells for CountingWells {
    fn num_perforations(&self) -> usize {
        1
    }

    fn update(&mut self, num_cells: usize, well_pressure: &[f64], well_flux: &[f64]) {
        assert_eq!(well_pressure.len(), well_flux.len());
        self.log.borrow_mut().well_updates.push(num_cells);
    }
}

/// Output sink that keeps every written step in memory.
#[derive(Default)]
pub struct RecordingOutput {
    pub steps: Vec<(usize, SimulationState)>,
}

impl OutputSink for RecordingOutput {
    fn write_step(
        &mut self,
        step: usize,
        _grid: &dyn Grid,
        state: &SimulationState,
    ) -> SimResult<()> {
        self.steps.push((step, state.clone()));
        Ok(())
    }
}

pub struct Setup {
    pub dims: [usize; 3],
    pub transport_script: Vec<bool>,
    pub always_short: bool,
    pub impes_script: Vec<bool>,
    pub refuse_at: Option<usize>,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            dims: [1, 1, 1],
            transport_script: Vec::new(),
            always_short: false,
            impes_script: Vec::new(),
            refuse_at: None,
        }
    }
}

impl Setup {
    pub fn build(self) -> (Collaborators, SharedLog) {
        let log = SharedLog::default();
        let collab = Collaborators {
            grid: Box::new(CartesianGrid::new(self.dims, [1.0; 3]).unwrap()),
            rock: Box::new(UniformRock::new(1.0, 1.0e-13).unwrap()),
            fluid: Box::new(UnitFluid),
            wells: Box::new(CountingWells { log: log.clone() }),
            flow: Box::new(ScriptedFlow {
                log: log.clone(),
                refuse_at: self.refuse_at,
                impes_script: self.impes_script.into(),
            }),
            transport: Box::new(ScriptedTransport {
                log: log.clone(),
                script: self.transport_script.into(),
                always_short: self.always_short,
            }),
        };
        (collab, log)
    }
}
