//! Adaptive time-stepping controller.
//!
//! Each step attempt runs a flow solve, updates the wells and then checks the
//! volume discrepancy, either through a transport update or (in IMPES mode)
//! by asking the flow solver. A rejected attempt restores the start-of-step
//! state and retries with half the step size; an accepted attempt is written
//! out and time advances. A flow-solve refusal ends the run.

use crate::boundary::BoundaryConditions;
use crate::collaborators::{
    FluidSystem, FlowSolver, Grid, OperatingMode, Reservoir, Rock, TransportRequest,
    TransportScheme, TransportSolver, Wells,
};
use crate::error::{SimError, SimResult};
use crate::init::{InitialConditions, initial_state};
use crate::output::OutputSink;
use crate::state::{SimulationState, StepSnapshot};
use bo_core::{ensure_finite, ensure_non_negative, ensure_positive};
use bo_core::units::{barsa, days, s, to_days};
use bo_fluids::{CompVec, PhaseVec};
use tracing::{debug, error, info, warn};

/// Gravity used by the hydrostatic test setup [m/s²], pointing along +z.
pub const GRAVITY_TEST_ACCELERATION: f64 = 10.0;

/// Inflow composition sentinel for the gravity test. Closed boundaries mean
/// it should never be transported into the domain.
pub const GRAVITY_TEST_BOUNDARY_Z: f64 = -1e100;

/// Options for a simulation run. All quantities in SI.
#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    /// Total simulated time (seconds)
    pub total_time: f64,
    /// Step size of the first attempt (seconds)
    pub initial_stepsize: f64,
    pub mode: OperatingMode,
    pub scheme: TransportScheme,
    /// Hydrostatic test: gravity on, closed boundaries, half water/half oil.
    pub gravity_test: bool,
    /// Initial reservoir pressure (Pa)
    pub initial_pressure: f64,
    /// Boundary pressure handed to the transport solver (Pa)
    pub boundary_pressure: f64,
    /// Flow boundary conditions; ignored in gravity test mode.
    pub boundary_conditions: BoundaryConditions,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            total_time: days(30.0).value,
            initial_stepsize: days(1.0).value,
            mode: OperatingMode::default(),
            scheme: TransportScheme::default(),
            gravity_test: false,
            initial_pressure: barsa(100.0).value,
            boundary_pressure: barsa(300.0).value,
            boundary_conditions: BoundaryConditions::pressure_drive(
                barsa(300.0).value,
                barsa(100.0).value,
            ),
        }
    }
}

impl SimOptions {
    /// Defaults with the hydrostatic test enabled.
    pub fn gravity_test() -> Self {
        Self {
            gravity_test: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        ensure_positive(self.total_time, "total time must be positive")?;
        ensure_positive(self.initial_stepsize, "initial step size must be positive")?;
        ensure_non_negative(self.initial_pressure, "initial pressure must be non-negative")?;
        ensure_finite(self.boundary_pressure, "boundary pressure must be finite")?;
        Ok(())
    }

    pub fn gravity(&self) -> [f64; 3] {
        if self.gravity_test {
            [0.0, 0.0, GRAVITY_TEST_ACCELERATION]
        } else {
            [0.0; 3]
        }
    }

    /// Boundary conditions actually applied; all closed in gravity test mode.
    pub fn flow_bc(&self) -> BoundaryConditions {
        if self.gravity_test {
            BoundaryConditions::default()
        } else {
            self.boundary_conditions.clone()
        }
    }

    pub fn initial_conditions(&self) -> InitialConditions {
        let z = if self.gravity_test {
            CompVec::new(0.5, 0.5, 0.0)
        } else {
            CompVec::new(0.0, 1.0, 0.0)
        };
        InitialConditions {
            pressure: self.initial_pressure,
            z,
            gravity_column: self.gravity_test,
        }
    }
}

/// The injected collaborators of one simulation.
pub struct Collaborators {
    pub grid: Box<dyn Grid>,
    pub rock: Box<dyn Rock>,
    pub fluid: Box<dyn FluidSystem>,
    pub wells: Box<dyn Wells>,
    pub flow: Box<dyn FlowSolver>,
    pub transport: Box<dyn TransportSolver>,
}

/// Where the controller is in its step cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    StepAttempt,
    Accepted,
    Rejected,
    Finished,
}

/// Progress event passed to the run callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimProgress {
    pub state: ControllerState,
    /// Index of the step being attempted (number of accepted steps so far)
    pub step: usize,
    /// Simulated time at the start of the step (seconds)
    pub sim_time: f64,
    /// Step size of this attempt (seconds)
    pub stepsize: f64,
    pub total_time: f64,
    pub fraction_complete: f64,
    /// Consecutive rejections of the current step
    pub cutback_retries: usize,
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimReport {
    pub accepted_steps: usize,
    pub rejected_attempts: usize,
    /// Step size of every accepted step, in order (seconds)
    pub step_sizes: Vec<f64>,
    pub final_time: f64,
}

/// Step size after a rejected attempt.
pub fn cut_back(stepsize: f64) -> f64 {
    stepsize * 0.5
}

/// Step size for the attempt after an accepted step.
///
/// Growth is switched off: the accepted step size carries over unchanged.
/// Any future growth rule belongs here.
pub fn next_stepsize_after_accept(stepsize: f64) -> f64 {
    stepsize
}

pub struct Simulator {
    collab: Collaborators,
    options: SimOptions,
    src: Vec<f64>,
    solvers_ready: bool,
}

impl Simulator {
    pub fn new(collab: Collaborators, options: SimOptions) -> SimResult<Self> {
        options.validate()?;
        let src = vec![0.0; collab.grid.num_cells()];
        Ok(Self {
            collab,
            options,
            src,
            solvers_ready: false,
        })
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    /// Per-cell source terms passed to every flow solve. Zero by default.
    pub fn set_sources(&mut self, src: Vec<f64>) -> SimResult<()> {
        if src.len() != self.collab.grid.num_cells() {
            return Err(SimError::InvalidArg {
                what: "source vector length must equal the number of cells",
            });
        }
        self.src = src;
        Ok(())
    }

    fn prepare_solvers(&mut self) -> SimResult<()> {
        if self.solvers_ready {
            return Ok(());
        }
        let gravity = self.options.gravity();
        let bc = self.options.flow_bc();
        let Collaborators {
            grid,
            rock,
            fluid,
            wells,
            flow,
            transport,
        } = &mut self.collab;
        let reservoir = Reservoir {
            grid: &**grid,
            rock: &**rock,
            fluid: &**fluid,
            wells: &**wells,
        };
        flow.setup(reservoir, gravity, &bc)?;
        let trans = flow.face_transmissibilities();
        transport.setup(reservoir, &trans, gravity)?;
        self.solvers_ready = true;
        Ok(())
    }

    /// Set up both solvers and build the time-zero state.
    pub fn setup(&mut self) -> SimResult<SimulationState> {
        self.prepare_solvers()?;
        let c = &self.collab;
        initial_state(
            &*c.grid,
            &*c.rock,
            &*c.fluid,
            &self.options.flow_bc(),
            &self.options.initial_conditions(),
            self.options.gravity(),
        )
    }

    pub fn run(&mut self, output: &mut dyn OutputSink) -> SimResult<(SimulationState, SimReport)> {
        self.run_with_progress(output, &mut |_| {})
    }

    pub fn run_with_progress(
        &mut self,
        output: &mut dyn OutputSink,
        progress: &mut dyn FnMut(&SimProgress),
    ) -> SimResult<(SimulationState, SimReport)> {
        let state = self.setup()?;
        self.run_from(state, output, progress)
    }

    /// Advance `state` from time zero to the total time.
    pub fn run_from(
        &mut self,
        mut state: SimulationState,
        output: &mut dyn OutputSink,
        progress: &mut dyn FnMut(&SimProgress),
    ) -> SimResult<(SimulationState, SimReport)> {
        self.prepare_solvers()?;
        let num_cells = self.collab.grid.num_cells();
        if state.num_cells() != num_cells || state.cell_z.len() != num_cells {
            return Err(SimError::InvalidArg {
                what: "state does not match the grid",
            });
        }

        let total = self.options.total_time;
        let mode = self.options.mode;
        let boundary_pressure = PhaseVec::uniform(self.options.boundary_pressure);
        let boundary_z = if self.options.gravity_test {
            CompVec::uniform(GRAVITY_TEST_BOUNDARY_Z)
        } else {
            self.collab.flow.inflow_mixture()
        };
        let discrepancy_limit = self.collab.flow.volume_discrepancy_limit();

        let mut report = SimReport::default();
        let mut stepsize = self.options.initial_stepsize;
        let mut time = 0.0;
        let mut retries = 0usize;

        let event = |phase, step, time, stepsize, retries| SimProgress {
            state: phase,
            step,
            sim_time: time,
            stepsize,
            total_time: total,
            fraction_complete: (time / total).clamp(0.0, 1.0),
            cutback_retries: retries,
        };
        progress(&event(ControllerState::Idle, 0, time, stepsize, 0));

        while time < total {
            let step = report.accepted_steps;
            let snapshot = StepSnapshot::capture(&state);

            let clamped = time + stepsize > total;
            if clamped {
                stepsize = total - time;
            }
            if stepsize <= 0.0 || time + stepsize == time {
                error!(step, time, stepsize, "step size no longer advances time");
                return Err(SimError::StepSizeUnderflow { step, time });
            }

            info!(
                step,
                time_days = to_days(s(time)),
                stepsize_days = to_days(s(stepsize)),
                total_days = to_days(s(total)),
                "simulation step"
            );
            progress(&event(ControllerState::StepAttempt, step, time, stepsize, retries));

            let c = &mut self.collab;
            if let Err(refusal) = c.flow.solve(&mut state, &self.src, stepsize, mode) {
                error!(step, reason = %refusal.reason, "flow solver refused to run");
                return Err(SimError::FlowRefused { step, refusal });
            }

            c.wells.update(num_cells, &state.well_pressure, &state.well_flux);

            if self.options.gravity_test {
                state.face_flux.fill(0.0);
            }

            let acceptable = match mode {
                OperatingMode::Impes => c.flow.volume_discrepancy_acceptable(&state, stepsize),
                OperatingMode::FullyImplicit => {
                    let request = TransportRequest {
                        boundary_pressure,
                        boundary_z,
                        face_flux: &state.face_flux,
                        cell_pressure: &state.cell_pressure,
                        face_pressure: &state.face_pressure,
                        dt: stepsize,
                        discrepancy_limit,
                        scheme: self.options.scheme,
                    };
                    let actual = c.transport.transport(&request, &mut state.cell_z)?;
                    actual == stepsize
                }
            };

            if !acceptable {
                retries += 1;
                report.rejected_attempts += 1;
                warn!(
                    step,
                    retries,
                    "volume discrepancy too large, shortening step size and redoing step"
                );
                snapshot.restore(&mut state);
                progress(&event(ControllerState::Rejected, step, time, stepsize, retries));
                stepsize = cut_back(stepsize);
                continue;
            }

            output.write_step(step, &*c.grid, &state)?;

            time = if clamped { total } else { time + stepsize };
            report.accepted_steps += 1;
            report.step_sizes.push(stepsize);
            debug!(step, time_days = to_days(s(time)), "step accepted");
            progress(&event(ControllerState::Accepted, step, time, stepsize, retries));
            retries = 0;
            stepsize = next_stepsize_after_accept(stepsize);
        }

        report.final_time = time;
        progress(&event(
            ControllerState::Finished,
            report.accepted_steps,
            time,
            stepsize,
            0,
        ));
        info!(
            steps = report.accepted_steps,
            rejected = report.rejected_attempts,
            "simulation finished"
        );
        Ok((state, report))
    }
}
