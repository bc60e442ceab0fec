//! Initial state: gravity-equilibrium pressures, face pressures and
//! pore-volume-consistent compositions.

use crate::boundary::BoundaryConditions;
use crate::collaborators::{FluidSystem, Grid, Rock};
use crate::error::{SimError, SimResult};
use crate::state::SimulationState;
use bo_fluids::{CompVec, PhaseVec};
use tracing::{debug, info};

/// Starting pressure and composition for every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InitialConditions {
    /// Reference pressure [Pa], used in cell 0.
    pub pressure: f64,
    /// Composition before pore-volume rescaling.
    pub z: CompVec,
    /// Build a hydrostatic column from cell 0 instead of a uniform pressure.
    pub gravity_column: bool,
}

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Per-cell pressures, uniform or hydrostatic.
///
/// The column assumes an incompressible mixture of constant density `z · rho_s`
/// and zero capillary pressure.
pub fn cell_pressures(
    grid: &dyn Grid,
    fluid: &dyn FluidSystem,
    ic: &InitialConditions,
    gravity: [f64; 3],
) -> Vec<PhaseVec> {
    let n = grid.num_cells();
    if !ic.gravity_column || n == 0 {
        return vec![PhaseVec::uniform(ic.pressure); n];
    }
    let rho = ic.z.dot(&fluid.surface_densities());
    let ref_potential = dot3(grid.cell_centroid(0), gravity);
    (0..n)
        .map(|cell| {
            let potential = dot3(grid.cell_centroid(cell), gravity);
            PhaseVec::uniform(rho * (potential - ref_potential) + ic.pressure)
        })
        .collect()
}

/// Face pressures: the Dirichlet value on pressure boundaries, otherwise the
/// mean of the adjacent cell pressures.
pub fn face_pressures(
    grid: &dyn Grid,
    bc: &BoundaryConditions,
    cell_pressure: &[PhaseVec],
) -> SimResult<Vec<PhaseVec>> {
    (0..grid.num_faces())
        .map(|face| {
            if let Some(p) = bc.dirichlet_pressure(grid.boundary_id(face)) {
                return Ok(PhaseVec::uniform(p));
            }
            let mut sum = PhaseVec::default();
            let mut count = 0usize;
            for cell in grid.face_cells(face).into_iter().flatten() {
                sum += cell_pressure[cell];
                count += 1;
            }
            if count == 0 {
                return Err(SimError::InvalidArg {
                    what: "face has no adjacent cells",
                });
            }
            Ok(sum / count as f64)
        })
        .collect()
}

/// Scale each cell's composition so the implied fluid volume equals the pore volume.
pub fn rescale_to_pore_volume(
    grid: &dyn Grid,
    rock: &dyn Rock,
    fluid: &dyn FluidSystem,
    cell_pressure: &[PhaseVec],
    cell_z: &mut [CompVec],
) -> SimResult<()> {
    for (cell, (p, z)) in cell_pressure.iter().zip(cell_z.iter_mut()).enumerate() {
        let pore_vol = grid.cell_volume(cell) * rock.porosity(cell);
        let fluid_vol = fluid.total_volume(p, z)?;
        if !(fluid_vol.is_finite() && fluid_vol > 0.0) {
            return Err(SimError::NonPhysical {
                what: "initial fluid volume must be positive",
            });
        }
        *z *= pore_vol / fluid_vol;
    }
    Ok(())
}

/// Assemble the time-zero state.
pub fn initial_state(
    grid: &dyn Grid,
    rock: &dyn Rock,
    fluid: &dyn FluidSystem,
    bc: &BoundaryConditions,
    ic: &InitialConditions,
    gravity: [f64; 3],
) -> SimResult<SimulationState> {
    info!("Assuming zero capillary pressures");
    let cell_pressure = cell_pressures(grid, fluid, ic, gravity);
    let mut cell_z = vec![ic.z; grid.num_cells()];
    rescale_to_pore_volume(grid, rock, fluid, &cell_pressure, &mut cell_z)?;
    let face_pressure = face_pressures(grid, bc, &cell_pressure)?;
    debug!(
        cells = grid.num_cells(),
        faces = grid.num_faces(),
        "initial state assembled"
    );
    Ok(SimulationState {
        cell_pressure,
        face_pressure,
        cell_z,
        face_flux: vec![0.0; grid.num_faces()],
        well_pressure: Vec::new(),
        well_flux: Vec::new(),
    })
}
