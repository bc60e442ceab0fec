//! Per-step output: legacy VTK and a plain whitespace-delimited dump.

use crate::collaborators::Grid;
use crate::error::SimResult;
use crate::state::SimulationState;
use bo_fluids::{Component, Phase};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const OUTPUT_BASENAME: &str = "blackoil-output";

/// Receives the state after every accepted step.
pub trait OutputSink {
    fn write_step(&mut self, step: usize, grid: &dyn Grid, state: &SimulationState)
    -> SimResult<()>;
}

/// Cell velocities reconstructed from face fluxes.
///
/// Sums `(x_face - x_cell) * outward_flux` over the faces of each cell and
/// divides by the cell volume. Exact for uniform flow on a Cartesian cell.
pub fn estimate_cell_velocity(grid: &dyn Grid, face_flux: &[f64]) -> Vec<[f64; 3]> {
    let mut velocity = vec![[0.0; 3]; grid.num_cells()];
    for (face, &flux) in face_flux.iter().enumerate().take(grid.num_faces()) {
        let xf = grid.face_centroid(face);
        let cells = grid.face_cells(face);
        for (side, cell) in cells.iter().enumerate() {
            let Some(cell) = *cell else { continue };
            let outward = if side == 0 { flux } else { -flux };
            let xc = grid.cell_centroid(cell);
            for d in 0..3 {
                velocity[cell][d] += (xf[d] - xc[d]) * outward;
            }
        }
    }
    for (cell, v) in velocity.iter_mut().enumerate() {
        let vol = grid.cell_volume(cell);
        for x in v.iter_mut() {
            *x /= vol;
        }
    }
    velocity
}

/// Writes `<dir>/blackoil-output-<step>.vtk` and `.dat` for each accepted step.
#[derive(Clone, Debug)]
pub struct FileOutput {
    dir: PathBuf,
}

impl FileOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vtk_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("{OUTPUT_BASENAME}-{step}.vtk"))
    }

    pub fn dat_path(&self, step: usize) -> PathBuf {
        self.dir.join(format!("{OUTPUT_BASENAME}-{step}.dat"))
    }
}

impl OutputSink for FileOutput {
    fn write_step(
        &mut self,
        step: usize,
        grid: &dyn Grid,
        state: &SimulationState,
    ) -> SimResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        if let Some(vtk) = render_vtk(step, grid, state) {
            fs::write(self.vtk_path(step), vtk)?;
        } else {
            debug!(step, "grid has no structured view; skipping VTK output");
        }
        fs::write(self.dat_path(step), render_dat(state))?;
        Ok(())
    }
}

/// Legacy ASCII VTK structured-points dataset with per-cell field arrays.
pub fn render_vtk(step: usize, grid: &dyn Grid, state: &SimulationState) -> Option<String> {
    let view = grid.structured_view()?;
    let n = grid.num_cells();
    let velocity = estimate_cell_velocity(grid, &state.face_flux);

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "# vtk DataFile Version 3.0");
    let _ = writeln!(out, "{OUTPUT_BASENAME} step {step}");
    let _ = writeln!(out, "ASCII");
    let _ = writeln!(out, "DATASET STRUCTURED_POINTS");
    let [nx, ny, nz] = view.dims;
    let _ = writeln!(out, "DIMENSIONS {} {} {}", nx + 1, ny + 1, nz + 1);
    let [ox, oy, oz] = view.origin;
    let _ = writeln!(out, "ORIGIN {ox} {oy} {oz}");
    let [sx, sy, sz] = view.spacing;
    let _ = writeln!(out, "SPACING {sx} {sy} {sz}");
    let _ = writeln!(out, "CELL_DATA {n}");
    let _ = writeln!(out, "FIELD FieldData 3");

    let _ = writeln!(out, "pressure {} {n} double", Phase::ALL.len());
    for p in &state.cell_pressure {
        write_row(&mut out, p.as_slice());
    }
    let _ = writeln!(out, "velocity 3 {n} double");
    for v in &velocity {
        write_row(&mut out, v);
    }
    let _ = writeln!(out, "z {} {n} double", Component::ALL.len());
    for z in &state.cell_z {
        write_row(&mut out, z.as_slice());
    }
    Some(out)
}

/// Line 1: liquid pressure per cell. Then one line per component.
pub fn render_dat(state: &SimulationState) -> String {
    let mut out = String::new();
    for p in &state.cell_pressure {
        let _ = write!(out, "{} ", p[Phase::Liquid]);
    }
    out.push('\n');
    for comp in Component::ALL {
        for z in &state.cell_z {
            let _ = write!(out, "{} ", z[comp]);
        }
        out.push('\n');
    }
    out
}

fn write_row(out: &mut String, values: &[f64]) {
    let row: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    out.push_str(&row.join(" "));
    out.push('\n');
}
