//! Generated Cartesian grid and uniform rock.
//!
//! Faces are numbered x-faces first, then y-faces, then z-faces; within each
//! family the fastest index is x. Boundary ids follow the usual convention:
//! 1/2 at x-min/x-max, 3/4 at y-min/y-max, 5/6 at z-min/z-max, 0 inside.

use crate::collaborators::{Grid, Rock, StructuredView};
use crate::error::{SimError, SimResult};
use bo_core::{ensure_non_negative, ensure_positive};

#[derive(Clone, Debug, PartialEq)]
pub struct CartesianGrid {
    dims: [usize; 3],
    cell_size: [f64; 3],
    /// Offset of the first face of each family.
    face_offsets: [usize; 3],
    num_faces: usize,
}

impl CartesianGrid {
    pub fn new(dims: [usize; 3], cell_size: [f64; 3]) -> SimResult<Self> {
        if dims.iter().any(|&n| n == 0) {
            return Err(SimError::InvalidArg {
                what: "cell counts must be positive",
            });
        }
        for d in cell_size {
            ensure_positive(d, "cell sizes must be positive and finite")?;
        }
        let [nx, ny, nz] = dims;
        let x_faces = (nx + 1) * ny * nz;
        let y_faces = nx * (ny + 1) * nz;
        let z_faces = nx * ny * (nz + 1);
        Ok(Self {
            dims,
            cell_size,
            face_offsets: [0, x_faces, x_faces + y_faces],
            num_faces: x_faces + y_faces + z_faces,
        })
    }

    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn cell_size(&self) -> [f64; 3] {
        self.cell_size
    }

    fn cell_index(&self, ijk: [usize; 3]) -> usize {
        ijk[0] + self.dims[0] * (ijk[1] + self.dims[1] * ijk[2])
    }

    fn cell_ijk(&self, cell: usize) -> [usize; 3] {
        let [nx, ny, _] = self.dims;
        [cell % nx, (cell / nx) % ny, cell / (nx * ny)]
    }

    /// Axis of `face` and its lattice position within that axis' face family.
    fn face_ijk(&self, face: usize) -> (usize, [usize; 3]) {
        let axis = if face >= self.face_offsets[2] {
            2
        } else if face >= self.face_offsets[1] {
            1
        } else {
            0
        };
        let mut extent = self.dims;
        extent[axis] += 1;
        let local = face - self.face_offsets[axis];
        let ijk = [
            local % extent[0],
            (local / extent[0]) % extent[1],
            local / (extent[0] * extent[1]),
        ];
        (axis, ijk)
    }
}

impl Grid for CartesianGrid {
    fn num_cells(&self) -> usize {
        self.dims.iter().product()
    }

    fn num_faces(&self) -> usize {
        self.num_faces
    }

    fn face_cells(&self, face: usize) -> [Option<usize>; 2] {
        let (axis, ijk) = self.face_ijk(face);
        let lower = (ijk[axis] > 0).then(|| {
            let mut c = ijk;
            c[axis] -= 1;
            self.cell_index(c)
        });
        let upper = (ijk[axis] < self.dims[axis]).then(|| self.cell_index(ijk));
        [lower, upper]
    }

    fn cell_centroid(&self, cell: usize) -> [f64; 3] {
        let ijk = self.cell_ijk(cell);
        std::array::from_fn(|d| (ijk[d] as f64 + 0.5) * self.cell_size[d])
    }

    fn cell_volume(&self, _cell: usize) -> f64 {
        self.cell_size.iter().product()
    }

    fn face_centroid(&self, face: usize) -> [f64; 3] {
        let (axis, ijk) = self.face_ijk(face);
        std::array::from_fn(|d| {
            let offset = if d == axis { 0.0 } else { 0.5 };
            (ijk[d] as f64 + offset) * self.cell_size[d]
        })
    }

    fn boundary_id(&self, face: usize) -> usize {
        let (axis, ijk) = self.face_ijk(face);
        if ijk[axis] == 0 {
            2 * axis + 1
        } else if ijk[axis] == self.dims[axis] {
            2 * axis + 2
        } else {
            0
        }
    }

    fn structured_view(&self) -> Option<StructuredView> {
        Some(StructuredView {
            dims: self.dims,
            origin: [0.0; 3],
            spacing: self.cell_size,
        })
    }
}

/// Same porosity and permeability in every cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformRock {
    porosity: f64,
    permeability: f64,
}

impl UniformRock {
    pub fn new(porosity: f64, permeability: f64) -> SimResult<Self> {
        if !(porosity > 0.0 && porosity <= 1.0) {
            return Err(SimError::InvalidArg {
                what: "porosity must be in (0, 1]",
            });
        }
        ensure_non_negative(permeability, "permeability must be non-negative")?;
        Ok(Self {
            porosity,
            permeability,
        })
    }
}

impl Rock for UniformRock {
    fn porosity(&self, _cell: usize) -> f64 {
        self.porosity
    }

    fn permeability(&self, _cell: usize) -> f64 {
        self.permeability
    }
}
