//! Flow boundary conditions keyed by boundary identifier.

use crate::error::{SimError, SimResult};

/// Condition applied on every face carrying a given boundary identifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowBc {
    /// Prescribed flux [m³/s]; zero is a no-flow boundary.
    Neumann { flux: f64 },
    /// Prescribed pressure [Pa].
    Dirichlet { pressure: f64 },
}

impl Default for FlowBc {
    fn default() -> Self {
        FlowBc::Neumann { flux: 0.0 }
    }
}

/// Boundary identifiers 1-6 of a Cartesian grid, plus the interior id 0.
pub const CARTESIAN_BOUNDARY_IDS: usize = 7;

#[derive(Clone, Debug, PartialEq)]
pub struct BoundaryConditions {
    conds: Vec<FlowBc>,
}

impl BoundaryConditions {
    /// `count` identifiers, all no-flow.
    pub fn no_flow(count: usize) -> Self {
        Self {
            conds: vec![FlowBc::default(); count],
        }
    }

    /// Pressure drive across the domain: id 1 at `inflow`, id 2 at `outflow`.
    pub fn pressure_drive(inflow: f64, outflow: f64) -> Self {
        let mut bc = Self::no_flow(CARTESIAN_BOUNDARY_IDS);
        bc.conds[1] = FlowBc::Dirichlet { pressure: inflow };
        bc.conds[2] = FlowBc::Dirichlet { pressure: outflow };
        bc
    }

    pub fn set(&mut self, id: usize, bc: FlowBc) -> SimResult<()> {
        if id == 0 {
            return Err(SimError::InvalidArg {
                what: "boundary id 0 is reserved for interior faces",
            });
        }
        if id >= self.conds.len() {
            self.conds.resize(id + 1, FlowBc::default());
        }
        self.conds[id] = bc;
        Ok(())
    }

    /// Condition for `id`; unknown ids are no-flow.
    pub fn get(&self, id: usize) -> FlowBc {
        self.conds.get(id).copied().unwrap_or_default()
    }

    pub fn dirichlet_pressure(&self, id: usize) -> Option<f64> {
        match self.get(id) {
            FlowBc::Dirichlet { pressure } => Some(pressure),
            FlowBc::Neumann { .. } => None,
        }
    }

    pub fn len(&self) -> usize {
        self.conds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conds.is_empty()
    }
}

impl Default for BoundaryConditions {
    fn default() -> Self {
        Self::no_flow(CARTESIAN_BOUNDARY_IDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_drive_sets_two_ids() {
        let bc = BoundaryConditions::pressure_drive(3.0e7, 1.0e7);
        assert_eq!(bc.dirichlet_pressure(1), Some(3.0e7));
        assert_eq!(bc.dirichlet_pressure(2), Some(1.0e7));
        assert_eq!(bc.dirichlet_pressure(0), None);
        assert_eq!(bc.get(42), FlowBc::Neumann { flux: 0.0 });
    }

    #[test]
    fn set_grows_and_rejects_interior() {
        let mut bc = BoundaryConditions::no_flow(2);
        bc.set(9, FlowBc::Dirichlet { pressure: 1.0 }).unwrap();
        assert_eq!(bc.len(), 10);
        assert!(bc.set(0, FlowBc::default()).is_err());
    }
}
