//! Pressure sweeps at fixed composition.
//!
//! Used to tabulate a model over a pressure range for inspection or plotting.

use crate::error::{PvtError, PvtResult};
use crate::model::PvtModel;
use crate::phase::CompVec;
use crate::table::PvtProps;
use rayon::prelude::*;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepType {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Pressure range to sample, in Pa.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureSweep {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    pub sweep_type: SweepType,
}

impl PressureSweep {
    pub fn new(start: f64, end: f64, num_points: usize, sweep_type: SweepType) -> PvtResult<Self> {
        if num_points < 2 {
            return Err(PvtError::LengthMismatch {
                what: "sweep points (at least 2)",
                expected: 2,
                actual: num_points,
            });
        }
        for v in [start, end] {
            if !v.is_finite() {
                return Err(PvtError::NonFinite {
                    what: "sweep bound",
                    value: v,
                });
            }
            if v < 0.0 {
                return Err(PvtError::NegativePressure { value: v });
            }
        }
        Ok(Self {
            start,
            end,
            num_points,
            sweep_type,
        })
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.sweep_type {
            SweepType::Logarithmic if self.start > 0.0 && self.end > 0.0 => {
                let (a, b) = (self.start.ln(), self.end.ln());
                self.spaced(|t| (a + t * (b - a)).exp())
            }
            _ => self.spaced(|t| self.start + t * (self.end - self.start)),
        }
    }

    fn spaced(&self, at: impl Fn(f64) -> f64) -> Vec<f64> {
        let last = (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points).map(|i| at(i as f64 / last)).collect();
        // Ensure exact endpoints
        points[0] = self.start;
        points[self.num_points - 1] = self.end;
        points
    }
}

/// Evaluate `model` at every sweep pressure for one region and composition.
pub fn execute_pressure_sweep(
    model: &PvtModel,
    region: usize,
    surfvol: &CompVec,
    sweep: &PressureSweep,
) -> PvtResult<Vec<(f64, PvtProps)>> {
    sweep
        .generate_points()
        .into_par_iter()
        .map(|p| Ok((p, model.evaluate(region, p, surfvol)?)))
        .collect()
}
