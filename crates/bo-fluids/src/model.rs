//! PVT property model: enum dispatch over fluid families.
//!
//! All variants share one contract: given a region, a pressure and a
//! surface-volume composition, return viscosity, B, R and their pressure
//! derivatives for the variant's phase. Tables are immutable after
//! construction, so evaluation is a pure function and the batched entry
//! points fan out over rayon without any shared mutable state.

use crate::error::{PvtError, PvtResult};
use crate::phase::{CompVec, Component, Phase, PhaseVec};
use crate::table::{DeadTable, MiscibleTable, PvtProps};
use rayon::prelude::*;

/// One table per PVT region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionTables<T> {
    tables: Vec<T>,
}

impl<T> RegionTables<T> {
    pub fn new(tables: Vec<T>) -> Self {
        Self { tables }
    }

    pub fn num_regions(&self) -> usize {
        self.tables.len()
    }

    pub fn get(&self, region: usize) -> PvtResult<&T> {
        self.tables.get(region).ok_or(PvtError::RegionOutOfRange {
            region,
            regions: self.tables.len(),
        })
    }
}

/// PVT behaviour of a single phase.
#[derive(Clone, Debug, PartialEq)]
pub enum PvtModel {
    /// Wet gas carrying vaporized oil; ratio = surface oil / surface gas.
    LiveGas(RegionTables<MiscibleTable>),
    /// Live oil carrying dissolved gas; ratio = surface gas / surface oil.
    LiveOil(RegionTables<MiscibleTable>),
    /// Pressure-only behaviour, no dissolved component.
    Dead {
        phase: Phase,
        tables: RegionTables<DeadTable>,
    },
}

impl PvtModel {
    /// Model name (for logging).
    pub fn name(&self) -> &'static str {
        match self {
            PvtModel::LiveGas(_) => "live gas",
            PvtModel::LiveOil(_) => "live oil",
            PvtModel::Dead { .. } => "dead",
        }
    }

    /// Phase whose properties this model describes.
    pub fn phase(&self) -> Phase {
        match self {
            PvtModel::LiveGas(_) => Phase::Vapour,
            PvtModel::LiveOil(_) => Phase::Liquid,
            PvtModel::Dead { phase, .. } => *phase,
        }
    }

    pub fn num_regions(&self) -> usize {
        match self {
            PvtModel::LiveGas(t) | PvtModel::LiveOil(t) => t.num_regions(),
            PvtModel::Dead { tables, .. } => tables.num_regions(),
        }
    }

    /// Local dissolved/vaporized ratio implied by a surface-volume composition.
    ///
    /// Returns 0 for a dead model. With no reference component present the
    /// ratio is 0 if the dissolving component is absent too, otherwise infinite
    /// (which always lands on the saturated curve).
    pub fn ratio(&self, surfvol: &CompVec) -> f64 {
        let (dissolved, carrier) = match self {
            PvtModel::LiveGas(_) => (surfvol[Component::Oil], surfvol[Component::Gas]),
            PvtModel::LiveOil(_) => (surfvol[Component::Gas], surfvol[Component::Oil]),
            PvtModel::Dead { .. } => return 0.0,
        };
        match bo_core::checked_ratio(dissolved, carrier) {
            Some(r) => r,
            None if dissolved > 0.0 => f64::INFINITY,
            None => 0.0,
        }
    }

    /// Evaluate all properties and pressure derivatives at one point.
    pub fn evaluate(&self, region: usize, pressure: f64, surfvol: &CompVec) -> PvtResult<PvtProps> {
        check_pressure(pressure)?;
        check_surface_volumes(surfvol)?;
        match self {
            PvtModel::LiveGas(tables) | PvtModel::LiveOil(tables) => {
                let table = tables.get(region)?;
                if table.is_empty() {
                    return Err(PvtError::EmptyTable { region });
                }
                Ok(table.evaluate(pressure, self.ratio(surfvol)))
            }
            PvtModel::Dead { tables, .. } => {
                let table = tables.get(region)?;
                if table.is_empty() {
                    return Err(PvtError::EmptyTable { region });
                }
                Ok(table.evaluate(pressure))
            }
        }
    }

    /// Ratio on the saturated curve at `pressure` (0 for a dead model).
    pub fn saturated_ratio(&self, region: usize, pressure: f64) -> PvtResult<f64> {
        check_pressure(pressure)?;
        match self {
            PvtModel::LiveGas(tables) | PvtModel::LiveOil(tables) => {
                let table = tables.get(region)?;
                if table.is_empty() {
                    return Err(PvtError::EmptyTable { region });
                }
                Ok(table.saturated_ratio(pressure))
            }
            PvtModel::Dead { tables, .. } => {
                tables.get(region)?;
                Ok(0.0)
            }
        }
    }

    pub fn viscosity(&self, region: usize, pressure: f64, surfvol: &CompVec) -> PvtResult<f64> {
        Ok(self.evaluate(region, pressure, surfvol)?.viscosity)
    }

    pub fn b(&self, region: usize, pressure: f64, surfvol: &CompVec) -> PvtResult<f64> {
        Ok(self.evaluate(region, pressure, surfvol)?.b)
    }

    pub fn db_dp(&self, region: usize, pressure: f64, surfvol: &CompVec) -> PvtResult<f64> {
        Ok(self.evaluate(region, pressure, surfvol)?.db_dp)
    }

    pub fn r(&self, region: usize, pressure: f64, surfvol: &CompVec) -> PvtResult<f64> {
        Ok(self.evaluate(region, pressure, surfvol)?.r)
    }

    pub fn dr_dp(&self, region: usize, pressure: f64, surfvol: &CompVec) -> PvtResult<f64> {
        Ok(self.evaluate(region, pressure, surfvol)?.dr_dp)
    }

    /// Evaluate every cell independently, using `pressures[i][phase]`.
    ///
    /// Element `i` of the output is exactly what [`PvtModel::evaluate`] returns
    /// for element `i` of the inputs.
    pub fn evaluate_batch(
        &self,
        regions: &[usize],
        pressures: &[PhaseVec],
        surfvol: &[CompVec],
        phase: Phase,
    ) -> PvtResult<Vec<PvtProps>> {
        check_len("surface volumes", pressures.len(), surfvol.len())?;
        check_len("regions", pressures.len(), regions.len())?;
        pressures
            .par_iter()
            .zip(surfvol.par_iter())
            .zip(regions.par_iter())
            .map(|((p, z), &region)| self.evaluate(region, p[phase], z))
            .collect()
    }

    pub fn viscosity_batch(
        &self,
        regions: &[usize],
        pressures: &[PhaseVec],
        surfvol: &[CompVec],
        phase: Phase,
    ) -> PvtResult<Vec<f64>> {
        let props = self.evaluate_batch(regions, pressures, surfvol, phase)?;
        Ok(props.iter().map(|p| p.viscosity).collect())
    }

    pub fn b_batch(
        &self,
        regions: &[usize],
        pressures: &[PhaseVec],
        surfvol: &[CompVec],
        phase: Phase,
    ) -> PvtResult<Vec<f64>> {
        let props = self.evaluate_batch(regions, pressures, surfvol, phase)?;
        Ok(props.iter().map(|p| p.b).collect())
    }

    /// B and dB/dp as parallel arrays.
    pub fn db_dp_batch(
        &self,
        regions: &[usize],
        pressures: &[PhaseVec],
        surfvol: &[CompVec],
        phase: Phase,
    ) -> PvtResult<(Vec<f64>, Vec<f64>)> {
        let props = self.evaluate_batch(regions, pressures, surfvol, phase)?;
        Ok(props.iter().map(|p| (p.b, p.db_dp)).unzip())
    }

    pub fn r_batch(
        &self,
        regions: &[usize],
        pressures: &[PhaseVec],
        surfvol: &[CompVec],
        phase: Phase,
    ) -> PvtResult<Vec<f64>> {
        let props = self.evaluate_batch(regions, pressures, surfvol, phase)?;
        Ok(props.iter().map(|p| p.r).collect())
    }

    /// R and dR/dp as parallel arrays.
    pub fn dr_dp_batch(
        &self,
        regions: &[usize],
        pressures: &[PhaseVec],
        surfvol: &[CompVec],
        phase: Phase,
    ) -> PvtResult<(Vec<f64>, Vec<f64>)> {
        let props = self.evaluate_batch(regions, pressures, surfvol, phase)?;
        Ok(props.iter().map(|p| (p.r, p.dr_dp)).unzip())
    }
}

fn check_pressure(pressure: f64) -> PvtResult<()> {
    if !pressure.is_finite() {
        return Err(PvtError::NonFinite {
            what: "pressure",
            value: pressure,
        });
    }
    if pressure < 0.0 {
        return Err(PvtError::NegativePressure { value: pressure });
    }
    Ok(())
}

fn check_surface_volumes(surfvol: &CompVec) -> PvtResult<()> {
    for &v in surfvol.as_slice() {
        if !v.is_finite() {
            return Err(PvtError::NonFinite {
                what: "surface volume",
                value: v,
            });
        }
        if v < 0.0 {
            return Err(PvtError::NegativeSurfaceVolume { value: v });
        }
    }
    Ok(())
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> PvtResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(PvtError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{PressurePoint, SaturatedPoint, TableRow};

    fn live_gas() -> PvtModel {
        let table = MiscibleTable::new(
            0,
            vec![
                TableRow {
                    saturated: SaturatedPoint {
                        pressure: 1.0e6,
                        ratio: 1.0e-5,
                        b: 0.1,
                        viscosity: 1.5e-5,
                    },
                    undersaturated: vec![PressurePoint {
                        pressure: 2.0e6,
                        b: 0.05,
                        viscosity: 1.6e-5,
                    }],
                },
                TableRow {
                    saturated: SaturatedPoint {
                        pressure: 2.0e6,
                        ratio: 3.0e-5,
                        b: 0.06,
                        viscosity: 1.8e-5,
                    },
                    undersaturated: vec![PressurePoint {
                        pressure: 3.0e6,
                        b: 0.04,
                        viscosity: 1.9e-5,
                    }],
                },
            ],
        )
        .unwrap();
        PvtModel::LiveGas(RegionTables::new(vec![table]))
    }

    #[test]
    fn live_gas_ratio_is_oil_over_gas() {
        let m = live_gas();
        assert_eq!(m.phase(), Phase::Vapour);
        assert_eq!(m.ratio(&CompVec::new(0.0, 2.0, 4.0)), 0.5);
        assert_eq!(m.ratio(&CompVec::new(1.0, 0.0, 0.0)), 0.0);
        assert_eq!(m.ratio(&CompVec::new(0.0, 1.0, 0.0)), f64::INFINITY);
    }

    #[test]
    fn region_out_of_range_is_configuration_error() {
        let m = live_gas();
        let err = m.evaluate(1, 1.0e6, &CompVec::new(0.0, 0.0, 1.0)).unwrap_err();
        assert_eq!(
            err,
            PvtError::RegionOutOfRange {
                region: 1,
                regions: 1
            }
        );
    }

    #[test]
    fn negative_pressure_is_domain_error() {
        let m = live_gas();
        let err = m.b(0, -1.0, &CompVec::new(0.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, PvtError::NegativePressure { .. }));
        assert!(m.b(0, f64::NAN, &CompVec::new(0.0, 0.0, 1.0)).is_err());
    }

    #[test]
    fn non_finite_inputs_are_domain_errors() {
        let m = live_gas();
        let err = m
            .evaluate(0, f64::INFINITY, &CompVec::new(0.0, 1.0e-5, 1.0))
            .unwrap_err();
        assert!(matches!(err, PvtError::NonFinite { what: "pressure", .. }));
        assert!(m.saturated_ratio(0, f64::INFINITY).is_err());

        let err = m
            .evaluate(0, 1.5e6, &CompVec::new(0.0, f64::NAN, 1.0))
            .unwrap_err();
        assert!(matches!(err, PvtError::NonFinite { what: "surface volume", .. }));
        assert_eq!(err.kind(), crate::PvtErrorKind::Domain);

        let err = m
            .evaluate(0, 1.5e6, &CompVec::new(0.0, 1.0e-5, -1.0))
            .unwrap_err();
        assert_eq!(err, PvtError::NegativeSurfaceVolume { value: -1.0 });
    }

    #[test]
    fn empty_region_is_data_error() {
        let m = PvtModel::LiveOil(RegionTables::new(vec![MiscibleTable::new(0, vec![]).unwrap()]));
        let err = m.viscosity(0, 1.0e6, &CompVec::new(0.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(err, PvtError::EmptyTable { region: 0 });
    }

    #[test]
    fn batch_length_mismatch() {
        let m = live_gas();
        let err = m
            .evaluate_batch(&[0], &[PhaseVec::uniform(1.0e6)], &[], Phase::Vapour)
            .unwrap_err();
        assert!(matches!(err, PvtError::LengthMismatch { .. }));
    }

    #[test]
    fn batch_derivative_pairs() {
        let m = live_gas();
        let pressures = [PhaseVec::uniform(1.5e6), PhaseVec::uniform(2.5e6)];
        let surfvol = [CompVec::new(0.0, 1.0, 1.0), CompVec::new(0.0, 1.0e-5, 1.0)];
        let (b, db) = m
            .db_dp_batch(&[0, 0], &pressures, &surfvol, Phase::Vapour)
            .unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0], m.b(0, 1.5e6, &surfvol[0]).unwrap());
        assert_eq!(db[1], m.db_dp(0, 2.5e6, &surfvol[1]).unwrap());
    }
}
