//! Tabulated PVT curves and the piecewise-linear lookup behind them.
//!
//! A miscible table holds one saturated curve (pressure, ratio, B, viscosity)
//! and one undersaturated branch per saturated point. Each branch starts at its
//! saturated point and continues to higher pressure at that point's ratio.
//!
//! Values and pressure derivatives come from the same linear segment, so a
//! derivative is always the difference quotient of the two samples that
//! produced the value.

use crate::error::{PvtError, PvtResult};

/// Position of an abscissa within a strictly increasing sample vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Bracket {
    lo: usize,
    hi: usize,
    /// Fractional position between `lo` and `hi`; outside [0, 1] when extrapolating.
    weight: f64,
    /// `x_hi - x_lo`, or zero for a single-sample curve.
    width: f64,
}

impl Bracket {
    /// Locate `x` in `xs` by binary search.
    ///
    /// `xs` must be non-empty and strictly increasing. Outside the tabulated
    /// range the end segment is used, which extrapolates linearly.
    pub(crate) fn locate(xs: &[f64], x: f64) -> Self {
        if xs.len() < 2 {
            return Self {
                lo: 0,
                hi: 0,
                weight: 0.0,
                width: 0.0,
            };
        }
        let upper = xs.partition_point(|&xi| xi <= x);
        let lo = upper.saturating_sub(1).min(xs.len() - 2);
        let hi = lo + 1;
        let width = xs[hi] - xs[lo];
        Self {
            lo,
            hi,
            weight: (x - xs[lo]) / width,
            width,
        }
    }

    /// Like [`Bracket::locate`], but pins `x` to the tabulated range.
    pub(crate) fn locate_clamped(xs: &[f64], x: f64) -> Self {
        let mut bracket = Self::locate(xs, x);
        bracket.weight = bracket.weight.clamp(0.0, 1.0);
        bracket
    }

    pub(crate) fn value(&self, ys: &[f64]) -> f64 {
        (1.0 - self.weight) * ys[self.lo] + self.weight * ys[self.hi]
    }

    pub(crate) fn slope(&self, ys: &[f64]) -> f64 {
        if self.width == 0.0 {
            0.0
        } else {
            (ys[self.hi] - ys[self.lo]) / self.width
        }
    }

    pub(crate) fn weight(&self) -> f64 {
        self.weight
    }

    pub(crate) fn indices(&self) -> (usize, usize) {
        (self.lo, self.hi)
    }
}

/// Whether a lookup landed on the saturated curve or on an undersaturated branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaturationState {
    Saturated,
    Undersaturated,
    /// Phase without a dissolved/vaporized component.
    Immiscible,
}

/// Property values and their pressure derivatives at one evaluation point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PvtProps {
    /// Viscosity [Pa·s]
    pub viscosity: f64,
    /// Formation-volume factor [reservoir m³ / surface m³]
    pub b: f64,
    /// Solution or vaporization ratio [surface m³ / surface m³]
    pub r: f64,
    pub dviscosity_dp: f64,
    pub db_dp: f64,
    pub dr_dp: f64,
    pub state: SaturationState,
}

/// One row of a saturated curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaturatedPoint {
    pub pressure: f64,
    pub ratio: f64,
    pub b: f64,
    pub viscosity: f64,
}

/// One sample of a pressure-only curve (undersaturated branch or dead fluid).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressurePoint {
    pub pressure: f64,
    pub b: f64,
    pub viscosity: f64,
}

/// A saturated point together with the undersaturated samples above it.
///
/// The branch may be left empty; it then borrows the relative shape of the
/// nearest branch that has data.
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub saturated: SaturatedPoint,
    pub undersaturated: Vec<PressurePoint>,
}

#[derive(Clone, Copy, Debug)]
struct CurveSample {
    b: f64,
    db_dp: f64,
    viscosity: f64,
    dviscosity_dp: f64,
}

/// B and viscosity as functions of pressure.
#[derive(Clone, Debug, Default, PartialEq)]
struct PressureCurve {
    p: Vec<f64>,
    b: Vec<f64>,
    mu: Vec<f64>,
}

impl PressureCurve {
    fn from_points<'a>(points: impl IntoIterator<Item = &'a PressurePoint>) -> Self {
        let mut curve = Self::default();
        for pt in points {
            curve.p.push(pt.pressure);
            curve.b.push(pt.b);
            curve.mu.push(pt.viscosity);
        }
        curve
    }

    fn sample(&self, pressure: f64) -> CurveSample {
        let at = Bracket::locate(&self.p, pressure);
        CurveSample {
            b: at.value(&self.b),
            db_dp: at.slope(&self.b),
            viscosity: at.value(&self.mu),
            dviscosity_dp: at.slope(&self.mu),
        }
    }

    fn validate(&self, region: usize, what: &str) -> PvtResult<()> {
        check_increasing(region, &format!("{what} pressure"), &self.p)?;
        check_positive(region, &format!("{what} B"), &self.b)?;
        check_positive(region, &format!("{what} viscosity"), &self.mu)
    }
}

fn malformed(region: usize, what: String) -> PvtError {
    PvtError::MalformedTable { region, what }
}

fn check_increasing(region: usize, what: &str, xs: &[f64]) -> PvtResult<()> {
    if let Some(bad) = xs.iter().find(|x| !x.is_finite()) {
        return Err(malformed(region, format!("{what} has non-finite entry {bad}")));
    }
    if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(malformed(
            region,
            format!("{what} not strictly increasing at row {}", i + 1),
        ));
    }
    Ok(())
}

fn check_positive(region: usize, what: &str, ys: &[f64]) -> PvtResult<()> {
    match ys.iter().find(|y| !y.is_finite() || **y <= 0.0) {
        Some(bad) => Err(malformed(region, format!("{what} must be positive, got {bad}"))),
        None => Ok(()),
    }
}

/// Saturated curve plus undersaturated branches for one PVT region.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MiscibleTable {
    sat_p: Vec<f64>,
    sat_r: Vec<f64>,
    sat_b: Vec<f64>,
    sat_mu: Vec<f64>,
    /// `branches[k]` starts at saturated point `k`, at ratio `sat_r[k]`.
    branches: Vec<PressureCurve>,
}

impl MiscibleTable {
    /// Build and validate the table for `region`.
    ///
    /// An empty row list is accepted here and reported as
    /// [`PvtError::EmptyTable`] on first lookup.
    pub fn new(region: usize, rows: Vec<TableRow>) -> PvtResult<Self> {
        let mut table = Self::default();
        for row in &rows {
            table.sat_p.push(row.saturated.pressure);
            table.sat_r.push(row.saturated.ratio);
            table.sat_b.push(row.saturated.b);
            table.sat_mu.push(row.saturated.viscosity);
        }
        check_increasing(region, "saturated pressure", &table.sat_p)?;
        check_increasing(region, "saturated ratio", &table.sat_r)?;
        check_positive(region, "saturated B", &table.sat_b)?;
        check_positive(region, "saturated viscosity", &table.sat_mu)?;

        for (k, row) in rows.iter().enumerate() {
            let anchor = PressurePoint {
                pressure: row.saturated.pressure,
                b: row.saturated.b,
                viscosity: row.saturated.viscosity,
            };
            let extension = if row.undersaturated.is_empty() {
                borrowed_branch(&rows, k)
            } else {
                row.undersaturated.clone()
            };
            let branch = PressureCurve::from_points(std::iter::once(&anchor).chain(&extension));
            branch.validate(region, &format!("undersaturated branch {k}"))?;
            table.branches.push(branch);
        }
        Ok(table)
    }

    pub fn is_empty(&self) -> bool {
        self.sat_p.is_empty()
    }

    /// Number of saturated points.
    pub fn len(&self) -> usize {
        self.sat_p.len()
    }

    /// Pressure range covered by the saturated curve.
    pub fn saturated_pressure_range(&self) -> Option<(f64, f64)> {
        Some((*self.sat_p.first()?, *self.sat_p.last()?))
    }

    /// Saturated ratio at `pressure`.
    pub(crate) fn saturated_ratio(&self, pressure: f64) -> f64 {
        Bracket::locate(&self.sat_p, pressure).value(&self.sat_r)
    }

    /// Evaluate properties at `pressure` for a cell holding `ratio`.
    ///
    /// The table must be non-empty.
    pub(crate) fn evaluate(&self, pressure: f64, ratio: f64) -> PvtProps {
        let sat = Bracket::locate(&self.sat_p, pressure);
        let r_sat = sat.value(&self.sat_r);
        // Richer than the curve allows: pinned to saturated.
        if ratio >= r_sat {
            return PvtProps {
                viscosity: sat.value(&self.sat_mu),
                b: sat.value(&self.sat_b),
                r: r_sat,
                dviscosity_dp: sat.slope(&self.sat_mu),
                db_dp: sat.slope(&self.sat_b),
                dr_dp: sat.slope(&self.sat_r),
                state: SaturationState::Saturated,
            };
        }

        let by_ratio = Bracket::locate_clamped(&self.sat_r, ratio);
        let (lo, hi) = by_ratio.indices();
        let lower = self.branches[lo].sample(pressure);
        let upper = self.branches[hi].sample(pressure);
        let w = by_ratio.weight();
        let mix = |a: f64, b: f64| (1.0 - w) * a + w * b;
        PvtProps {
            viscosity: mix(lower.viscosity, upper.viscosity),
            b: mix(lower.b, upper.b),
            r: ratio,
            dviscosity_dp: mix(lower.dviscosity_dp, upper.dviscosity_dp),
            db_dp: mix(lower.db_dp, upper.db_dp),
            dr_dp: 0.0,
            state: SaturationState::Undersaturated,
        }
    }
}

/// Synthesize undersaturated samples for row `k` from the nearest row with data,
/// preferring higher ratios. Pressure offsets are copied; B and viscosity keep
/// the donor's ratio to its own saturated value.
fn borrowed_branch(rows: &[TableRow], k: usize) -> Vec<PressurePoint> {
    let has_data = |j: &usize| !rows[*j].undersaturated.is_empty();
    let donor = (k + 1..rows.len())
        .find(has_data)
        .or_else(|| (0..k).rev().find(has_data));
    let Some(j) = donor else {
        return Vec::new();
    };
    let own = rows[k].saturated;
    let base = rows[j].saturated;
    rows[j]
        .undersaturated
        .iter()
        .map(|pt| PressurePoint {
            pressure: own.pressure + (pt.pressure - base.pressure),
            b: own.b * pt.b / base.b,
            viscosity: own.viscosity * pt.viscosity / base.viscosity,
        })
        .collect()
}

/// Pressure-only table for a phase without dissolved components.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeadTable {
    curve: PressureCurve,
}

impl DeadTable {
    pub fn new(region: usize, points: Vec<PressurePoint>) -> PvtResult<Self> {
        let curve = PressureCurve::from_points(&points);
        curve.validate(region, "dead fluid")?;
        Ok(Self { curve })
    }

    pub fn is_empty(&self) -> bool {
        self.curve.p.is_empty()
    }

    pub(crate) fn evaluate(&self, pressure: f64) -> PvtProps {
        let s = self.curve.sample(pressure);
        PvtProps {
            viscosity: s.viscosity,
            b: s.b,
            r: 0.0,
            dviscosity_dp: s.dviscosity_dp,
            db_dp: s.db_dp,
            dr_dp: 0.0,
            state: SaturationState::Immiscible,
        }
    }
}
