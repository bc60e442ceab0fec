//! Phase and component indexing for the three-phase black-oil model.

use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign};

pub const NUM_PHASES: usize = 3;
pub const NUM_COMPONENTS: usize = 3;

/// Fluid phase. Discriminants double as storage indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Aqua = 0,
    Liquid = 1,
    Vapour = 2,
}

impl Phase {
    pub const ALL: [Phase; NUM_PHASES] = [Phase::Aqua, Phase::Liquid, Phase::Vapour];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Aqua => "aqua",
            Phase::Liquid => "liquid",
            Phase::Vapour => "vapour",
        }
    }
}

/// Surface component. Discriminants double as storage indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Water = 0,
    Oil = 1,
    Gas = 2,
}

impl Component {
    pub const ALL: [Component; NUM_COMPONENTS] = [Component::Water, Component::Oil, Component::Gas];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One scalar per phase (typically phase pressures).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseVec(pub [f64; NUM_PHASES]);

impl PhaseVec {
    /// Same value for every phase (zero capillary pressure).
    pub fn uniform(v: f64) -> Self {
        Self([v; NUM_PHASES])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Index<Phase> for PhaseVec {
    type Output = f64;
    fn index(&self, phase: Phase) -> &f64 {
        &self.0[phase.index()]
    }
}

impl IndexMut<Phase> for PhaseVec {
    fn index_mut(&mut self, phase: Phase) -> &mut f64 {
        &mut self.0[phase.index()]
    }
}

impl Add for PhaseVec {
    type Output = PhaseVec;
    fn add(mut self, rhs: PhaseVec) -> PhaseVec {
        self += rhs;
        self
    }
}

impl AddAssign for PhaseVec {
    fn add_assign(&mut self, rhs: PhaseVec) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl Div<f64> for PhaseVec {
    type Output = PhaseVec;
    fn div(self, rhs: f64) -> PhaseVec {
        PhaseVec(self.0.map(|v| v / rhs))
    }
}

/// One scalar per component, in surface volumes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CompVec(pub [f64; NUM_COMPONENTS]);

impl CompVec {
    pub fn new(water: f64, oil: f64, gas: f64) -> Self {
        Self([water, oil, gas])
    }

    /// Every component set to `v`.
    pub fn uniform(v: f64) -> Self {
        Self([v; NUM_COMPONENTS])
    }

    pub fn dot(&self, other: &CompVec) -> f64 {
        self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Index<Component> for CompVec {
    type Output = f64;
    fn index(&self, comp: Component) -> &f64 {
        &self.0[comp.index()]
    }
}

impl IndexMut<Component> for CompVec {
    fn index_mut(&mut self, comp: Component) -> &mut f64 {
        &mut self.0[comp.index()]
    }
}

impl Mul<f64> for CompVec {
    type Output = CompVec;
    fn mul(self, rhs: f64) -> CompVec {
        CompVec(self.0.map(|v| v * rhs))
    }
}

impl MulAssign<f64> for CompVec {
    fn mul_assign(&mut self, rhs: f64) {
        for v in &mut self.0 {
            *v *= rhs;
        }
    }
}
