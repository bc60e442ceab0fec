//! Run configuration and PVT table file schemas.
//!
//! Field units are in the names: pressures in bar, times in days, viscosity in
//! centipoise, permeability in millidarcy. Conversion to SI happens in
//! [`crate::convert`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub name: String,
    pub fileformat: FileFormatDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    /// Flow boundary conditions. Empty means the standard pressure drive.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<BoundaryDef>,
    /// PVT table file, relative to the configuration file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvt_tables: Option<String>,
}

fn default_version() -> u32 {
    crate::validate::LATEST_VERSION
}

/// Where the grid and rock come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FileFormatDef {
    /// Generated box grid with uniform rock.
    Cartesian {
        #[serde(default = "one")]
        nx: usize,
        #[serde(default = "one")]
        ny: usize,
        #[serde(default = "one")]
        nz: usize,
        #[serde(default = "unit_length")]
        dx: f64,
        #[serde(default = "unit_length")]
        dy: f64,
        #[serde(default = "unit_length")]
        dz: f64,
        #[serde(default = "default_poro")]
        default_poro: f64,
        #[serde(default = "default_perm_md")]
        default_perm_md: f64,
    },
    /// Corner-point grid read from an industry-format deck.
    Eclipse {
        filename: String,
        #[serde(default)]
        z_tolerance: f64,
        #[serde(default)]
        periodic_extension: bool,
        #[serde(default)]
        turn_normals: bool,
        #[serde(default)]
        perm_threshold_md: f64,
    },
}

impl Default for FileFormatDef {
    fn default() -> Self {
        FileFormatDef::Cartesian {
            nx: one(),
            ny: one(),
            nz: one(),
            dx: unit_length(),
            dy: unit_length(),
            dz: unit_length(),
            default_poro: default_poro(),
            default_perm_md: default_perm_md(),
        }
    }
}

fn one() -> usize {
    1
}

fn unit_length() -> f64 {
    1.0
}

fn default_poro() -> f64 {
    1.0
}

fn default_perm_md() -> f64 {
    100.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportSchemeDef {
    Legacy,
    #[default]
    Current,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default = "default_total_time_days")]
    pub total_time_days: f64,
    #[serde(default = "default_initial_stepsize_days")]
    pub initial_stepsize_days: f64,
    #[serde(default)]
    pub do_impes: bool,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub gravity_test: bool,
    #[serde(default)]
    pub transport_scheme: TransportSchemeDef,
    #[serde(default = "default_initial_pressure_bar")]
    pub initial_pressure_bar: f64,
    #[serde(default = "default_boundary_pressure_bar")]
    pub boundary_pressure_bar: f64,
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            total_time_days: default_total_time_days(),
            initial_stepsize_days: default_initial_stepsize_days(),
            do_impes: false,
            output_dir: default_output_dir(),
            gravity_test: false,
            transport_scheme: TransportSchemeDef::default(),
            initial_pressure_bar: default_initial_pressure_bar(),
            boundary_pressure_bar: default_boundary_pressure_bar(),
        }
    }
}

fn default_total_time_days() -> f64 {
    30.0
}

fn default_initial_stepsize_days() -> f64 {
    1.0
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_initial_pressure_bar() -> f64 {
    100.0
}

fn default_boundary_pressure_bar() -> f64 {
    300.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundaryDef {
    /// Boundary identifier; 1-6 on a Cartesian grid.
    pub id: usize,
    pub kind: BoundaryKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoundaryKind {
    Dirichlet { pressure_bar: f64 },
    Neumann { flux_m3_per_s: f64 },
}

/// Contents of a PVT table file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PvtTablesDef {
    /// Gas with vaporized oil; `ratio` is Rv (sm³ oil / sm³ gas).
    LiveGas { regions: Vec<MiscibleRegionDef> },
    /// Oil with dissolved gas; `ratio` is Rs (sm³ gas / sm³ oil).
    LiveOil { regions: Vec<MiscibleRegionDef> },
    Dead {
        phase: PhaseDef,
        regions: Vec<DeadRegionDef>,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDef {
    Aqua,
    Liquid,
    Vapour,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MiscibleRegionDef {
    pub rows: Vec<SaturatedRowDef>,
}

/// One saturated point and the undersaturated samples above it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaturatedRowDef {
    pub pressure_bar: f64,
    pub ratio: f64,
    pub b: f64,
    pub viscosity_cp: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub undersaturated: Vec<PressurePointDef>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PressurePointDef {
    pub pressure_bar: f64,
    pub b: f64,
    pub viscosity_cp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeadRegionDef {
    pub points: Vec<PressurePointDef>,
}
