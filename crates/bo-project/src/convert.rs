//! Conversion from file schemas (field units) to simulator types (SI).

use crate::schema::{
    BoundaryKind, FileFormatDef, MiscibleRegionDef, PhaseDef, PressurePointDef, PvtTablesDef,
    RunConfig, TransportSchemeDef,
};
use crate::{ProjectError, ProjectResult};
use bo_core::units::{barsa, centipoise, days, millidarcy};
use bo_fluids::{
    DeadTable, MiscibleTable, Phase, PressurePoint, PvtModel, RegionTables, SaturatedPoint,
    TableRow,
};
use bo_sim::{
    BoundaryConditions, CartesianGrid, FileOutput, FlowBc, OperatingMode, SimOptions,
    TransportScheme, UniformRock,
};
use tracing::info;

pub fn sim_options(config: &RunConfig) -> ProjectResult<SimOptions> {
    let sim = &config.simulation;
    let boundary_conditions = if config.boundaries.is_empty() {
        BoundaryConditions::pressure_drive(barsa(300.0).value, barsa(100.0).value)
    } else {
        let mut bc = BoundaryConditions::default();
        for def in &config.boundaries {
            let cond = match def.kind {
                BoundaryKind::Dirichlet { pressure_bar } => FlowBc::Dirichlet {
                    pressure: barsa(pressure_bar).value,
                },
                BoundaryKind::Neumann { flux_m3_per_s } => FlowBc::Neumann {
                    flux: flux_m3_per_s,
                },
            };
            bc.set(def.id, cond)?;
        }
        bc
    };
    let options = SimOptions {
        total_time: days(sim.total_time_days).value,
        initial_stepsize: days(sim.initial_stepsize_days).value,
        mode: if sim.do_impes {
            OperatingMode::Impes
        } else {
            OperatingMode::FullyImplicit
        },
        scheme: match sim.transport_scheme {
            TransportSchemeDef::Legacy => TransportScheme::Legacy,
            TransportSchemeDef::Current => TransportScheme::Current,
        },
        gravity_test: sim.gravity_test,
        initial_pressure: barsa(sim.initial_pressure_bar).value,
        boundary_pressure: barsa(sim.boundary_pressure_bar).value,
        boundary_conditions,
    };
    options.validate()?;
    Ok(options)
}

/// Step-file writer for the configured output directory.
pub fn file_output(config: &RunConfig) -> FileOutput {
    FileOutput::new(&config.simulation.output_dir)
}

/// Generated grid and uniform rock for a Cartesian configuration.
pub fn cartesian_reservoir(format: &FileFormatDef) -> ProjectResult<(CartesianGrid, UniformRock)> {
    match format {
        FileFormatDef::Cartesian {
            nx,
            ny,
            nz,
            dx,
            dy,
            dz,
            default_poro,
            default_perm_md,
        } => {
            let grid = CartesianGrid::new([*nx, *ny, *nz], [*dx, *dy, *dz])?;
            info!("For generated cartesian grids, uniform rock properties are used");
            let rock = UniformRock::new(*default_poro, millidarcy(*default_perm_md).value)?;
            Ok((grid, rock))
        }
        FileFormatDef::Eclipse { filename, .. } => Err(ProjectError::Unsupported {
            feature: "eclipse grid input".to_string(),
            reason: format!("{filename} needs an external corner-point grid reader"),
        }),
    }
}

fn pressure_point(p: &PressurePointDef) -> PressurePoint {
    PressurePoint {
        pressure: barsa(p.pressure_bar).value,
        b: p.b,
        viscosity: centipoise(p.viscosity_cp).value,
    }
}

fn miscible_tables(regions: &[MiscibleRegionDef]) -> ProjectResult<RegionTables<MiscibleTable>> {
    let tables = regions
        .iter()
        .enumerate()
        .map(|(region, def)| {
            let rows = def
                .rows
                .iter()
                .map(|row| TableRow {
                    saturated: SaturatedPoint {
                        pressure: barsa(row.pressure_bar).value,
                        ratio: row.ratio,
                        b: row.b,
                        viscosity: centipoise(row.viscosity_cp).value,
                    },
                    undersaturated: row.undersaturated.iter().map(pressure_point).collect(),
                })
                .collect();
            MiscibleTable::new(region, rows)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RegionTables::new(tables))
}

pub fn pvt_model(def: &PvtTablesDef) -> ProjectResult<PvtModel> {
    let model = match def {
        PvtTablesDef::LiveGas { regions } => PvtModel::LiveGas(miscible_tables(regions)?),
        PvtTablesDef::LiveOil { regions } => PvtModel::LiveOil(miscible_tables(regions)?),
        PvtTablesDef::Dead { phase, regions } => {
            let tables = regions
                .iter()
                .enumerate()
                .map(|(region, def)| {
                    DeadTable::new(region, def.points.iter().map(pressure_point).collect())
                })
                .collect::<Result<Vec<_>, _>>()?;
            PvtModel::Dead {
                phase: match phase {
                    PhaseDef::Aqua => Phase::Aqua,
                    PhaseDef::Liquid => Phase::Liquid,
                    PhaseDef::Vapour => Phase::Vapour,
                },
                tables: RegionTables::new(tables),
            }
        }
    };
    Ok(model)
}
