//! Configuration validation.

use crate::schema::{BoundaryKind, FileFormatDef, PvtTablesDef, RunConfig};
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive"))
    }
}

fn non_negative(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be non-negative"))
    }
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    match &config.fileformat {
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
            for (field, n) in [("nx", nx), ("ny", ny), ("nz", nz)] {
                if *n == 0 {
                    return Err(invalid(field, n, "cell count must be positive"));
                }
            }
            positive("dx", *dx)?;
            positive("dy", *dy)?;
            positive("dz", *dz)?;
            if !(*default_poro > 0.0 && *default_poro <= 1.0) {
                return Err(invalid("default_poro", default_poro, "must be in (0, 1]"));
            }
            non_negative("default_perm_md", *default_perm_md)?;
        }
        FileFormatDef::Eclipse {
            filename,
            z_tolerance,
            perm_threshold_md,
            ..
        } => {
            if filename.trim().is_empty() {
                return Err(invalid("filename", filename, "must not be empty"));
            }
            non_negative("z_tolerance", *z_tolerance)?;
            non_negative("perm_threshold_md", *perm_threshold_md)?;
        }
    }

    let sim = &config.simulation;
    positive("total_time_days", sim.total_time_days)?;
    positive("initial_stepsize_days", sim.initial_stepsize_days)?;
    non_negative("initial_pressure_bar", sim.initial_pressure_bar)?;
    non_negative("boundary_pressure_bar", sim.boundary_pressure_bar)?;
    if sim.output_dir.trim().is_empty() {
        return Err(invalid("output_dir", &sim.output_dir, "must not be empty"));
    }

    let mut ids = HashSet::new();
    for bc in &config.boundaries {
        if bc.id == 0 {
            return Err(invalid("boundaries.id", 0, "id 0 is reserved for interior faces"));
        }
        if !ids.insert(bc.id) {
            return Err(ValidationError::DuplicateId {
                id: bc.id.to_string(),
                context: "boundaries".to_string(),
            });
        }
        match bc.kind {
            BoundaryKind::Dirichlet { pressure_bar } => {
                non_negative("boundaries.pressure_bar", pressure_bar)?
            }
            BoundaryKind::Neumann { flux_m3_per_s } => {
                if !flux_m3_per_s.is_finite() {
                    return Err(invalid("boundaries.flux_m3_per_s", flux_m3_per_s, "must be finite"));
                }
            }
        }
    }

    Ok(())
}

/// Shape checks only; monotonicity and positivity are checked when the
/// tables are built.
pub fn validate_pvt_tables(tables: &PvtTablesDef) -> Result<(), ValidationError> {
    let regions = match tables {
        PvtTablesDef::LiveGas { regions } | PvtTablesDef::LiveOil { regions } => regions.len(),
        PvtTablesDef::Dead { regions, .. } => regions.len(),
    };
    if regions == 0 {
        return Err(invalid("regions", 0, "at least one region is required"));
    }
    Ok(())
}
