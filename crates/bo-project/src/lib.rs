//! bo-project: run configuration files and PVT table files.
//!
//! Files are YAML or JSON, chosen by extension (`.json` is JSON, anything else YAML).

pub mod convert;
pub mod schema;
pub mod validate;

pub use convert::{cartesian_reservoir, file_output, pvt_model, sim_options};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_config, validate_pvt_tables};

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("PVT table error: {0}")]
    Pvt(#[from] bo_fluids::PvtError),

    #[error("Simulation setup error: {0}")]
    Sim(#[from] bo_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_any<T: DeserializeOwned>(path: &Path) -> ProjectResult<T> {
    let content = std::fs::read_to_string(path)?;
    if is_json(path) {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &RunConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: RunConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load a run configuration, YAML or JSON by extension.
pub fn load_config(path: &Path) -> ProjectResult<RunConfig> {
    if is_json(path) {
        load_json(path)
    } else {
        load_yaml(path)
    }
}

pub fn load_pvt_tables(path: &Path) -> ProjectResult<PvtTablesDef> {
    let tables: PvtTablesDef = read_any(path)?;
    validate_pvt_tables(&tables)?;
    Ok(tables)
}

/// Read a PVT table file and build the property model.
pub fn load_pvt_model(path: &Path) -> ProjectResult<bo_fluids::PvtModel> {
    pvt_model(&load_pvt_tables(path)?)
}

/// Location of the PVT tables named by `config`, relative to the config file.
pub fn pvt_tables_path(config_path: &Path, config: &RunConfig) -> Option<PathBuf> {
    let rel = config.pvt_tables.as_ref()?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    Some(base.join(rel))
}
