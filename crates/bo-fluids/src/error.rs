//! PVT property errors.

use bo_core::BoError;
use thiserror::Error;

/// Result type for PVT operations.
pub type PvtResult<T> = Result<T, PvtError>;

/// Broad class of a PVT failure, used by callers to decide how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PvtErrorKind {
    /// Bad setup (region index outside the configured set, mismatched inputs).
    Configuration,
    /// Missing or malformed table data.
    Data,
    /// Unphysical input; signals a fault upstream of the PVT model.
    Domain,
}

/// Errors that can occur during PVT table construction or lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PvtError {
    #[error("PVT region {region} out of range ({regions} regions configured)")]
    RegionOutOfRange { region: usize, regions: usize },

    #[error("PVT table for region {region} is empty")]
    EmptyTable { region: usize },

    #[error("Malformed PVT table for region {region}: {what}")]
    MalformedTable { region: usize, what: String },

    #[error("Negative pressure passed to PVT lookup: {value}")]
    NegativePressure { value: f64 },

    #[error("Negative surface volume passed to PVT lookup: {value}")]
    NegativeSurfaceVolume { value: f64 },

    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl PvtError {
    pub fn kind(&self) -> PvtErrorKind {
        match self {
            PvtError::RegionOutOfRange { .. } | PvtError::LengthMismatch { .. } => {
                PvtErrorKind::Configuration
            }
            PvtError::EmptyTable { .. } | PvtError::MalformedTable { .. } => PvtErrorKind::Data,
            PvtError::NegativePressure { .. }
            | PvtError::NegativeSurfaceVolume { .. }
            | PvtError::NonFinite { .. } => PvtErrorKind::Domain,
        }
    }
}

impl From<PvtError> for BoError {
    fn from(err: PvtError) -> Self {
        match err {
            PvtError::RegionOutOfRange { region, regions } => BoError::IndexOob {
                what: "pvt region",
                index: region,
                len: regions,
            },
            PvtError::EmptyTable { .. } => BoError::Invariant {
                what: "pvt table is empty",
            },
            PvtError::MalformedTable { .. } => BoError::Invariant {
                what: "pvt table is malformed",
            },
            PvtError::NegativePressure { value } => BoError::OutOfRange {
                what: "pvt pressure",
                value,
            },
            PvtError::NegativeSurfaceVolume { value } => BoError::OutOfRange {
                what: "pvt surface volume",
                value,
            },
            PvtError::NonFinite { what, value } => BoError::NonFinite { what, value },
            PvtError::LengthMismatch { what, .. } => BoError::InvalidArg { what },
        }
    }
}
