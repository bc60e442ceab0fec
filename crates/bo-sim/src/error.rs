//! Error types for simulation operations.

use crate::collaborators::FlowRefusal;
use thiserror::Error;

/// Errors that abort a simulation run.
///
/// Excessive volume discrepancy is not an error: it is handled inside the
/// controller by cutting the step size back and retrying.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical condition: {what}")]
    NonPhysical { what: &'static str },

    #[error("Flow solver refused step {step}: {refusal}")]
    FlowRefused { step: usize, refusal: FlowRefusal },

    #[error("Step size underflow at step {step} (time {time} s): step no longer advances time")]
    StepSizeUnderflow { step: usize, time: f64 },

    #[error("PVT error: {0}")]
    Pvt(#[from] bo_fluids::PvtError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Backend error: {message}")]
    Backend { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<bo_core::BoError> for SimError {
    fn from(e: bo_core::BoError) -> Self {
        use bo_core::BoError;
        match e {
            BoError::NonFinite { what, .. }
            | BoError::OutOfRange { what, .. }
            | BoError::InvalidArg { what }
            | BoError::IndexOob { what, .. } => SimError::InvalidArg { what },
            BoError::Invariant { .. } => SimError::Backend {
                message: e.to_string(),
            },
        }
    }
}
