//! Error types for the optimizer crate.

use quantmark_hal::HalError;
use quantmark_ir::IrError;
use thiserror::Error;

/// Errors raised while configuring or stepping an optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum OptError {
    /// The objective returned a non-finite value.
    #[error("Objective diverged at {parameters}: energy {value}")]
    Divergence { value: f64, parameters: String },

    /// The objective failed inside the backend.
    #[error("Backend error during optimization: {0}")]
    Backend(#[from] HalError),

    /// Parameter vector does not match the optimizer state.
    #[error("Parameter error: {0}")]
    Parameters(#[from] IrError),

    #[error("Unknown optimizer module '{module}' (available: {available})")]
    UnknownModule { module: String, available: String },

    #[error("Unknown method '{method}' in module '{module}' (available: {available})")]
    UnknownMethod {
        module: String,
        method: String,
        available: String,
    },

    #[error("Unknown hyper-parameter '{name}' for {method} (accepted: {accepted})")]
    UnknownHyperParameter {
        method: String,
        name: String,
        accepted: String,
    },

    #[error("Invalid hyper-parameter '{name}': {reason}")]
    InvalidHyperParameter { name: String, reason: String },
}

impl OptError {
    /// Whether the objective stopped because the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OptError::Backend(HalError::Cancelled))
    }

    /// Whether the error comes from configuration rather than a run.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            OptError::UnknownModule { .. }
                | OptError::UnknownMethod { .. }
                | OptError::UnknownHyperParameter { .. }
                | OptError::InvalidHyperParameter { .. }
        )
    }
}

/// Result type for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;
