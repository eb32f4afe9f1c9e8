//! Error types for the HAL crate.

use quantmark_ir::IrError;
use thiserror::Error;

/// Errors that can occur in backend and chemistry operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend could not be reached or initialized.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// No backend registered under this name.
    #[error("Unknown backend '{name}' (available: {available})")]
    UnknownBackend { name: String, available: String },

    /// Circuit exceeds backend capabilities.
    #[error("Circuit needs {qubits} qubits, backend supports at most {max}")]
    CircuitTooLarge { qubits: usize, max: usize },

    /// Circuit could not be bound or evaluated.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Invalid Hamiltonian.
    #[error("Invalid Hamiltonian: {0}")]
    InvalidHamiltonian(String),

    /// Backend option rejected.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Active space does not fit the molecule and basis set.
    #[error("Invalid active space: {0}")]
    InvalidActiveSpace(String),

    /// The chemistry provider has no data for this molecule.
    #[error("Unsupported molecule: {0}")]
    UnsupportedMolecule(String),

    /// Evaluation was cancelled.
    #[error("Cancelled")]
    Cancelled,

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Whether the error means the backend itself is unusable, as opposed
    /// to a problem with the request.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, HalError::BackendUnavailable(_))
    }

    /// Whether the error comes from backend configuration and would hit
    /// every repetition alike.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HalError::UnknownBackend { .. } | HalError::Configuration(_) | HalError::InvalidShots(_)
        )
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
