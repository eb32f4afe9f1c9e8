//! Error types for benchmark orchestration.

use quantmark_hal::HalError;
use quantmark_ir::MoleculeError;
use quantmark_opt::OptError;
use quantmark_parse::ParseError;
use thiserror::Error;

/// A problem in the shared benchmark configuration.
///
/// These affect every repetition alike and abort the benchmark before any
/// repetition runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Molecule(#[from] MoleculeError),

    #[error("chemistry: {0}")]
    Chemistry(#[source] HalError),

    #[error("backend: {0}")]
    Backend(#[source] HalError),

    #[error("optimizer: {0}")]
    Optimizer(#[from] OptError),

    /// Counts, thresholds and other benchmark settings.
    #[error("{0}")]
    Invalid(String),

    /// The benchmark file could not be deserialized.
    #[error("invalid benchmark file: {0}")]
    Format(String),
}

/// Errors that can occur while preparing or running a benchmark.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A repetition task panicked or was aborted by the runtime.
    #[error("Repetition task failed: {0}")]
    Task(String),
}

impl BenchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BenchError::Configuration(ConfigurationError::Invalid(message.into()))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, BenchError::Configuration(_))
    }
}

impl From<ParseError> for BenchError {
    fn from(e: ParseError) -> Self {
        BenchError::Configuration(e.into())
    }
}

impl From<MoleculeError> for BenchError {
    fn from(e: MoleculeError) -> Self {
        BenchError::Configuration(e.into())
    }
}

impl From<OptError> for BenchError {
    fn from(e: OptError) -> Self {
        BenchError::Configuration(e.into())
    }
}

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
