//! Backend contract.
//!
//! A backend turns `(circuit, parameters, hamiltonian)` into an energy
//! estimate. Backends may be stochastic (finite shots) and are owned by a
//! single repetition at a time: the benchmark builds a fresh instance per
//! repetition through a [`BackendFactory`].

use std::fmt;

use quantmark_ir::{CircuitDescriptor, ParameterVector};
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};
use crate::hamiltonian::PauliHamiltonian;
use crate::seed::derive_seed;

/// Circuit evaluation backend.
///
/// # Contract
///
/// - `evaluate()` returns ⟨ψ(θ)|H|ψ(θ)⟩ or an estimate of it.
/// - Every parameter referenced by the circuit must be bound in
///   `parameters`, otherwise the call fails with [`HalError::Circuit`].
/// - [`HalError::BackendUnavailable`] signals that the backend cannot be
///   reached or initialized. Adapters never retry on their own.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Largest circuit the backend accepts, if bounded.
    fn max_qubits(&self) -> Option<usize> {
        None
    }

    /// Evaluate the energy of the bound circuit.
    fn evaluate(
        &mut self,
        circuit: &CircuitDescriptor,
        parameters: &ParameterVector,
        hamiltonian: &PauliHamiltonian,
    ) -> HalResult<f64>;
}

/// Builds backends for individual repetitions.
pub trait BackendFactory: Send + Sync {
    /// Create the backend owned by `repetition`.
    fn create(&self, repetition: usize) -> HalResult<Box<dyn Backend>>;
}

impl<F> BackendFactory for F
where
    F: Fn(usize) -> HalResult<Box<dyn Backend>> + Send + Sync,
{
    fn create(&self, repetition: usize) -> HalResult<Box<dyn Backend>> {
        self(repetition)
    }
}

/// Measurement budget per expectation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ShotsRepr", into = "ShotsRepr")]
pub enum Shots {
    /// Exact expectation values.
    #[default]
    Exact,
    /// Estimate each Pauli term from this many samples.
    Count(u32),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ShotsRepr {
    Count(u32),
    Name(String),
}

impl TryFrom<ShotsRepr> for Shots {
    type Error = HalError;

    fn try_from(repr: ShotsRepr) -> HalResult<Self> {
        match repr {
            ShotsRepr::Count(0) => Err(HalError::InvalidShots("shot count must be positive".into())),
            ShotsRepr::Count(n) => Ok(Shots::Count(n)),
            ShotsRepr::Name(s) if s.eq_ignore_ascii_case("exact") => Ok(Shots::Exact),
            ShotsRepr::Name(s) => Err(HalError::InvalidShots(format!(
                "expected 'exact' or a positive integer, got '{s}'"
            ))),
        }
    }
}

impl From<Shots> for ShotsRepr {
    fn from(shots: Shots) -> Self {
        match shots {
            Shots::Exact => ShotsRepr::Name("exact".into()),
            Shots::Count(n) => ShotsRepr::Count(n),
        }
    }
}

impl fmt::Display for Shots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shots::Exact => write!(f, "exact"),
            Shots::Count(n) => write!(f, "{n} shots"),
        }
    }
}

/// Configuration for constructing a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Registered backend name or alias.
    pub backend: String,
    #[serde(default)]
    pub shots: Shots,
    /// Base seed for stochastic backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Backend-specific options.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            shots: Shots::Exact,
            seed: None,
            options: serde_json::Map::new(),
        }
    }

    pub fn with_shots(mut self, shots: Shots) -> Self {
        self.shots = shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Add a backend-specific option.
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Seed for the backend owned by `repetition`.
    ///
    /// Unseeded configurations still give each repetition a distinct,
    /// reproducible stream.
    pub fn seed_for(&self, repetition: usize) -> u64 {
        derive_seed(self.seed.unwrap_or(0), &[repetition as u64])
    }

    /// Read an unsigned integer option.
    pub fn option_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.options.get(key) {
            None => Ok(None),
            Some(v) => v.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("option '{key}' must be a non-negative integer"))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("statevector")
            .with_shots(Shots::Count(1000))
            .with_seed(42)
            .with_option("max_qubits", serde_json::json!(12));

        assert_eq!(config.backend, "statevector");
        assert_eq!(config.shots, Shots::Count(1000));
        assert_eq!(config.option_u64("max_qubits"), Ok(Some(12)));
        assert_eq!(config.option_u64("missing"), Ok(None));
        assert_ne!(config.seed_for(0), config.seed_for(1));
        assert_eq!(config.seed_for(3), config.clone().seed_for(3));
    }

    #[test]
    fn test_shots_serde() {
        let exact: Shots = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(exact, Shots::Exact);
        let count: Shots = serde_json::from_str("512").unwrap();
        assert_eq!(count, Shots::Count(512));
        assert!(serde_json::from_str::<Shots>("0").is_err());
        assert!(serde_json::from_str::<Shots>("\"many\"").is_err());
        assert_eq!(serde_json::to_string(&Shots::Count(8)).unwrap(), "8");
    }

    #[test]
    fn test_config_defaults() {
        let config: BackendConfig = serde_json::from_str(r#"{"backend": "qulacs"}"#).unwrap();
        assert_eq!(config.shots, Shots::Exact);
        assert!(config.seed.is_none());
        assert!(config.options.is_empty());
    }

    #[test]
    fn test_option_type_error() {
        let config = BackendConfig::new("sv").with_option("max_qubits", serde_json::json!("lots"));
        assert!(matches!(
            config.option_u64("max_qubits"),
            Err(HalError::Configuration(_))
        ));
    }
}
