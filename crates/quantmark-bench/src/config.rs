//! Benchmark files.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use quantmark_hal::{BackendConfig, ChemistryProvider, derive_seed};
use quantmark_ir::MoleculeDescriptor;
use quantmark_opt::OptimizerConfig;
use quantmark_parse::{parse_circuit, parse_molecule};

use crate::aggregate::{AccuracyMode, AggregationPolicy};
use crate::error::{BenchError, BenchResult, ConfigurationError};
use crate::init::InitStrategy;
use crate::orchestrator::{BenchmarkConfig, BenchmarkProblem, CHEMICAL_ACCURACY};

/// Molecule text fields, as written in a benchmark file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeSpec {
    /// One atom per line: `symbol x y z`.
    pub geometry: String,
    pub basis_set: String,
    /// One irrep per line: `label index...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_orbitals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
}

impl MoleculeSpec {
    pub fn to_descriptor(&self) -> BenchResult<MoleculeDescriptor> {
        Ok(parse_molecule(
            &self.geometry,
            &self.basis_set,
            self.active_orbitals.as_deref(),
            self.transformation.as_deref(),
        )?)
    }
}

fn default_repetitions() -> usize {
    BenchmarkConfig::default().repetitions
}

fn default_max_iterations() -> usize {
    BenchmarkConfig::default().max_iterations
}

fn default_threshold() -> f64 {
    CHEMICAL_ACCURACY
}

/// A complete benchmark description.
///
/// ```yaml
/// name: lih-sto3g
/// molecule:
///   geometry: |
///     H 0.0 0.0 0.0
///     Li 0.0 0.0 1.6
///   basis_set: sto-3g
///   active_orbitals: |
///     A1 1
///     B1 0
///   transformation: jordan-wigner
/// circuit: |
///   X(target=(0,))
///   X(target=(1,))
///   Ry(target=(2,), parameter=a)
///   X(target=(3,), control=(2,))
/// optimizer:
///   method: nelder-mead
/// backend:
///   backend: qulacs
/// repetitions: 20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub molecule: MoleculeSpec,
    pub circuit: String,
    pub optimizer: OptimizerConfig,
    pub backend: BackendConfig,
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Overrides the chemistry provider's reference energy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_energy: Option<f64>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub aggregation: AggregationPolicy,
    #[serde(default)]
    pub accuracy: AccuracyMode,
    #[serde(default)]
    pub init: InitStrategy,
    #[serde(default)]
    pub seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
    #[serde(default)]
    pub retry_unavailable: usize,
}

impl BenchmarkSpec {
    pub fn from_yaml_str(source: &str) -> BenchResult<Self> {
        serde_yaml_ng::from_str(source)
            .map_err(|e| ConfigurationError::Format(e.to_string()).into())
    }

    pub fn from_json_str(source: &str) -> BenchResult<Self> {
        serde_json::from_str(source).map_err(|e| ConfigurationError::Format(e.to_string()).into())
    }

    /// Load a benchmark file; `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| BenchError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let spec = if is_json {
            Self::from_json_str(&source)?
        } else {
            Self::from_yaml_str(&source)?
        };
        debug!(path = %path.display(), name = ?spec.name, "loaded benchmark file");
        Ok(spec)
    }

    pub fn to_yaml_string(&self) -> BenchResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigurationError::Format(e.to_string()).into())
    }

    /// Set the benchmark seed and derive the backend and optimizer seeds
    /// from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.backend.seed = Some(derive_seed(seed, &[1]));
        self.optimizer.seed = Some(derive_seed(seed, &[2]));
        self
    }

    /// Parse the text fields and build the problem through `chemistry`.
    pub fn prepare(&self, chemistry: &dyn ChemistryProvider) -> BenchResult<BenchmarkProblem> {
        let molecule = self.molecule.to_descriptor()?;
        let circuit = parse_circuit(&self.circuit)?;
        let mut problem = BenchmarkProblem::from_molecule(molecule, circuit, chemistry)?;

        if let Some(reference) = self.reference_energy {
            problem.reference_energy = Some(reference);
        }
        info!(
            name = self.name.as_deref().unwrap_or("unnamed"),
            qubits = problem.circuit.qubit_count(),
            depth = problem.circuit.gate_depth(),
            parameters = problem.circuit.num_parameters(),
            reference = ?problem.reference_energy,
            "prepared benchmark"
        );
        Ok(problem)
    }

    pub fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            repetitions: self.repetitions,
            max_iterations: self.max_iterations,
            threshold: self.threshold,
            aggregation: self.aggregation,
            accuracy: self.accuracy,
            init: self.init.clone(),
            seed: self.seed,
            max_parallel: self.max_parallel,
            retry_unavailable: self.retry_unavailable,
        }
    }
}
