//! Benchmark orchestrator: independent repetitions and their aggregate.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use quantmark_hal::{BackendFactory, CancelToken, ChemistryProvider, PauliHamiltonian};
use quantmark_ir::{CircuitDescriptor, MoleculeDescriptor, ParameterVector};
use quantmark_opt::OptimizerFactory;

use crate::aggregate::{AccuracyMode, Aggregation, AggregationPolicy, BenchmarkResult};
use crate::engine::{RunContext, RunTrajectory, TerminationStatus, run_trajectory};
use crate::error::{BenchError, BenchResult, ConfigurationError};
use crate::init::InitStrategy;

/// Chemical accuracy in Hartree.
pub const CHEMICAL_ACCURACY: f64 = 1.6e-3;

/// The fixed problem every repetition solves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkProblem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecule: Option<MoleculeDescriptor>,
    pub circuit: CircuitDescriptor,
    pub hamiltonian: PauliHamiltonian,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_energy: Option<f64>,
}

impl BenchmarkProblem {
    pub fn new(circuit: CircuitDescriptor, hamiltonian: PauliHamiltonian) -> Self {
        Self {
            molecule: None,
            circuit,
            hamiltonian,
            reference_energy: None,
        }
    }

    pub fn with_reference_energy(mut self, energy: f64) -> Self {
        self.reference_energy = Some(energy);
        self
    }

    /// Build the problem for `molecule` through a chemistry provider.
    ///
    /// The provider's reference energy is used when it knows one.
    pub fn from_molecule(
        molecule: MoleculeDescriptor,
        circuit: CircuitDescriptor,
        chemistry: &dyn ChemistryProvider,
    ) -> BenchResult<Self> {
        chemistry
            .validate(&molecule)
            .map_err(ConfigurationError::Chemistry)?;
        let problem = chemistry
            .problem(&molecule)
            .map_err(ConfigurationError::Chemistry)?;
        debug!(
            provider = chemistry.name(),
            formula = %molecule.formula(),
            qubits = problem.num_qubits(),
            "prepared molecular problem"
        );

        Ok(Self {
            molecule: Some(molecule),
            circuit,
            hamiltonian: problem.hamiltonian,
            reference_energy: problem.reference_energy,
        })
    }
}

/// Benchmark settings shared by all repetitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub repetitions: usize,
    pub max_iterations: usize,
    /// A repetition succeeds when its final energy is strictly closer
    /// than this to the reference.
    pub threshold: f64,
    pub aggregation: AggregationPolicy,
    pub accuracy: AccuracyMode,
    pub init: InitStrategy,
    pub seed: u64,
    /// Concurrent repetitions; defaults to the available parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_parallel: Option<usize>,
    /// Extra attempts for repetitions that end with an unavailable backend.
    pub retry_unavailable: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            repetitions: 10,
            max_iterations: 100,
            threshold: CHEMICAL_ACCURACY,
            aggregation: AggregationPolicy::default(),
            accuracy: AccuracyMode::default(),
            init: InitStrategy::default(),
            seed: 0,
            max_parallel: None,
            retry_unavailable: 0,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_aggregation(mut self, policy: AggregationPolicy) -> Self {
        self.aggregation = policy;
        self
    }

    pub fn with_accuracy(mut self, mode: AccuracyMode) -> Self {
        self.accuracy = mode;
        self
    }

    pub fn with_init(mut self, init: InitStrategy) -> Self {
        self.init = init;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = Some(max_parallel);
        self
    }

    pub fn with_retry_unavailable(mut self, attempts: usize) -> Self {
        self.retry_unavailable = attempts;
        self
    }

    fn parallelism(&self) -> usize {
        self.max_parallel.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |m: String| Err(ConfigurationError::Invalid(m));
        if self.repetitions == 0 {
            return invalid("repetitions must be at least 1".into());
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".into());
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return invalid(format!(
                "threshold must be finite and positive, got {}",
                self.threshold
            ));
        }
        if self.max_parallel == Some(0) {
            return invalid("max_parallel must be at least 1".into());
        }
        Ok(())
    }
}

/// Benchmark outcome with per-repetition detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub result: BenchmarkResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_energy: Option<f64>,
    /// Final trajectory of every repetition, ordered by repetition.
    pub trajectories: Vec<RunTrajectory>,
    pub completed_repetitions: usize,
    pub failed_repetitions: usize,
    pub status_counts: BTreeMap<String, usize>,
    /// Repetitions that needed more than one attempt.
    pub retried_repetitions: usize,
    pub duration: Duration,
}

impl BenchmarkReport {
    /// Lowest energy any non-failed repetition recorded.
    pub fn best_energy(&self) -> Option<f64> {
        self.trajectories
            .iter()
            .filter(|t| !t.is_failure())
            .filter_map(RunTrajectory::best_energy)
            .reduce(f64::min)
    }
}

/// Called from the worker thread after each repetition finishes.
pub type ProgressCallback = Arc<dyn Fn(&RunTrajectory) + Send + Sync>;

/// A validated benchmark, ready to run.
pub struct Benchmark {
    problem: Arc<BenchmarkProblem>,
    config: BenchmarkConfig,
    cancel: CancelToken,
    progress: Option<ProgressCallback>,
}

impl Benchmark {
    /// Validate the configuration against the problem.
    pub fn new(problem: BenchmarkProblem, config: BenchmarkConfig) -> BenchResult<Self> {
        config.validate()?;
        problem
            .hamiltonian
            .validate()
            .map_err(ConfigurationError::Chemistry)?;
        config.init.validate(&problem.circuit.parameter_names())?;

        if let Some(reference) = problem.reference_energy {
            if !reference.is_finite() {
                return Err(BenchError::invalid(format!(
                    "reference energy is not finite: {reference}"
                )));
            }
            if config.accuracy == AccuracyMode::Relative && reference == 0.0 {
                return Err(BenchError::invalid(
                    "relative accuracy needs a non-zero reference energy",
                ));
            }
        }

        Ok(Self {
            problem: Arc::new(problem),
            config,
            cancel: CancelToken::new(),
            progress: None,
        })
    }

    /// Stop early when `token` is cancelled or its deadline passes.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn problem(&self) -> &BenchmarkProblem {
        &self.problem
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Run every repetition and aggregate the results.
    ///
    /// Configuration problems in the backend or optimizer factories abort
    /// before the first repetition. Everything after that is recorded per
    /// repetition.
    pub async fn run<B, O>(&self, backends: B, optimizers: O) -> BenchResult<BenchmarkReport>
    where
        B: BackendFactory + 'static,
        O: OptimizerFactory + 'static,
    {
        let started = Instant::now();
        let num_parameters = self.problem.circuit.num_parameters();

        optimizers.create(num_parameters, 0)?;
        if let Err(e) = backends.create(0) {
            if e.is_configuration() {
                return Err(ConfigurationError::Backend(e).into());
            }
        }

        let parallelism = self.config.parallelism();
        info!(
            repetitions = self.config.repetitions,
            parallelism,
            qubits = self.problem.circuit.qubit_count(),
            parameters = num_parameters,
            "starting benchmark"
        );

        let worker = Arc::new(Worker {
            problem: Arc::clone(&self.problem),
            config: self.config.clone(),
            cancel: self.cancel.clone(),
            backends: Box::new(backends),
            optimizers: Box::new(optimizers),
            progress: self.progress.clone(),
        });
        let semaphore = Arc::new(Semaphore::new(parallelism));
        let mut tasks = JoinSet::new();

        for repetition in 0..self.config.repetitions {
            let worker = Arc::clone(&worker);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| BenchError::Task(e.to_string()))?;
                tokio::task::spawn_blocking(move || worker.run_repetition(repetition))
                    .await
                    .map_err(|e| BenchError::Task(format!("repetition {repetition}: {e}")))
            });
        }

        let mut trajectories = Vec::with_capacity(self.config.repetitions);
        while let Some(joined) = tasks.join_next().await {
            let trajectory = joined.map_err(|e| BenchError::Task(e.to_string()))??;
            trajectories.push(trajectory);
        }
        trajectories.sort_by_key(|t| t.repetition);

        Ok(self.report(trajectories, started.elapsed()))
    }

    fn report(&self, trajectories: Vec<RunTrajectory>, duration: Duration) -> BenchmarkReport {
        let aggregation = Aggregation {
            policy: self.config.aggregation,
            accuracy: self.config.accuracy,
            threshold: self.config.threshold,
            reference_energy: self.problem.reference_energy,
        };
        let result = aggregation.aggregate(
            &trajectories,
            self.problem.circuit.qubit_count(),
            self.problem.circuit.gate_depth(),
        );

        let mut status_counts = BTreeMap::new();
        for t in &trajectories {
            *status_counts.entry(t.status.label().to_string()).or_insert(0) += 1;
        }
        let failed_repetitions = trajectories.iter().filter(|t| t.is_failure()).count();
        let retried_repetitions = trajectories.iter().filter(|t| t.attempt > 0).count();

        info!(
            completed = trajectories.len() - failed_repetitions,
            failed = failed_repetitions,
            success_rate = ?result.success_rate,
            elapsed_ms = duration.as_millis() as u64,
            "benchmark finished"
        );

        BenchmarkReport {
            result,
            reference_energy: self.problem.reference_energy,
            completed_repetitions: trajectories.len() - failed_repetitions,
            failed_repetitions,
            status_counts,
            retried_repetitions,
            trajectories,
            duration,
        }
    }
}

/// State shared read-only by the repetition tasks.
struct Worker {
    problem: Arc<BenchmarkProblem>,
    config: BenchmarkConfig,
    cancel: CancelToken,
    backends: Box<dyn BackendFactory>,
    optimizers: Box<dyn OptimizerFactory>,
    progress: Option<ProgressCallback>,
}

impl Worker {
    fn run_repetition(&self, repetition: usize) -> RunTrajectory {
        let template = ParameterVector::zeros(self.problem.circuit.parameter_names());
        let mut attempt = 0;

        let trajectory = loop {
            let trajectory = self.attempt(&template, repetition, attempt);
            let unavailable = matches!(
                trajectory.status,
                TerminationStatus::BackendUnavailable { .. }
            );
            let retry = attempt < self.config.retry_unavailable && !self.cancel.is_cancelled();
            if unavailable && retry {
                warn!(repetition, attempt, status = %trajectory.status, "retrying repetition");
                attempt += 1;
                continue;
            }
            break trajectory;
        };

        if let Some(progress) = &self.progress {
            progress(&trajectory);
        }
        trajectory
    }

    fn attempt(
        &self,
        template: &ParameterVector,
        repetition: usize,
        attempt: usize,
    ) -> RunTrajectory {
        let initial = self
            .config
            .init
            .initial_parameters(template, self.config.seed, repetition, attempt);

        let mut backend = match self.backends.create(repetition) {
            Ok(b) => b,
            Err(e) => {
                return RunTrajectory::failed(
                    repetition,
                    attempt,
                    initial,
                    TerminationStatus::BackendUnavailable {
                        reason: e.to_string(),
                    },
                );
            }
        };
        let mut optimizer = match self.optimizers.create(template.len(), repetition) {
            Ok(o) => o,
            Err(e) => {
                return RunTrajectory::failed(
                    repetition,
                    attempt,
                    initial,
                    TerminationStatus::OptimizerFailure {
                        reason: e.to_string(),
                    },
                );
            }
        };

        let context = RunContext {
            circuit: &self.problem.circuit,
            hamiltonian: &self.problem.hamiltonian,
            max_iterations: self.config.max_iterations,
            cancel: &self.cancel,
        };
        run_trajectory(
            &context,
            backend.as_mut(),
            optimizer.as_mut(),
            initial,
            repetition,
            attempt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(BenchmarkConfig::default().validate().is_ok());
        assert!(BenchmarkConfig::default().with_repetitions(0).validate().is_err());
        assert!(BenchmarkConfig::default().with_max_iterations(0).validate().is_err());
        assert!(BenchmarkConfig::default().with_threshold(0.0).validate().is_err());
        assert!(BenchmarkConfig::default().with_threshold(f64::NAN).validate().is_err());
        assert!(BenchmarkConfig::default().with_max_parallel(0).validate().is_err());
    }

    #[test]
    fn test_relative_accuracy_needs_nonzero_reference() {
        let problem = BenchmarkProblem::new(CircuitDescriptor::new(), PauliHamiltonian::default())
            .with_reference_energy(0.0);
        let config = BenchmarkConfig::default().with_accuracy(AccuracyMode::Relative);
        let err = Benchmark::new(problem, config).err().unwrap();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_fixed_init_must_cover_circuit_parameters() {
        let circuit = quantmark_parse::parse_circuit("Ry(target=(0,), parameter=a)").unwrap();
        let problem = BenchmarkProblem::new(circuit, PauliHamiltonian::default());
        let config = BenchmarkConfig::default().with_init(InitStrategy::Fixed(BTreeMap::new()));
        assert!(Benchmark::new(problem, config).is_err());
    }

    #[test]
    fn test_unsampleable_uniform_range_rejected_before_run() {
        let circuit = quantmark_parse::parse_circuit("Ry(target=(0,), parameter=a)").unwrap();
        let problem = BenchmarkProblem::new(circuit, PauliHamiltonian::default());
        let config = BenchmarkConfig::default().with_init(InitStrategy::Uniform {
            low: -1e308,
            high: 1e308,
        });
        let err = Benchmark::new(problem, config).err().unwrap();
        assert!(matches!(
            err,
            BenchError::Configuration(ConfigurationError::Invalid(_))
        ));
    }
}
