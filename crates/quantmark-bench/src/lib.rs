//! VQE benchmark orchestration for quantmark
//!
//! A benchmark runs the same VQE problem many times with independent
//! backends and optimizers, then summarizes the energy trajectories.
//!
//! - [`run_trajectory`] drives one repetition: evaluate, record, step.
//! - [`Benchmark`] runs every repetition on tokio's blocking pool and
//!   aggregates them into a [`BenchmarkReport`].
//! - [`BenchmarkSpec`] loads a complete benchmark from YAML or JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use quantmark_bench::{Benchmark, BenchmarkProblem, BenchmarkConfig};
//! use quantmark_hal::{PauliHamiltonian, PauliTerm};
//! use quantmark_opt::OptimizerConfig;
//! use quantmark_parse::parse_circuit;
//!
//! # async fn example(backends: impl quantmark_hal::BackendFactory + 'static) {
//! let circuit = parse_circuit("Ry(target=(0,), parameter=theta)").unwrap();
//! let hamiltonian = PauliHamiltonian::new(vec![PauliTerm::z(1.0, 0)]);
//! let problem = BenchmarkProblem::new(circuit, hamiltonian).with_reference_energy(-1.0);
//!
//! let benchmark = Benchmark::new(problem, BenchmarkConfig::default().with_repetitions(5)).unwrap();
//! let report = benchmark
//!     .run(backends, OptimizerConfig::new("nelder-mead"))
//!     .await
//!     .unwrap();
//! println!("success rate: {:?}", report.result.success_rate);
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod orchestrator;

pub use aggregate::{AccuracyMode, Aggregation, AggregationPolicy, BenchmarkResult};
pub use config::{BenchmarkSpec, MoleculeSpec};
pub use engine::{RunContext, RunTrajectory, TerminationStatus, TrajectoryRecord, run_trajectory};
pub use error::{BenchError, BenchResult, ConfigurationError};
pub use init::InitStrategy;
pub use orchestrator::{
    Benchmark, BenchmarkConfig, BenchmarkProblem, BenchmarkReport, CHEMICAL_ACCURACY,
    ProgressCallback,
};
