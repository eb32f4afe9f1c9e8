//! Benchmark files run end to end against the tabulated chemistry and the
//! statevector backend.

use std::io::Write;
use std::sync::Arc;

use quantmark_bench::{Benchmark, BenchmarkSpec, BenchError, ConfigurationError};
use quantmark_chem::TabulatedChemistry;
use quantmark_hal::BackendRegistry;

const H2_PARITY: &str = r#"
name: h2-parity
molecule:
  geometry: |
    H 0.0 0.0 0.0
    H 0.0 0.0 0.74
  basis_set: sto-3g
  transformation: parity
circuit: |
  circuit:
  X(target=(0,))
  Ry(target=(1,), parameter=a)
  X(target=(0,), control=(1,))
optimizer:
  method: nelder-mead
  hyperparameters:
    tolerance: 1.0e-9
backend:
  backend: qulacs
repetitions: 4
max_iterations: 60
init:
  uniform: { low: -0.5, high: 0.5 }
"#;

fn registry() -> Arc<BackendRegistry> {
    let mut registry = BackendRegistry::new();
    quantmark_adapter_sim::register(&mut registry);
    Arc::new(registry)
}

fn write_spec(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_yaml_file_end_to_end() {
    let file = write_spec(H2_PARITY, ".yaml");
    let spec = BenchmarkSpec::from_path(file.path()).unwrap().with_seed(1);

    let problem = spec.prepare(&TabulatedChemistry::new()).unwrap();
    let reference = problem.reference_energy.unwrap();
    assert!((reference + 1.169_069_263_8).abs() < 1e-6);
    assert_eq!(problem.hamiltonian.num_qubits(), 2);

    let backends = registry().configure(spec.backend.clone()).unwrap();
    let report = Benchmark::new(problem, spec.benchmark_config())
        .unwrap()
        .run(backends, spec.optimizer.clone())
        .await
        .unwrap();

    assert_eq!(report.trajectories.len(), 4);
    assert_eq!(report.failed_repetitions, 0);
    assert_eq!(report.result.qubit_count, 2);
    assert_eq!(report.result.gate_depth, 2);
    assert!(report.result.success_rate.is_some());
    // Variational bound.
    assert!(report.best_energy().unwrap() >= reference - 1e-9);

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("average_history"));
}

#[test]
fn test_json_file_and_reference_override() {
    let spec = BenchmarkSpec::from_yaml_str(H2_PARITY).unwrap();
    let mut value = serde_json::to_value(&spec).unwrap();
    value["reference_energy"] = serde_json::json!(-1.0);
    let file = write_spec(&value.to_string(), ".json");

    let spec = BenchmarkSpec::from_path(file.path()).unwrap();
    let problem = spec.prepare(&TabulatedChemistry::new()).unwrap();
    assert_eq!(problem.reference_energy, Some(-1.0));
}

#[test]
fn test_malformed_circuit_is_configuration_error() {
    let spec = BenchmarkSpec::from_yaml_str(
        &H2_PARITY.replace("Ry(target=(1,), parameter=a)", "Ry(target=(1,))"),
    )
    .unwrap();
    let err = spec.prepare(&TabulatedChemistry::new()).unwrap_err();
    assert!(matches!(
        err,
        BenchError::Configuration(ConfigurationError::Parse(_))
    ));
}

#[test]
fn test_active_space_out_of_range() {
    let spec = BenchmarkSpec::from_yaml_str(&H2_PARITY.replace(
        "  transformation: parity",
        "  active_orbitals: |\n    Ag 3\n  transformation: parity",
    ))
    .unwrap();
    let err = spec.prepare(&TabulatedChemistry::new()).unwrap_err();
    assert!(matches!(
        err,
        BenchError::Configuration(ConfigurationError::Chemistry(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = BenchmarkSpec::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, BenchError::Io { .. }));
}

#[test]
fn test_unknown_backend_rejected_at_configuration() {
    let spec = BenchmarkSpec::from_yaml_str(&H2_PARITY.replace("backend: qulacs", "backend: ibmq"))
        .unwrap();
    assert!(registry().configure(spec.backend).is_err());
}

#[test]
fn test_shipped_configs_prepare() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../configs");
    for name in ["lih_sto3g.yaml", "h2_parity_sampled.yaml", "lih_bfgs_worker.yaml"] {
        let spec = BenchmarkSpec::from_path(dir.join(name)).unwrap();
        let problem = spec.prepare(&TabulatedChemistry::new()).unwrap();
        assert!(problem.reference_energy.is_some(), "{name}");
        assert!(registry().configure(spec.backend.clone()).is_ok(), "{name}");
        spec.optimizer.validate().unwrap();
        Benchmark::new(problem, spec.benchmark_config()).unwrap();
    }
}

#[tokio::test]
async fn test_worker_config_runs_with_scipy_bfgs() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs/lih_bfgs_worker.yaml");
    let mut spec = BenchmarkSpec::from_path(path).unwrap().with_seed(3);
    assert_eq!(spec.repetitions, 100);
    spec.repetitions = 4;

    let problem = spec.prepare(&TabulatedChemistry::new()).unwrap();
    assert_eq!(problem.circuit.qubit_count(), 4);
    assert_eq!(problem.circuit.gate_depth(), 3);
    let reference = problem.reference_energy.unwrap();

    let backends = registry().configure(spec.backend.clone()).unwrap();
    let report = Benchmark::new(problem, spec.benchmark_config())
        .unwrap()
        .run(backends, spec.optimizer.clone())
        .await
        .unwrap();

    assert_eq!(report.failed_repetitions, 0);
    assert_eq!(report.trajectories.len(), 4);
    assert!(report.best_energy().unwrap() >= reference - 1e-9);
}

#[test]
fn test_optimizer_section_may_be_empty() {
    let spec = BenchmarkSpec::from_yaml_str(&H2_PARITY.replace(
        "optimizer:\n  method: nelder-mead\n  hyperparameters:\n    tolerance: 1.0e-9",
        "optimizer: {}",
    ))
    .unwrap();
    assert_eq!(spec.optimizer.method, "bfgs");
    assert!(spec.optimizer.validate().is_ok());
}
