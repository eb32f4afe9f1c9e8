//! Backend configuration as it appears in benchmark files.

use std::sync::Arc;

use quantmark_hal::{
    Backend, BackendConfig, BackendFactory, BackendRegistry, CancelToken, HalError, HalResult,
    PauliHamiltonian, PauliTerm, Shots,
};
use quantmark_ir::{CircuitDescriptor, ParameterVector};

/// Backend that fails to come up, the way a remote service would.
struct Offline;

impl Backend for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    fn evaluate(
        &mut self,
        _circuit: &CircuitDescriptor,
        _parameters: &ParameterVector,
        _hamiltonian: &PauliHamiltonian,
    ) -> HalResult<f64> {
        Err(HalError::BackendUnavailable("service unreachable".into()))
    }
}

#[test]
fn test_yaml_backend_config() {
    let yaml = "
backend: qulacs
shots: 2000
seed: 11
options:
  max_qubits: 8
";
    let config: BackendConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.backend, "qulacs");
    assert_eq!(config.shots, Shots::Count(2000));
    assert_eq!(config.seed, Some(11));
    assert_eq!(config.option_u64("max_qubits"), Ok(Some(8)));

    let exact: BackendConfig = serde_yaml_ng::from_str("backend: qiskit\nshots: exact\n").unwrap();
    assert_eq!(exact.shots, Shots::Exact);
}

#[test]
fn test_factory_closure() {
    let factory = |_rep: usize| -> HalResult<Box<dyn Backend>> { Ok(Box::new(Offline)) };
    let mut backend = factory.create(0).unwrap();
    let err = backend
        .evaluate(
            &CircuitDescriptor::new(),
            &ParameterVector::default(),
            &PauliHamiltonian::new(vec![PauliTerm::identity(1.0)]),
        )
        .unwrap_err();
    assert!(err.is_unavailable());
}

#[test]
fn test_registry_as_shared_factory() {
    let mut registry = BackendRegistry::new();
    registry.register("offline", "never reachable", |_config, _rep| {
        Ok(Box::new(Offline) as Box<dyn Backend>)
    });
    let registry = Arc::new(registry);

    let factory: Box<dyn BackendFactory> =
        Box::new(registry.configure(BackendConfig::new("OFFLINE")).unwrap());
    assert_eq!(factory.create(7).unwrap().name(), "offline");

    assert!(matches!(
        registry.configure(BackendConfig::new("nope")),
        Err(HalError::UnknownBackend { .. })
    ));
}

#[test]
fn test_cancel_token_across_threads() {
    let token = CancelToken::new();
    let worker = token.clone();
    let handle = std::thread::spawn(move || {
        while !worker.is_cancelled() {
            std::thread::yield_now();
        }
        worker.check()
    });
    token.cancel();
    assert_eq!(handle.join().unwrap(), Err(HalError::Cancelled));
}
