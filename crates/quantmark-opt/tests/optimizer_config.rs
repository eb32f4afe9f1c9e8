//! Optimizer configuration from files and the factory contract.

use proptest::prelude::*;
use quantmark_hal::HalError;
use quantmark_ir::ParameterVector;
use quantmark_opt::{OptError, OptResult, Optimizer, OptimizerConfig, OptimizerFactory};

#[test]
fn test_yaml_config() {
    let yaml = r#"
module: scipy
method: SPSA
hyperparameters:
  a: 0.3
  c: 0.05
seed: 11
"#;
    let config: OptimizerConfig = serde_yaml_ng::from_str(yaml).unwrap();
    assert_eq!(config.validate().unwrap().name(), "spsa");
    assert_eq!(config.seed, Some(11));
}

#[test]
fn test_json_defaults() {
    let config: OptimizerConfig = serde_json::from_str(r#"{"method": "gd"}"#).unwrap();
    assert_eq!(config.module, "quantmark");
    assert!(config.hyperparameters.is_empty());
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_mapping_selects_bfgs() {
    let config: OptimizerConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, OptimizerConfig::default());
    assert_eq!(config.validate().unwrap().name(), "bfgs");
}

#[test]
fn test_backend_error_inside_objective_propagates() {
    let params = ParameterVector::zeros(vec!["t".into()]);
    for method in ["bfgs", "nelder-mead", "spsa", "gd"] {
        let mut optimizer = OptimizerConfig::new(method).create(1, 0).unwrap();
        let mut objective = |_: &ParameterVector| -> OptResult<f64> {
            Err(HalError::BackendUnavailable("offline".into()).into())
        };
        let err = optimizer.step(&mut objective, &params).unwrap_err();
        assert!(matches!(err, OptError::Backend(HalError::BackendUnavailable(_))));
    }
}

#[test]
fn test_closure_factory() {
    let factory = |_: usize, _: usize| -> OptResult<Box<dyn Optimizer>> {
        Ok(Box::new(quantmark_opt::GradientDescent::new()))
    };
    let boxed: Box<dyn OptimizerFactory> = Box::new(factory);
    assert_eq!(boxed.create(3, 7).unwrap().name(), "gradient-descent");
}

proptest! {
    /// Repetitions of a seeded SPSA config are reproducible and distinct.
    #[test]
    fn test_spsa_repetitions_reproducible(seed in any::<u64>(), rep in 0usize..64) {
        let config = OptimizerConfig::new("spsa").with_seed(seed);
        let params = ParameterVector::zeros(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        let run = |repetition: usize| {
            let mut optimizer = config.create(4, repetition).unwrap();
            let mut objective = |p: &ParameterVector| -> OptResult<f64> {
                Ok(p.values().iter().enumerate().map(|(i, x)| (i as f64 + 1.0) * x).sum())
            };
            optimizer.step(&mut objective, &params).unwrap().parameters
        };
        prop_assert_eq!(run(rep), run(rep));
    }

    /// Every method keeps the parameter names in order.
    #[test]
    fn test_steps_preserve_names(values in prop::collection::vec(-3.0_f64..3.0, 1..5)) {
        let names: Vec<String> = (0..values.len()).map(|i| format!("p{i}")).collect();
        let params = ParameterVector::new(names.clone(), values).unwrap();
        for method in ["bfgs", "nelder-mead", "spsa", "gd"] {
            let mut optimizer = OptimizerConfig::new(method).create(names.len(), 0).unwrap();
            let mut objective = |p: &ParameterVector| -> OptResult<f64> {
                Ok(p.values().iter().map(|x| x.sin()).sum())
            };
            let step = optimizer.step(&mut objective, &params).unwrap();
            prop_assert_eq!(step.parameters.names(), names.as_slice());
        }
    }
}
