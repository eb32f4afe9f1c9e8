//! Optimizer configuration.

use std::collections::BTreeMap;
use std::fmt;

use quantmark_hal::derive_seed;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bfgs::Bfgs;
use crate::error::{OptError, OptResult};
use crate::gradient::GradientDescent;
use crate::nelder_mead::NelderMead;
use crate::optimizer::{Optimizer, OptimizerFactory};
use crate::spsa::Spsa;

/// Module names accepted in [`OptimizerConfig::module`].
pub const MODULES: &[&str] = &["quantmark", "scipy"];

/// Optimizer method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    Bfgs,
    NelderMead,
    Spsa,
    GradientDescent,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Bfgs,
        Method::NelderMead,
        Method::Spsa,
        Method::GradientDescent,
    ];

    /// Parse a method name; case, `_` and `-` are not significant.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "bfgs" => Some(Method::Bfgs),
            "neldermead" => Some(Method::NelderMead),
            "spsa" => Some(Method::Spsa),
            "gradientdescent" | "gd" => Some(Method::GradientDescent),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Bfgs => Bfgs::NAME,
            Method::NelderMead => NelderMead::NAME,
            Method::Spsa => Spsa::NAME,
            Method::GradientDescent => GradientDescent::NAME,
        }
    }

    /// Hyper-parameter names the method accepts.
    pub fn hyperparameters(&self) -> &'static [&'static str] {
        match self {
            Method::Bfgs => Bfgs::HYPERPARAMETERS,
            Method::NelderMead => NelderMead::HYPERPARAMETERS,
            Method::Spsa => Spsa::HYPERPARAMETERS,
            Method::GradientDescent => GradientDescent::HYPERPARAMETERS,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checked access to a hyper-parameter map.
pub(crate) struct Hyperparameters<'a> {
    values: &'a BTreeMap<String, f64>,
}

impl Hyperparameters<'_> {
    fn get(&self, name: &str, default: f64) -> OptResult<f64> {
        match self.values.get(name) {
            None => Ok(default),
            Some(v) if v.is_finite() => Ok(*v),
            Some(v) => Err(OptError::InvalidHyperParameter {
                name: name.into(),
                reason: format!("must be finite, got {v}"),
            }),
        }
    }

    pub(crate) fn positive(&self, name: &str, default: f64) -> OptResult<f64> {
        let v = self.get(name, default)?;
        if v > 0.0 {
            Ok(v)
        } else {
            Err(OptError::InvalidHyperParameter {
                name: name.into(),
                reason: format!("must be positive, got {v}"),
            })
        }
    }

    pub(crate) fn non_negative(&self, name: &str, default: f64) -> OptResult<f64> {
        let v = self.get(name, default)?;
        if v >= 0.0 {
            Ok(v)
        } else {
            Err(OptError::InvalidHyperParameter {
                name: name.into(),
                reason: format!("must not be negative, got {v}"),
            })
        }
    }
}

fn default_module() -> String {
    MODULES[0].to_string()
}

fn default_method() -> String {
    Bfgs::NAME.to_string()
}

/// Which optimizer to run and how. Every field has a default; an empty
/// mapping selects BFGS.
///
/// ```yaml
/// module: scipy
/// method: nelder-mead
/// hyperparameters:
///   tolerance: 1.0e-8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default = "default_module")]
    pub module: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub hyperparameters: BTreeMap<String, f64>,
    /// Base seed for stochastic methods; each repetition derives its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new(default_method())
    }
}

impl OptimizerConfig {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            module: default_module(),
            method: method.into(),
            hyperparameters: BTreeMap::new(),
            seed: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_hyperparameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.hyperparameters.insert(name.into(), value);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check module, method and hyper-parameters without building anything.
    pub fn validate(&self) -> OptResult<Method> {
        if !MODULES.iter().any(|m| m.eq_ignore_ascii_case(&self.module)) {
            return Err(OptError::UnknownModule {
                module: self.module.clone(),
                available: MODULES.join(", "),
            });
        }

        let method = Method::from_name(&self.method).ok_or_else(|| OptError::UnknownMethod {
            module: self.module.clone(),
            method: self.method.clone(),
            available: Method::ALL
                .iter()
                .map(Method::name)
                .collect::<Vec<_>>()
                .join(", "),
        })?;

        let accepted = method.hyperparameters();
        if let Some(name) = self
            .hyperparameters
            .keys()
            .find(|k| !accepted.contains(&k.as_str()))
        {
            return Err(OptError::UnknownHyperParameter {
                method: method.name().into(),
                name: name.clone(),
                accepted: accepted.join(", "),
            });
        }

        self.instantiate(method, 0)?;
        Ok(method)
    }

    fn instantiate(&self, method: Method, repetition: usize) -> OptResult<Box<dyn Optimizer>> {
        let h = Hyperparameters {
            values: &self.hyperparameters,
        };
        Ok(match method {
            Method::Bfgs => Box::new(Bfgs::from_hyperparameters(&h)?),
            Method::NelderMead => Box::new(NelderMead::from_hyperparameters(&h)?),
            Method::Spsa => {
                let seed = derive_seed(self.seed.unwrap_or(0), &[repetition as u64]);
                Box::new(Spsa::from_hyperparameters(&h, seed)?)
            }
            Method::GradientDescent => Box::new(GradientDescent::from_hyperparameters(&h)?),
        })
    }

    /// Build the optimizer for one repetition.
    pub fn build(&self, num_parameters: usize, repetition: usize) -> OptResult<Box<dyn Optimizer>> {
        let method = self.validate()?;
        let optimizer = self.instantiate(method, repetition)?;
        debug!(%method, num_parameters, repetition, "created optimizer");
        Ok(optimizer)
    }
}

impl OptimizerFactory for OptimizerConfig {
    fn create(&self, num_parameters: usize, repetition: usize) -> OptResult<Box<dyn Optimizer>> {
        self.build(num_parameters, repetition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(Method::from_name("Nelder-Mead"), Some(Method::NelderMead));
        assert_eq!(Method::from_name("nelder_mead"), Some(Method::NelderMead));
        assert_eq!(Method::from_name("GD"), Some(Method::GradientDescent));
        assert_eq!(Method::from_name("BFGS"), Some(Method::Bfgs));
        assert_eq!(Method::from_name("cobyla"), None);
    }

    #[test]
    fn test_scipy_bfgs() {
        let config = OptimizerConfig::new("BFGS").with_module("scipy");
        assert_eq!(config.validate().unwrap(), Method::Bfgs);
        assert_eq!(config.create(1, 0).unwrap().name(), "bfgs");

        let err = OptimizerConfig::new("bfgs")
            .with_hyperparameter("shift", 0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, OptError::InvalidHyperParameter { .. }));
    }

    #[test]
    fn test_default_is_bfgs() {
        let config = OptimizerConfig::default();
        assert_eq!(config.module, "quantmark");
        assert_eq!(config.validate().unwrap(), Method::Bfgs);
    }

    #[test]
    fn test_scipy_alias() {
        let config = OptimizerConfig::new("spsa").with_module("SciPy");
        assert_eq!(config.validate().unwrap(), Method::Spsa);
    }

    #[test]
    fn test_configuration_errors() {
        let err = OptimizerConfig::new("nelder-mead")
            .with_module("torch")
            .validate()
            .unwrap_err();
        assert!(matches!(err, OptError::UnknownModule { .. }));
        assert!(err.is_configuration());

        let err = OptimizerConfig::new("cobyla").validate().unwrap_err();
        assert!(matches!(err, OptError::UnknownMethod { .. }));

        let err = OptimizerConfig::new("spsa")
            .with_hyperparameter("learning_rate", 0.1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, OptError::UnknownHyperParameter { .. }));

        let err = OptimizerConfig::new("gd")
            .with_hyperparameter("learning_rate", -1.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, OptError::InvalidHyperParameter { .. }));

        let err = OptimizerConfig::new("gd")
            .with_hyperparameter("shift", 4.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, OptError::InvalidHyperParameter { .. }));
    }

    #[test]
    fn test_factory_builds_named_optimizer() {
        let config = OptimizerConfig::new("gradient_descent");
        let optimizer = config.create(2, 0).unwrap();
        assert_eq!(optimizer.name(), "gradient-descent");
    }
}
