//! Initial parameter strategies.

use std::collections::BTreeMap;

use quantmark_hal::derive_seed;
use quantmark_ir::ParameterVector;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// How each repetition picks its starting parameters.
///
/// ```yaml
/// init: zeros
/// init: { uniform: { low: -3.14159, high: 3.14159 } }
/// init: { fixed: { theta_0: 0.1, theta_1: -0.2 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    #[default]
    Zeros,
    /// Independent uniform draws in `[low, high]`, seeded per repetition
    /// and attempt.
    Uniform { low: f64, high: f64 },
    /// The same values for every repetition, by parameter name.
    Fixed(BTreeMap<String, f64>),
}

impl InitStrategy {
    /// Check the strategy against the circuit's parameter names.
    pub fn validate(&self, names: &[String]) -> Result<(), ConfigurationError> {
        match self {
            InitStrategy::Zeros => Ok(()),
            InitStrategy::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low > high {
                    return Err(ConfigurationError::Invalid(format!(
                        "uniform init range [{low}, {high}] is empty or not finite"
                    )));
                }
                if !(high - low).is_finite() {
                    return Err(ConfigurationError::Invalid(format!(
                        "uniform init range [{low}, {high}] is too wide to sample"
                    )));
                }
                Ok(())
            }
            InitStrategy::Fixed(values) => {
                if let Some(missing) = names.iter().find(|n| !values.contains_key(*n)) {
                    return Err(ConfigurationError::Invalid(format!(
                        "fixed init has no value for parameter '{missing}'"
                    )));
                }
                if let Some(extra) = values.keys().find(|k| !names.contains(k)) {
                    return Err(ConfigurationError::Invalid(format!(
                        "fixed init names '{extra}', which the circuit does not use"
                    )));
                }
                if let Some((name, v)) = values.iter().find(|(_, v)| !v.is_finite()) {
                    return Err(ConfigurationError::Invalid(format!(
                        "fixed init value for '{name}' is not finite: {v}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Starting parameters for one attempt of one repetition.
    ///
    /// `template` supplies the names and their order. The strategy must
    /// already be validated against them.
    pub fn initial_parameters(
        &self,
        template: &ParameterVector,
        seed: u64,
        repetition: usize,
        attempt: usize,
    ) -> ParameterVector {
        let values = match self {
            InitStrategy::Zeros => vec![0.0; template.len()],
            InitStrategy::Uniform { low, high } => {
                let mut rng = SmallRng::seed_from_u64(derive_seed(
                    seed,
                    &[repetition as u64, attempt as u64],
                ));
                (0..template.len())
                    .map(|_| rng.gen_range(*low..=*high))
                    .collect()
            }
            InitStrategy::Fixed(values) => template
                .names()
                .iter()
                .map(|n| values.get(n).copied().unwrap_or(0.0))
                .collect(),
        };
        ParameterVector::new(template.names().to_vec(), values).unwrap_or_else(|_| template.clone())
    }
}
