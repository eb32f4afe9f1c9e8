//! Gradient descent with parameter-shift gradients.

use std::f64::consts::FRAC_PI_2;

use quantmark_ir::ParameterVector;
use tracing::trace;

use crate::config::Hyperparameters;
use crate::error::{OptError, OptResult};
use crate::optimizer::{Objective, Optimizer, Step, evaluate};

/// Plain gradient descent.
///
/// The partial derivative for parameter `i` is
/// `(E(θ + s·e_i) − E(θ − s·e_i)) / (2 sin s)`, which is exact for a
/// parameter driving a single uncontrolled rotation when `s = π/2`.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    learning_rate: f64,
    shift: f64,
    tolerance: f64,
}

impl GradientDescent {
    pub const NAME: &'static str = "gradient-descent";
    pub(crate) const HYPERPARAMETERS: &'static [&'static str] =
        &["learning_rate", "shift", "tolerance"];

    pub fn new() -> Self {
        Self {
            learning_rate: 0.1,
            shift: FRAC_PI_2,
            tolerance: 1e-6,
        }
    }

    pub fn with_learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    /// Stop once the gradient norm is below this value.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub(crate) fn from_hyperparameters(h: &Hyperparameters<'_>) -> OptResult<Self> {
        let mut gd = Self::new()
            .with_learning_rate(h.positive("learning_rate", 0.1)?)
            .with_tolerance(h.non_negative("tolerance", 1e-6)?);
        gd.shift = shift_hyperparameter(h)?;
        Ok(gd)
    }

    /// Parameter-shift gradient at `current` (2n objective calls).
    pub fn gradient(
        &self,
        objective: &mut Objective<'_>,
        current: &ParameterVector,
    ) -> OptResult<Vec<f64>> {
        parameter_shift_gradient(objective, current, self.shift)
    }
}

/// The `shift` hyper-parameter, in `(0, π)`.
pub(crate) fn shift_hyperparameter(h: &Hyperparameters<'_>) -> OptResult<f64> {
    let shift = h.positive("shift", FRAC_PI_2)?;
    if shift >= std::f64::consts::PI {
        return Err(OptError::InvalidHyperParameter {
            name: "shift".into(),
            reason: format!("must be below π, got {shift}"),
        });
    }
    Ok(shift)
}

/// Gradient of `objective` at `current` by the parameter-shift rule with
/// shift `s` (2n objective calls).
pub fn parameter_shift_gradient(
    objective: &mut Objective<'_>,
    current: &ParameterVector,
    shift: f64,
) -> OptResult<Vec<f64>> {
    let denominator = 2.0 * shift.sin();
    let mut gradient = Vec::with_capacity(current.len());

    for i in 0..current.len() {
        let mut values = current.values().to_vec();
        values[i] += shift;
        let plus = evaluate(objective, &current.with_values(values.clone())?)?;
        values[i] -= 2.0 * shift;
        let minus = evaluate(objective, &current.with_values(values)?)?;
        gradient.push((plus - minus) / denominator);
    }

    Ok(gradient)
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for GradientDescent {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(
        &mut self,
        objective: &mut Objective<'_>,
        current: &ParameterVector,
    ) -> OptResult<Step> {
        let gradient = self.gradient(objective, current)?;
        let norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();

        let next: Vec<f64> = current
            .values()
            .iter()
            .zip(&gradient)
            .map(|(&p, &g)| p - self.learning_rate * g)
            .collect();
        trace!(norm, "gradient step");

        Ok(Step::new(current.with_values(next)?, norm < self.tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ⟨Z⟩ after Ry(a) and Rx(b) on separate qubits: cos a + cos b.
    fn rotations(p: &ParameterVector) -> OptResult<f64> {
        Ok(p.values().iter().map(|t| t.cos()).sum())
    }

    #[test]
    fn test_parameter_shift_is_exact_for_rotations() {
        let gd = GradientDescent::new();
        let params = ParameterVector::new(vec!["a".into(), "b".into()], vec![0.3, -1.2]).unwrap();
        let mut objective = rotations;
        let g = gd.gradient(&mut objective, &params).unwrap();
        assert!((g[0] + 0.3f64.sin()).abs() < 1e-12);
        assert!((g[1] + (-1.2f64).sin()).abs() < 1e-12);
    }

    #[test]
    fn test_descends_to_minimum() {
        let mut gd = GradientDescent::new().with_learning_rate(0.5).with_tolerance(1e-8);
        let mut params = ParameterVector::new(vec!["a".into()], vec![0.5]).unwrap();
        let mut objective = rotations;

        let mut converged = false;
        for _ in 0..200 {
            let step = gd.step(&mut objective, &params).unwrap();
            params = step.parameters;
            if step.converged {
                converged = true;
                break;
            }
        }
        assert!(converged);
        assert!((params.values()[0] - std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_empty_parameters_converge() {
        let mut objective = rotations;
        let step = GradientDescent::new()
            .step(&mut objective, &ParameterVector::default())
            .unwrap();
        assert!(step.converged);
    }
}
