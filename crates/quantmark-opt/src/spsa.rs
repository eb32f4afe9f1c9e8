//! SPSA (Simultaneous Perturbation Stochastic Approximation) optimizer.

use quantmark_ir::ParameterVector;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::config::Hyperparameters;
use crate::error::OptResult;
use crate::optimizer::{Objective, Optimizer, Step, evaluate};

/// Gradient-free stochastic optimizer.
///
/// Each step estimates the gradient from two objective calls at
/// `θ ± c_k Δ`, where `Δ` is a random ±1 vector, and moves by
/// `a_k` along the negative estimate. Gains decay as
/// `a_k = a / (k + 1 + A)^α` and `c_k = c / (k + 1)^γ`.
#[derive(Debug, Clone)]
pub struct Spsa {
    a: f64,
    c: f64,
    alpha: f64,
    gamma: f64,
    stability: f64,
    tolerance: f64,
    iteration: usize,
    previous: Option<f64>,
    rng: SmallRng,
}

impl Spsa {
    pub const NAME: &'static str = "spsa";
    pub(crate) const HYPERPARAMETERS: &'static [&'static str] =
        &["a", "c", "alpha", "gamma", "stability", "tolerance"];

    pub fn new(seed: u64) -> Self {
        Self {
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            stability: 10.0,
            tolerance: 1e-6,
            iteration: 0,
            previous: None,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Step size numerator `a`.
    pub fn with_step_size(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    /// Perturbation numerator `c`.
    pub fn with_perturbation(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Stop when the mean of the two perturbed energies changes by less
    /// than this between consecutive steps.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub(crate) fn from_hyperparameters(h: &Hyperparameters<'_>, seed: u64) -> OptResult<Self> {
        let mut spsa = Self::new(seed)
            .with_step_size(h.positive("a", 0.1)?)
            .with_perturbation(h.positive("c", 0.1)?)
            .with_tolerance(h.non_negative("tolerance", 1e-6)?);
        spsa.alpha = h.positive("alpha", 0.602)?;
        spsa.gamma = h.positive("gamma", 0.101)?;
        spsa.stability = h.non_negative("stability", 10.0)?;
        Ok(spsa)
    }

    fn gains(&self) -> (f64, f64) {
        let k = self.iteration as f64;
        let ak = self.a / (k + 1.0 + self.stability).powf(self.alpha);
        let ck = self.c / (k + 1.0).powf(self.gamma);
        (ak, ck)
    }
}

impl Optimizer for Spsa {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(
        &mut self,
        objective: &mut Objective<'_>,
        current: &ParameterVector,
    ) -> OptResult<Step> {
        if current.is_empty() {
            return Ok(Step::new(current.clone(), true));
        }

        let (ak, ck) = self.gains();
        let delta: Vec<f64> = (0..current.len())
            .map(|_| if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 })
            .collect();

        let shifted = |sign: f64| -> Vec<f64> {
            current
                .values()
                .iter()
                .zip(&delta)
                .map(|(&p, &d)| p + sign * ck * d)
                .collect()
        };
        let cost_plus = evaluate(objective, &current.with_values(shifted(1.0))?)?;
        let cost_minus = evaluate(objective, &current.with_values(shifted(-1.0))?)?;

        let slope = (cost_plus - cost_minus) / (2.0 * ck);
        let next: Vec<f64> = current
            .values()
            .iter()
            .zip(&delta)
            .map(|(&p, &d)| p - ak * slope / d)
            .collect();

        self.iteration += 1;
        let mean = (cost_plus + cost_minus) / 2.0;
        let converged = self
            .previous
            .is_some_and(|prev| (mean - prev).abs() < self.tolerance);
        self.previous = Some(mean);
        trace!(iteration = self.iteration, mean, ak, ck, "spsa step");

        Ok(Step::new(current.with_values(next)?, converged))
    }
}
