//! BFGS quasi-Newton optimizer.

use std::f64::consts::FRAC_PI_2;

use quantmark_ir::ParameterVector;
use tracing::{debug, trace};

use crate::config::Hyperparameters;
use crate::error::OptResult;
use crate::gradient::{parameter_shift_gradient, shift_hyperparameter};
use crate::optimizer::{Objective, Optimizer, Step, evaluate};

/// Sufficient-decrease constant of the backtracking line search.
const ARMIJO: f64 = 1e-4;
const BACKTRACK: f64 = 0.5;
const MAX_BACKTRACKS: usize = 20;

/// Quasi-Newton search with an inverse-Hessian estimate.
///
/// Every step takes a parameter-shift gradient (2n objective calls), one
/// call at the current point and up to [`MAX_BACKTRACKS`] line-search
/// calls. The estimate is reset to the identity whenever the curvature
/// condition fails or the search direction is not a descent direction.
#[derive(Debug, Clone)]
pub struct Bfgs {
    tolerance: f64,
    initial_step: f64,
    shift: f64,
    inverse_hessian: Vec<Vec<f64>>,
    /// Point and gradient of the previous accepted step.
    previous: Option<(Vec<f64>, Vec<f64>)>,
}

impl Bfgs {
    pub const NAME: &'static str = "bfgs";
    pub(crate) const HYPERPARAMETERS: &'static [&'static str] =
        &["tolerance", "initial_step", "shift"];

    pub fn new() -> Self {
        Self {
            tolerance: 1e-6,
            initial_step: 1.0,
            shift: FRAC_PI_2,
            inverse_hessian: Vec::new(),
            previous: None,
        }
    }

    /// Stop once the gradient norm is below this value.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// First step length tried by the line search.
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    pub(crate) fn from_hyperparameters(h: &Hyperparameters<'_>) -> OptResult<Self> {
        let mut bfgs = Self::new()
            .with_tolerance(h.non_negative("tolerance", 1e-6)?)
            .with_initial_step(h.positive("initial_step", 1.0)?);
        bfgs.shift = shift_hyperparameter(h)?;
        Ok(bfgs)
    }

    fn reset(&mut self, n: usize) {
        self.inverse_hessian = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        self.previous = None;
    }

    /// Rank-two update from the step `s = x - x_prev` and the gradient
    /// change `y = g - g_prev`.
    fn update(&mut self, x_prev: &[f64], g_prev: &[f64], x: &[f64], g: &[f64]) {
        let s: Vec<f64> = x.iter().zip(x_prev).map(|(a, b)| a - b).collect();
        let y: Vec<f64> = g.iter().zip(g_prev).map(|(a, b)| a - b).collect();
        let sy = dot(&s, &y);
        if sy <= 1e-12 {
            trace!(sy, "curvature condition failed, resetting");
            self.reset(x.len());
            return;
        }

        let rho = 1.0 / sy;
        let hy = mat_vec(&self.inverse_hessian, &y);
        let yhy = dot(&y, &hy);
        for (i, row) in self.inverse_hessian.iter_mut().enumerate() {
            for (j, h) in row.iter_mut().enumerate() {
                *h += -rho * (hy[i] * s[j] + s[i] * hy[j]) + (rho * rho * yhy + rho) * s[i] * s[j];
            }
        }
    }
}

impl Default for Bfgs {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for Bfgs {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn step(
        &mut self,
        objective: &mut Objective<'_>,
        current: &ParameterVector,
    ) -> OptResult<Step> {
        let n = current.len();
        let x = current.values().to_vec();
        let gradient = parameter_shift_gradient(objective, current, self.shift)?;
        let norm = dot(&gradient, &gradient).sqrt();
        if norm < self.tolerance {
            return Ok(Step::new(current.clone(), true));
        }

        if self.inverse_hessian.len() != n {
            self.reset(n);
        }
        if let Some((x_prev, g_prev)) = self.previous.take() {
            self.update(&x_prev, &g_prev, &x, &gradient);
        }

        let mut direction: Vec<f64> = mat_vec(&self.inverse_hessian, &gradient)
            .into_iter()
            .map(|d| -d)
            .collect();
        let mut slope = dot(&direction, &gradient);
        if slope >= 0.0 {
            self.reset(n);
            direction = gradient.iter().map(|g| -g).collect();
            slope = -norm * norm;
        }

        let energy = evaluate(objective, current)?;
        let mut alpha = self.initial_step;
        for _ in 0..MAX_BACKTRACKS {
            let candidate: Vec<f64> = x
                .iter()
                .zip(&direction)
                .map(|(xi, di)| xi + alpha * di)
                .collect();
            let trial = current.with_values(candidate)?;
            let value = evaluate(objective, &trial)?;
            if value <= energy + ARMIJO * alpha * slope {
                trace!(alpha, energy = value, norm, "line search accepted");
                self.previous = Some((x, gradient));
                return Ok(Step::new(trial, false));
            }
            alpha *= BACKTRACK;
        }

        debug!(norm, "line search found no decrease");
        self.reset(n);
        Ok(Step::new(current.clone(), true))
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter().map(|row| dot(row, v)).collect()
}
