//! Nelder-Mead simplex optimizer.

use quantmark_ir::ParameterVector;
use tracing::trace;

use crate::config::Hyperparameters;
use crate::error::OptResult;
use crate::optimizer::{Objective, Optimizer, Step, evaluate};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Derivative-free simplex search over n + 1 vertices.
///
/// The first step builds the simplex around the starting point (n + 1
/// objective calls). Every following step performs one reflection and,
/// depending on the outcome, an expansion, a contraction or a shrink.
#[derive(Debug, Clone)]
pub struct NelderMead {
    tolerance: f64,
    initial_step: f64,
    simplex: Vec<Vec<f64>>,
    costs: Vec<f64>,
}

impl NelderMead {
    pub const NAME: &'static str = "nelder-mead";
    pub(crate) const HYPERPARAMETERS: &'static [&'static str] = &["tolerance", "initial_step"];

    pub fn new() -> Self {
        Self {
            tolerance: 1e-6,
            initial_step: 0.5,
            simplex: Vec::new(),
            costs: Vec::new(),
        }
    }

    /// Stop when either the cost spread or the simplex size drops below
    /// this value.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Offset of the initial vertices along each coordinate.
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    pub(crate) fn from_hyperparameters(h: &Hyperparameters<'_>) -> OptResult<Self> {
        Ok(Self::new()
            .with_tolerance(h.non_negative("tolerance", 1e-6)?)
            .with_initial_step(h.positive("initial_step", 0.5)?))
    }

    fn cost(
        objective: &mut Objective<'_>,
        template: &ParameterVector,
        values: &[f64],
    ) -> OptResult<f64> {
        evaluate(objective, &template.with_values(values.to_vec())?)
    }

    fn init_simplex(
        &mut self,
        objective: &mut Objective<'_>,
        current: &ParameterVector,
    ) -> OptResult<()> {
        let center = current.values().to_vec();
        self.simplex = vec![center.clone()];
        for i in 0..center.len() {
            let mut vertex = center.clone();
            vertex[i] += self.initial_step;
            self.simplex.push(vertex);
        }

        self.costs = Vec::with_capacity(self.simplex.len());
        for vertex in &self.simplex {
            self.costs.push(Self::cost(objective, current, vertex)?);
        }
        Ok(())
    }

    /// Sort vertices by cost, best first.
    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.simplex.len()).collect();
        order.sort_by(|&a, &b| self.costs[a].total_cmp(&self.costs[b]));
        self.simplex = order.iter().map(|&i| self.simplex[i].clone()).collect();
        self.costs = order.iter().map(|&i| self.costs[i]).collect();
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let n = self.simplex.len() - 1;
        let mut center = vec![0.0; self.simplex[0].len()];
        for vertex in &self.simplex[..n] {
            for (c, v) in center.iter_mut().zip(vertex) {
                *c += v;
            }
        }
        center.iter_mut().for_each(|c| *c /= n as f64);
        center
    }

    fn has_converged(&self) -> bool {
        let spread = self.costs.iter().copied().fold(f64::NEG_INFINITY, f64::max)
            - self.costs.iter().copied().fold(f64::INFINITY, f64::min);
        if spread < self.tolerance {
            return true;
        }

        let size = self.simplex[1..]
            .iter()
            .map(|v| distance(&self.simplex[0], v))
            .fold(0.0, f64::max);
        size < self.tolerance
    }

    fn iterate(
        &mut self,
        objective: &mut Objective<'_>,
        template: &ParameterVector,
    ) -> OptResult<()> {
        let worst = self.simplex.len() - 1;
        let centroid = self.centroid();

        let reflected = towards(&centroid, &self.simplex[worst], -REFLECTION);
        let f_reflected = Self::cost(objective, template, &reflected)?;

        if f_reflected < self.costs[0] {
            let expanded = towards(&centroid, &reflected, EXPANSION);
            let f_expanded = Self::cost(objective, template, &expanded)?;
            if f_expanded < f_reflected {
                trace!(cost = f_expanded, "expansion");
                self.replace_worst(expanded, f_expanded);
            } else {
                trace!(cost = f_reflected, "reflection");
                self.replace_worst(reflected, f_reflected);
            }
        } else if f_reflected < self.costs[worst - 1] {
            trace!(cost = f_reflected, "reflection");
            self.replace_worst(reflected, f_reflected);
        } else {
            // Outside contraction when the reflection beats the worst vertex.
            let toward = if f_reflected < self.costs[worst] {
                reflected
            } else {
                self.simplex[worst].clone()
            };
            let contracted = towards(&centroid, &toward, CONTRACTION);
            let f_contracted = Self::cost(objective, template, &contracted)?;

            if f_contracted < self.costs[worst] {
                trace!(cost = f_contracted, "contraction");
                self.replace_worst(contracted, f_contracted);
            } else {
                trace!("shrink");
                let best = self.simplex[0].clone();
                for i in 1..self.simplex.len() {
                    self.simplex[i] = towards(&best, &self.simplex[i], SHRINK);
                    self.costs[i] = Self::cost(objective, template, &self.simplex[i])?;
                }
            }
        }

        self.sort();
        Ok(())
    }

    fn replace_worst(&mut self, vertex: Vec<f64>, cost: f64) {
        let worst = self.simplex.len() - 1;
        self.simplex[worst] = vertex;
        self.costs[worst] = cost;
    }
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer for NelderMead {
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

        if self.simplex.first().is_none_or(|v| v.len() != current.len()) {
            self.init_simplex(objective, current)?;
            self.sort();
        } else {
            self.iterate(objective, current)?;
        }

        let best = current.with_values(self.simplex[0].clone())?;
        Ok(Step::new(best, self.has_converged()))
    }
}

/// `from + t * (to - from)`.
fn towards(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(&a, &b)| a + t * (b - a)).collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
