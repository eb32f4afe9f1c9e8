//! Optimizer contract.

use quantmark_ir::ParameterVector;

use crate::error::{OptError, OptResult};

/// Energy as a function of the ansatz parameters.
///
/// Each call is one backend evaluation. Errors from the backend surface as
/// [`OptError::Backend`].
pub type Objective<'a> = dyn FnMut(&ParameterVector) -> OptResult<f64> + 'a;

/// Outcome of one optimizer iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Parameters to evaluate next.
    pub parameters: ParameterVector,
    /// The optimizer considers the run finished.
    pub converged: bool,
}

impl Step {
    pub fn new(parameters: ParameterVector, converged: bool) -> Self {
        Self {
            parameters,
            converged,
        }
    }
}

/// A classical optimizer driven one iteration at a time.
///
/// Implementations may call `objective` as often as one iteration needs
/// and keep state between calls. A fresh instance is built for every
/// repetition, so state never leaks across runs.
pub trait Optimizer: Send {
    /// Method name for logs and reports.
    fn name(&self) -> &str;

    /// Run one iteration starting from `current`.
    fn step(&mut self, objective: &mut Objective<'_>, current: &ParameterVector)
    -> OptResult<Step>;
}

/// Builds the optimizer owned by one repetition.
pub trait OptimizerFactory: Send + Sync {
    fn create(&self, num_parameters: usize, repetition: usize) -> OptResult<Box<dyn Optimizer>>;
}

impl<F> OptimizerFactory for F
where
    F: Fn(usize, usize) -> OptResult<Box<dyn Optimizer>> + Send + Sync,
{
    fn create(&self, num_parameters: usize, repetition: usize) -> OptResult<Box<dyn Optimizer>> {
        self(num_parameters, repetition)
    }
}

/// Call the objective and reject non-finite energies.
pub fn evaluate(objective: &mut Objective<'_>, parameters: &ParameterVector) -> OptResult<f64> {
    let value = objective(parameters)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(OptError::Divergence {
            value,
            parameters: parameters.to_string(),
        })
    }
}
