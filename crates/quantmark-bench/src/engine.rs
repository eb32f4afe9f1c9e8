//! VQE run engine: one optimization trajectory.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use quantmark_hal::{Backend, CancelToken, HalError, PauliHamiltonian};
use quantmark_ir::{CircuitDescriptor, ParameterVector};
use quantmark_opt::{OptError, Optimizer};

/// How a trajectory ended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TerminationStatus {
    Converged,
    MaxIterationsReached,
    OptimizerFailure { reason: String },
    BackendUnavailable { reason: String },
    Cancelled,
}

impl TerminationStatus {
    /// Failed trajectories are left out of the averages and never count
    /// as successes.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TerminationStatus::OptimizerFailure { .. }
                | TerminationStatus::BackendUnavailable { .. }
                | TerminationStatus::Cancelled
        )
    }

    /// Short label used for tallies.
    pub fn label(&self) -> &'static str {
        match self {
            TerminationStatus::Converged => "converged",
            TerminationStatus::MaxIterationsReached => "max_iterations_reached",
            TerminationStatus::OptimizerFailure { .. } => "optimizer_failure",
            TerminationStatus::BackendUnavailable { .. } => "backend_unavailable",
            TerminationStatus::Cancelled => "cancelled",
        }
    }

    fn from_backend_error(error: &HalError) -> Self {
        match error {
            HalError::Cancelled => TerminationStatus::Cancelled,
            other => TerminationStatus::BackendUnavailable {
                reason: other.to_string(),
            },
        }
    }

    fn from_optimizer_error(error: &OptError) -> Self {
        match error {
            OptError::Backend(e) => Self::from_backend_error(e),
            other => TerminationStatus::OptimizerFailure {
                reason: other.to_string(),
            },
        }
    }
}

impl fmt::Display for TerminationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationStatus::OptimizerFailure { reason }
            | TerminationStatus::BackendUnavailable { reason } => {
                write!(f, "{}: {reason}", self.label())
            }
            _ => f.write_str(self.label()),
        }
    }
}

/// One evaluated point of a trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub iteration: usize,
    pub energy: f64,
    pub parameters: ParameterVector,
}

/// Everything one VQE run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunTrajectory {
    pub repetition: usize,
    /// Zero for the first attempt, higher after retries.
    pub attempt: usize,
    pub initial_parameters: ParameterVector,
    pub records: Vec<TrajectoryRecord>,
    pub status: TerminationStatus,
    /// Backend evaluations, including the optimizer's own.
    pub evaluations: usize,
    pub duration: Duration,
}

impl RunTrajectory {
    /// A trajectory that ended before its first evaluation.
    pub fn failed(
        repetition: usize,
        attempt: usize,
        initial_parameters: ParameterVector,
        status: TerminationStatus,
    ) -> Self {
        Self {
            repetition,
            attempt,
            initial_parameters,
            records: Vec::new(),
            status,
            evaluations: 0,
            duration: Duration::ZERO,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        self.status.is_failure()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.energy).collect()
    }

    pub fn final_energy(&self) -> Option<f64> {
        self.records.last().map(|r| r.energy)
    }

    pub fn best_energy(&self) -> Option<f64> {
        self.records.iter().map(|r| r.energy).reduce(f64::min)
    }
}

/// Inputs shared by every iteration of one run.
pub struct RunContext<'a> {
    pub circuit: &'a CircuitDescriptor,
    pub hamiltonian: &'a PauliHamiltonian,
    pub max_iterations: usize,
    pub cancel: &'a CancelToken,
}

/// Execute one VQE trajectory.
///
/// Each iteration evaluates the energy at the current parameters, records
/// it and asks the optimizer for the next point, until the optimizer
/// reports convergence or `max_iterations` records exist. Errors end the
/// run with a failure status instead of propagating.
#[instrument(
    skip_all,
    fields(repetition = repetition, attempt = attempt, optimizer = optimizer.name())
)]
pub fn run_trajectory(
    context: &RunContext<'_>,
    backend: &mut dyn Backend,
    optimizer: &mut dyn Optimizer,
    initial_parameters: ParameterVector,
    repetition: usize,
    attempt: usize,
) -> RunTrajectory {
    let started = Instant::now();
    let mut records = Vec::new();
    let mut evaluations = 0usize;
    let mut current = initial_parameters.clone();

    let status = 'run: {
        for iteration in 0..context.max_iterations {
            if context.cancel.is_cancelled() {
                break 'run TerminationStatus::Cancelled;
            }

            evaluations += 1;
            let energy = match backend.evaluate(context.circuit, &current, context.hamiltonian) {
                Ok(e) => e,
                Err(e) => break 'run TerminationStatus::from_backend_error(&e),
            };
            if !energy.is_finite() {
                break 'run TerminationStatus::OptimizerFailure {
                    reason: format!("non-finite energy {energy} at {current}"),
                };
            }
            trace!(iteration, energy, "evaluated");
            records.push(TrajectoryRecord {
                iteration,
                energy,
                parameters: current.clone(),
            });

            let step = {
                let mut objective = |p: &ParameterVector| -> Result<f64, OptError> {
                    context.cancel.check()?;
                    evaluations += 1;
                    Ok(backend.evaluate(context.circuit, p, context.hamiltonian)?)
                };
                optimizer.step(&mut objective, &current)
            };
            match step {
                Ok(step) => {
                    current = step.parameters;
                    if step.converged {
                        break 'run TerminationStatus::Converged;
                    }
                }
                Err(e) => break 'run TerminationStatus::from_optimizer_error(&e),
            }
        }
        TerminationStatus::MaxIterationsReached
    };

    debug!(
        iterations = records.len(),
        evaluations,
        %status,
        "trajectory finished"
    );

    RunTrajectory {
        repetition,
        attempt,
        initial_parameters,
        records,
        status,
        evaluations,
        duration: started.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantmark_hal::HalResult;
    use quantmark_opt::{OptResult, Step};

    struct Constant(f64);

    impl Backend for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn evaluate(
            &mut self,
            _: &CircuitDescriptor,
            _: &ParameterVector,
            _: &PauliHamiltonian,
        ) -> HalResult<f64> {
            Ok(self.0)
        }
    }

    /// Energy equal to the first parameter.
    struct Linear;

    impl Backend for Linear {
        fn name(&self) -> &str {
            "linear"
        }

        fn evaluate(
            &mut self,
            _: &CircuitDescriptor,
            p: &ParameterVector,
            _: &PauliHamiltonian,
        ) -> HalResult<f64> {
            Ok(p.values().first().copied().unwrap_or(0.0))
        }
    }

    /// Converges after `after` steps, moving the first parameter by -1 each step.
    struct Countdown {
        after: usize,
        steps: usize,
    }

    impl Optimizer for Countdown {
        fn name(&self) -> &str {
            "countdown"
        }

        fn step(
            &mut self,
            objective: &mut quantmark_opt::Objective<'_>,
            current: &ParameterVector,
        ) -> OptResult<Step> {
            objective(current)?;
            self.steps += 1;
            let mut values = current.values().to_vec();
            if let Some(v) = values.first_mut() {
                *v -= 1.0;
            }
            Ok(Step::new(current.with_values(values)?, self.steps >= self.after))
        }
    }

    fn context<'a>(
        circuit: &'a CircuitDescriptor,
        h: &'a PauliHamiltonian,
        cancel: &'a CancelToken,
        max_iterations: usize,
    ) -> RunContext<'a> {
        RunContext {
            circuit,
            hamiltonian: h,
            max_iterations,
            cancel,
        }
    }

    fn fixture() -> (CircuitDescriptor, PauliHamiltonian, CancelToken) {
        (CircuitDescriptor::new(), PauliHamiltonian::default(), CancelToken::new())
    }

    fn start() -> ParameterVector {
        ParameterVector::zeros(vec!["a".into()])
    }

    #[test]
    fn test_converges_after_one_step() {
        let (c, h, cancel) = fixture();
        let mut optimizer = Countdown { after: 1, steps: 0 };
        let t = run_trajectory(
            &context(&c, &h, &cancel, 10),
            &mut Constant(-1.5),
            &mut optimizer,
            start(),
            0,
            0,
        );

        assert_eq!(t.status, TerminationStatus::Converged);
        assert_eq!(t.energies(), vec![-1.5]);
        assert_eq!(t.records[0].iteration, 0);
        assert_eq!(t.evaluations, 2);
    }

    #[test]
    fn test_iteration_cap() {
        let (c, h, cancel) = fixture();
        let mut optimizer = Countdown { after: 100, steps: 0 };
        let t = run_trajectory(
            &context(&c, &h, &cancel, 4),
            &mut Linear,
            &mut optimizer,
            start(),
            2,
            0,
        );

        assert_eq!(t.status, TerminationStatus::MaxIterationsReached);
        assert_eq!(t.energies(), vec![0.0, -1.0, -2.0, -3.0]);
        assert_eq!(t.final_energy(), Some(-3.0));
        assert_eq!(t.best_energy(), Some(-3.0));
        assert_eq!(t.repetition, 2);
        assert_eq!(t.initial_parameters, start());
    }

    #[test]
    fn test_non_finite_energy_is_not_recorded() {
        let (c, h, cancel) = fixture();
        let mut optimizer = Countdown { after: 5, steps: 0 };
        let t = run_trajectory(
            &context(&c, &h, &cancel, 10),
            &mut Constant(f64::NAN),
            &mut optimizer,
            start(),
            0,
            0,
        );

        assert!(t.is_empty());
        assert!(matches!(t.status, TerminationStatus::OptimizerFailure { .. }));
        assert!(t.is_failure());
    }

    #[test]
    fn test_backend_error_maps_to_unavailable() {
        struct Offline;
        impl Backend for Offline {
            fn name(&self) -> &str {
                "offline"
            }
            fn evaluate(
                &mut self,
                _: &CircuitDescriptor,
                _: &ParameterVector,
                _: &PauliHamiltonian,
            ) -> HalResult<f64> {
                Err(HalError::BackendUnavailable("no route".into()))
            }
        }

        let (c, h, cancel) = fixture();
        let mut optimizer = Countdown { after: 5, steps: 0 };
        let t = run_trajectory(
            &context(&c, &h, &cancel, 10),
            &mut Offline,
            &mut optimizer,
            start(),
            0,
            0,
        );
        assert_eq!(t.status.label(), "backend_unavailable");
        assert_eq!(t.evaluations, 1);
    }

    #[test]
    fn test_cancelled_before_start() {
        let (c, h, cancel) = fixture();
        cancel.cancel();
        let mut optimizer = Countdown { after: 5, steps: 0 };
        let t = run_trajectory(
            &context(&c, &h, &cancel, 10),
            &mut Linear,
            &mut optimizer,
            start(),
            0,
            0,
        );
        assert_eq!(t.status, TerminationStatus::Cancelled);
        assert_eq!(t.evaluations, 0);
    }

    #[test]
    fn test_status_serialization() {
        let status = TerminationStatus::OptimizerFailure {
            reason: "diverged".into(),
        };
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"status":"optimizer_failure","reason":"diverged"}"#);
        assert_eq!(status.to_string(), "optimizer_failure: diverged");
    }
}
