//! Combining trajectories into summary statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::RunTrajectory;

/// How trajectories of unequal length are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// Length of the longest trajectory; a trajectory leaves the mean once
    /// it has no entry at an index.
    #[default]
    DropOut,
    /// Length of the longest trajectory; exhausted trajectories keep
    /// contributing their final energy.
    HoldLast,
    /// Length of the shortest trajectory.
    Truncate,
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregationPolicy::DropOut => "drop-out",
            AggregationPolicy::HoldLast => "hold-last",
            AggregationPolicy::Truncate => "truncate",
        })
    }
}

/// How distance to the reference energy is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccuracyMode {
    /// `|E - E_ref|`
    #[default]
    Absolute,
    /// `|E - E_ref| / |E_ref|`
    Relative,
}

impl AccuracyMode {
    pub fn error(&self, energy: f64, reference: f64) -> f64 {
        let absolute = (energy - reference).abs();
        match self {
            AccuracyMode::Absolute => absolute,
            AccuracyMode::Relative => absolute / reference.abs(),
        }
    }
}

/// Summary statistics of one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Mean energy per iteration index.
    pub average_history: Vec<f64>,
    /// Error of `average_history` against the reference, when one is known.
    pub accuracy_history: Option<Vec<f64>>,
    pub qubit_count: usize,
    pub gate_depth: usize,
    /// Mean trajectory length over all repetitions.
    pub average_iterations: f64,
    /// Share of repetitions that ended within the threshold of the
    /// reference, when one is known.
    pub success_rate: Option<f64>,
}

/// Mean energy per iteration over `histories`.
pub fn average_history(histories: &[Vec<f64>], policy: AggregationPolicy) -> Vec<f64> {
    let length = match policy {
        AggregationPolicy::Truncate => histories.iter().map(Vec::len).min(),
        AggregationPolicy::DropOut | AggregationPolicy::HoldLast => {
            histories.iter().map(Vec::len).max()
        }
    }
    .unwrap_or(0);

    (0..length)
        .map(|i| {
            let (sum, count) = histories
                .iter()
                .filter_map(|h| match policy {
                    AggregationPolicy::HoldLast => h.get(i).or(h.last()),
                    _ => h.get(i),
                })
                .fold((0.0, 0usize), |(s, n), e| (s + e, n + 1));
            sum / count as f64
        })
        .collect()
}

/// Error of each averaged energy against `reference`.
pub fn accuracy_history(average: &[f64], reference: f64, mode: AccuracyMode) -> Vec<f64> {
    average.iter().map(|&e| mode.error(e, reference)).collect()
}

/// Share of `repetitions` whose trajectory succeeded and ended strictly
/// within `threshold` of `reference`.
pub fn success_rate(
    trajectories: &[RunTrajectory],
    repetitions: usize,
    reference: f64,
    threshold: f64,
    mode: AccuracyMode,
) -> f64 {
    if repetitions == 0 {
        return 0.0;
    }
    let successes = trajectories
        .iter()
        .filter(|t| !t.is_failure())
        .filter_map(RunTrajectory::final_energy)
        .filter(|&e| mode.error(e, reference) < threshold)
        .count();
    successes as f64 / repetitions as f64
}

/// Mean number of records over every trajectory, failed ones included.
pub fn average_iterations(trajectories: &[RunTrajectory]) -> f64 {
    if trajectories.is_empty() {
        return 0.0;
    }
    let total: usize = trajectories.iter().map(RunTrajectory::len).sum();
    total as f64 / trajectories.len() as f64
}

/// Aggregation settings taken from the benchmark configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregation {
    pub policy: AggregationPolicy,
    pub accuracy: AccuracyMode,
    pub threshold: f64,
    pub reference_energy: Option<f64>,
}

impl Aggregation {
    /// Build the result from the final trajectory of every repetition.
    pub fn aggregate(
        &self,
        trajectories: &[RunTrajectory],
        qubit_count: usize,
        gate_depth: usize,
    ) -> BenchmarkResult {
        let histories: Vec<Vec<f64>> = trajectories
            .iter()
            .filter(|t| !t.is_failure())
            .map(RunTrajectory::energies)
            .collect();
        let average = average_history(&histories, self.policy);

        BenchmarkResult {
            accuracy_history: self
                .reference_energy
                .map(|r| accuracy_history(&average, r, self.accuracy)),
            success_rate: self.reference_energy.map(|r| {
                success_rate(trajectories, trajectories.len(), r, self.threshold, self.accuracy)
            }),
            average_history: average,
            qubit_count,
            gate_depth,
            average_iterations: average_iterations(trajectories),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{TerminationStatus, TrajectoryRecord};
    use quantmark_ir::ParameterVector;

    fn trajectory(repetition: usize, energies: &[f64], status: TerminationStatus) -> RunTrajectory {
        let mut t = RunTrajectory::failed(repetition, 0, ParameterVector::default(), status);
        t.records = energies
            .iter()
            .enumerate()
            .map(|(iteration, &energy)| TrajectoryRecord {
                iteration,
                energy,
                parameters: ParameterVector::default(),
            })
            .collect();
        t
    }

    fn histories() -> Vec<Vec<f64>> {
        vec![vec![4.0, 2.0, 1.0], vec![2.0]]
    }

    #[test]
    fn test_drop_out() {
        assert_eq!(
            average_history(&histories(), AggregationPolicy::DropOut),
            vec![3.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_hold_last() {
        assert_eq!(
            average_history(&histories(), AggregationPolicy::HoldLast),
            vec![3.0, 2.0, 1.5]
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(
            average_history(&histories(), AggregationPolicy::Truncate),
            vec![3.0]
        );
    }

    #[test]
    fn test_single_history_is_identity() {
        let h = vec![vec![-0.5, -0.75, -0.8]];
        for policy in [
            AggregationPolicy::DropOut,
            AggregationPolicy::HoldLast,
            AggregationPolicy::Truncate,
        ] {
            assert_eq!(average_history(&h, policy), h[0]);
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(average_history(&[], AggregationPolicy::DropOut).is_empty());
        assert!(average_iterations(&[]) == 0.0);
    }

    #[test]
    fn test_accuracy_modes() {
        assert_eq!(accuracy_history(&[-1.0, -1.5], -2.0, AccuracyMode::Absolute), vec![1.0, 0.5]);
        assert_eq!(accuracy_history(&[-1.0, -1.5], -2.0, AccuracyMode::Relative), vec![0.5, 0.25]);
    }

    #[test]
    fn test_failed_repetitions_count_in_denominator_only() {
        let trajectories = vec![
            trajectory(0, &[-1.0, -1.99], TerminationStatus::Converged),
            trajectory(1, &[-1.0, -1.5], TerminationStatus::MaxIterationsReached),
            trajectory(
                2,
                &[-2.0],
                TerminationStatus::BackendUnavailable {
                    reason: "offline".into(),
                },
            ),
            trajectory(3, &[], TerminationStatus::Cancelled),
        ];

        let aggregation = Aggregation {
            policy: AggregationPolicy::DropOut,
            accuracy: AccuracyMode::Absolute,
            threshold: 0.1,
            reference_energy: Some(-2.0),
        };
        let result = aggregation.aggregate(&trajectories, 4, 3);

        assert_eq!(result.success_rate, Some(0.25));
        assert_eq!(result.average_iterations, 5.0 / 4.0);
        // The failed trajectory's -2.0 stays out of the mean.
        assert_eq!(result.average_history, vec![-1.0, (-1.99 - 1.5) / 2.0]);
    }

    #[test]
    fn test_no_reference() {
        let trajectories = vec![trajectory(0, &[0.5], TerminationStatus::Converged)];
        let aggregation = Aggregation {
            policy: AggregationPolicy::default(),
            accuracy: AccuracyMode::default(),
            threshold: 1e-3,
            reference_energy: None,
        };
        let result = aggregation.aggregate(&trajectories, 1, 1);
        assert_eq!(result.accuracy_history, None);
        assert_eq!(result.success_rate, None);
        assert_eq!(result.average_history, vec![0.5]);
    }
}
