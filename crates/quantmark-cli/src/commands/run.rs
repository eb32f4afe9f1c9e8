//! Run command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use quantmark_bench::{Benchmark, BenchmarkSpec, RunTrajectory};
use quantmark_chem::TabulatedChemistry;

use super::common::{backend_registry, print_report};

/// Command-line overrides of the benchmark file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub repetitions: Option<usize>,
    pub parallel: Option<usize>,
    pub seed: Option<u64>,
}

impl Overrides {
    fn apply(self, mut spec: BenchmarkSpec) -> BenchmarkSpec {
        if let Some(repetitions) = self.repetitions {
            spec.repetitions = repetitions;
        }
        if let Some(parallel) = self.parallel {
            spec.max_parallel = Some(parallel);
        }
        match self.seed {
            Some(seed) => spec.with_seed(seed),
            None => spec,
        }
    }
}

/// Execute the run command.
pub async fn execute(
    config: &str,
    output: Option<&str>,
    overrides: Overrides,
    quiet: bool,
) -> Result<()> {
    let spec = overrides.apply(BenchmarkSpec::from_path(config)?);
    let name = spec.name.clone().unwrap_or_else(|| config.to_string());

    let problem = spec.prepare(&TabulatedChemistry::new())?;
    let backends = backend_registry().configure(spec.backend.clone())?;

    if !quiet {
        println!(
            "{} Benchmarking {} on {} with {} ({} repetitions)",
            style("→").cyan().bold(),
            style(&name).green(),
            style(backends.name()).yellow(),
            style(&spec.optimizer.method).yellow(),
            spec.repetitions
        );
        println!(
            "  Circuit: {} qubits, depth {}, {} parameters",
            problem.circuit.qubit_count(),
            problem.circuit.gate_depth(),
            problem.circuit.num_parameters()
        );
    }

    let mut benchmark = Benchmark::new(problem, spec.benchmark_config())?;

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(spec.repetitions as u64)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );
    {
        let bar = bar.clone();
        benchmark = benchmark.with_progress(Arc::new(move |trajectory: &RunTrajectory| {
            bar.set_message(trajectory.status.label());
            bar.inc(1);
        }));
    }

    let report = benchmark.run(backends, spec.optimizer.clone()).await?;
    bar.finish_and_clear();
    info!(name = %name, "benchmark complete");

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write report: {path}"))?;
            if !quiet {
                println!("  Report written to {}", style(path).green());
            }
        }
        None if quiet => println!("{json}"),
        None => {}
    }

    if !quiet {
        print_report(&report);
    }

    Ok(())
}
