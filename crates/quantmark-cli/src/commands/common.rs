//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;

use quantmark_bench::BenchmarkReport;
use quantmark_hal::BackendRegistry;

/// Registry with every backend this binary ships.
pub fn backend_registry() -> Arc<BackendRegistry> {
    let mut registry = BackendRegistry::new();
    quantmark_adapter_sim::register(&mut registry);
    Arc::new(registry)
}

/// Read a text file, failing with its path in the message.
pub fn read_text(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

fn format_energy(energy: Option<f64>) -> String {
    energy.map_or_else(|| "-".to_string(), |e| format!("{e:.8}"))
}

/// Print the human-readable benchmark summary.
pub fn print_report(report: &BenchmarkReport) {
    let result = &report.result;

    println!(
        "\n{} Benchmark finished in {:.2?}",
        style("✓").green().bold(),
        report.duration
    );
    println!(
        "  Repetitions: {} completed, {} failed, {} retried",
        style(report.completed_repetitions).green(),
        if report.failed_repetitions > 0 {
            style(report.failed_repetitions).red()
        } else {
            style(report.failed_repetitions).dim()
        },
        report.retried_repetitions
    );
    for (status, count) in &report.status_counts {
        println!("    {status}: {count}");
    }

    println!(
        "  Circuit: {} qubits, depth {}",
        result.qubit_count, result.gate_depth
    );
    println!("  Average iterations: {:.2}", result.average_iterations);
    println!(
        "  Final average energy: {}",
        style(format_energy(result.average_history.last().copied())).cyan()
    );
    println!("  Best energy: {}", format_energy(report.best_energy()));

    match (report.reference_energy, result.success_rate) {
        (Some(reference), Some(rate)) => {
            println!("  Reference energy: {}", format_energy(Some(reference)));
            if let Some(error) = result.accuracy_history.as_ref().and_then(|a| a.last()) {
                println!("  Final error: {error:.3e}");
            }
            let styled = style(format!("{:.1}%", rate * 100.0));
            println!(
                "  Success rate: {}",
                if rate >= 0.5 {
                    styled.green().bold()
                } else {
                    styled.yellow().bold()
                }
            );
        }
        _ => println!("  Reference energy: {}", style("unknown").dim()),
    }
}
