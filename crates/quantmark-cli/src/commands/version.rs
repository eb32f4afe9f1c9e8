//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - VQE benchmarking harness",
        style("quantmark").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  quantmark-ir     Molecule, circuit and parameter descriptors");
    println!("  quantmark-parse  Circuit and molecule text front-end");
    println!("  quantmark-hal    Backend and chemistry contracts");
    println!("  quantmark-opt    Classical optimizers");
    println!("  quantmark-chem   Tabulated model Hamiltonians");
    println!("  quantmark-bench  Benchmark orchestration and aggregation");
}
