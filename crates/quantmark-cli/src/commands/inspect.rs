//! Inspect command implementation.

use anyhow::Result;
use console::style;

use quantmark_parse::parse_circuit;

use super::common::read_text;

/// Execute the inspect command.
pub fn execute(path: &str) -> Result<()> {
    let source = read_text(path)?;
    let circuit = parse_circuit(&source)?;

    println!("{} {}", style("Circuit").cyan().bold(), style(path).green());
    println!("  Gates: {}", circuit.len());
    println!("  Qubits: {}", circuit.qubit_count());
    println!("  Depth: {}", circuit.gate_depth());

    let names = circuit.parameter_names();
    if names.is_empty() {
        println!("  Parameters: {}", style("none").dim());
    } else {
        println!("  Parameters ({}): {}", names.len(), names.join(", "));
    }

    println!("\n  Layers:");
    let gates = circuit.gates();
    for (depth, layer) in circuit.layers().iter().enumerate() {
        let ops: Vec<String> = layer.iter().map(|&i| gates[i].to_string()).collect();
        println!("    {:>3}: {}", style(depth + 1).yellow(), ops.join("  "));
    }

    Ok(())
}
