//! Molecules command implementation.

use console::style;

use quantmark_chem::TabulatedChemistry;

/// Execute the molecules command.
pub fn execute() {
    println!(
        "{} Tabulated molecules:\n",
        style("quantmark").cyan().bold()
    );

    for entry in TabulatedChemistry::new().entries() {
        println!(
            "  {} {} ({})",
            style("●").green(),
            style(entry.formula).bold(),
            entry.basis
        );
        println!("    Mapping: {}", entry.transformation);
        println!("    Active orbitals: {}", entry.active_orbitals);
        println!("    Qubits: {}", entry.num_qubits);
        println!("    Pauli terms: {}", entry.hamiltonian().num_terms());
    }
}
