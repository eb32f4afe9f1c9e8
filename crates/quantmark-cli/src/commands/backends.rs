//! Backends command implementation.

use console::style;

use super::common::backend_registry;

/// Execute the backends command.
pub fn execute() {
    println!("{} Available backends:\n", style("quantmark").cyan().bold());

    for info in backend_registry().available_backends() {
        println!("  {} {}", style("●").green(), style(&info.name).bold());
        println!("    {}", info.description);
        if !info.aliases.is_empty() {
            println!("    Aliases: {}", info.aliases.join(", "));
        }
    }
}
