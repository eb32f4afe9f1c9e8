//! quantmark Command-Line Interface
//!
//! Runs VQE benchmarks described in YAML or JSON files and inspects their
//! inputs.
//!
//! ```text
//! quantmark run --config lih.yaml --output report.json
//! quantmark inspect --circuit ansatz.txt
//! quantmark molecules
//! quantmark backends
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{backends, inspect, molecules, run, version};

/// quantmark - VQE benchmarking harness
#[derive(Parser)]
#[command(name = "quantmark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark file
    Run {
        /// Benchmark file (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        config: String,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<String>,

        /// Override the number of repetitions
        #[arg(short, long)]
        repetitions: Option<usize>,

        /// Maximum repetitions running at once
        #[arg(short, long)]
        parallel: Option<usize>,

        /// Override the seed; backend and optimizer seeds derive from it
        #[arg(short, long)]
        seed: Option<u64>,

        /// Only print the JSON report
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show qubits, depth, layers and parameters of a circuit file
    Inspect {
        /// Circuit file, one gate per line
        #[arg(short, long)]
        circuit: String,
    },

    /// List the tabulated molecules
    Molecules,

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            config,
            output,
            repetitions,
            parallel,
            seed,
            quiet,
        } => {
            let overrides = run::Overrides {
                repetitions,
                parallel,
                seed,
            };
            run::execute(&config, output.as_deref(), overrides, quiet).await
        }

        Commands::Inspect { circuit } => inspect::execute(&circuit),

        Commands::Molecules => {
            molecules::execute();
            Ok(())
        }

        Commands::Backends => {
            backends::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
