// botvm: sandboxed, resource-metered bot-script runner

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use botvm::interpreter::constants::{DEFAULT_CYCLES, DEFAULT_ENERGY, HEAP_CAPACITY};
use botvm::world::MockWorld;
use botvm::{run, Fault, Limits};

/// Run a bot script in the sandboxed VM against a mock world.
#[derive(Debug, ClapParser)]
#[command(name = "botvm", version, about)]
struct Cli {
    /// Script file to execute
    script: PathBuf,

    /// Energy budget for the run
    #[arg(long, default_value_t = DEFAULT_ENERGY)]
    energy: i64,

    /// Cycle budget for the run
    #[arg(long, default_value_t = DEFAULT_CYCLES)]
    cycles: u64,

    /// Heap arena capacity in bytes
    #[arg(long, default_value_t = HEAP_CAPACITY)]
    heap_bytes: usize,

    /// Entity id reported by self()
    #[arg(long, default_value_t = 1.0)]
    self_id: f64,

    /// Log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = match fs::read_to_string(&cli.script) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading {}: {}", cli.script.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let mut world = MockWorld::new(cli.self_id);
    let limits = Limits {
        energy: cli.energy,
        cycles: cli.cycles,
        heap_bytes: cli.heap_bytes,
    };

    match run(&source, &mut world, limits) {
        Ok(exit_value) => {
            for value in &world.emitted {
                println!("{}", value);
            }
            tracing::info!(exit_value, "script completed");
            ExitCode::SUCCESS
        }
        Err(Fault::Lex(err)) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(Fault::Syntax(err)) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(Fault::Runtime(signal)) => {
            // Output emitted before the termination still counts; effects on
            // the world are not rolled back.
            for value in &world.emitted {
                println!("{}", value);
            }
            eprintln!("Script terminated: {}", signal);
            ExitCode::FAILURE
        }
    }
}
