use anyhow::Result;
use capmatic::core::{ReturnBasis, log::init_logging};
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for capmatic::AppCommand {
    fn from(cmd: Commands) -> capmatic::AppCommand {
        match cmd {
            Commands::Weights {
                indices,
                basis,
                json,
            } => capmatic::AppCommand::Weights {
                indices: (!indices.is_empty()).then_some(indices),
                basis,
                json,
            },
            Commands::Overview => capmatic::AppCommand::Overview,
            Commands::Indices => capmatic::AppCommand::Indices,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Compute fused portfolio weights for the selected indices
    Weights {
        /// Index names, e.g. "S&P 500" "NIKKEI 225" (defaults to the configured selection)
        indices: Vec<String>,

        /// Return estimate to blend with probability-up: capm, 3m, 6m or 1y
        #[arg(short, long)]
        basis: Option<ReturnBasis>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display expected returns by period for all indices
    Overview,
    /// List the available indices
    Indices,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => capmatic::cli::setup::run(cli.config_path.as_deref()),
        Some(cmd) => capmatic::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
