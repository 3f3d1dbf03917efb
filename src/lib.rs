pub mod cli;
pub mod core;

use crate::core::{ReturnBasis, config::AppConfig};
use anyhow::Result;
use tracing::debug;

/// Commands that operate on the reference table.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Fused weights for `indices`, or the configured default selection when
    /// `indices` is `None`.
    Weights {
        indices: Option<Vec<String>>,
        basis: Option<ReturnBasis>,
        json: bool,
    },
    Overview,
    Indices,
}

/// Loads the config and renders the output of `command` without printing it.
pub fn render_command(command: AppCommand, config_path: Option<&str>) -> Result<String> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let table = config.reference_table();

    match command {
        AppCommand::Weights {
            indices,
            basis,
            json,
        } => {
            let selection = indices.unwrap_or_else(|| config.default_selection.clone());
            cli::weights::render(&table, &selection, basis.unwrap_or(config.basis), json)
        }
        AppCommand::Overview => Ok(cli::overview::render_overview(&table)),
        AppCommand::Indices => Ok(cli::overview::render_indices(&table)),
    }
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    println!("{}", render_command(command, config_path)?);
    Ok(())
}
