use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dialog::ErrorCode;
use dialog::layout::Spacing;
use tracing_subscriber::EnvFilter;

mod commands;
mod io_util;

use commands::{CliError, EditOp};

#[derive(Parser, Debug)]
#[command(name = "dialogflow", about = "Convert dialog documents to editor graphs and back")]
struct Cli {
    /// Horizontal distance between layout columns.
    #[arg(long, global = true, env = "DIALOG_LAYOUT_X_SPACING", default_value_t = dialog::layout::DEFAULT_X_SPACING)]
    x_spacing: f64,

    /// Vertical distance between nodes in one column.
    #[arg(long, global = true, env = "DIALOG_LAYOUT_Y_SPACING", default_value_t = dialog::layout::DEFAULT_Y_SPACING)]
    y_spacing: f64,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an editor snapshot from a dialog document.
    Graph {
        #[arg(default_value = "-", help = "Document path, or - for stdin")]
        input: PathBuf,
    },
    /// Validate a snapshot and write the dialog document it describes.
    Export {
        #[arg(default_value = "-", help = "Snapshot path, or - for stdin")]
        input: PathBuf,
        /// Override the snapshot's `replace` flag.
        #[arg(long)]
        replace: Option<bool>,
        /// Export even when validation fails.
        #[arg(long)]
        force: bool,
    },
    /// Print validation problems; exits non-zero when there are any.
    Validate {
        #[arg(default_value = "-", help = "Snapshot path, or - for stdin")]
        input: PathBuf,
    },
    /// Re-organize a snapshot's node positions from its start node.
    Layout {
        #[arg(default_value = "-", help = "Snapshot path, or - for stdin")]
        input: PathBuf,
    },
    /// Load a document, export it again and report whether anything changed.
    Check {
        #[arg(default_value = "-", help = "Document path, or - for stdin")]
        input: PathBuf,
    },
    /// Apply one editing operation to a snapshot.
    Edit {
        #[arg(help = "Snapshot path, or - for stdin")]
        input: PathBuf,
        #[command(subcommand)]
        op: EditOp,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(code = error.error_code(), "command failed");
            eprintln!("error[{}]: {error}", error.error_code());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let spacing = Spacing { x: cli.x_spacing, y: cli.y_spacing };

    match cli.command {
        Command::Graph { input } => {
            let text = io_util::read_input(&input)?;
            io_util::print_json(&commands::graph(&text, spacing)?)
        }
        Command::Export { input, replace, force } => {
            let text = io_util::read_input(&input)?;
            let exported = commands::export(&text, replace, force)?;
            for diagnostic in &exported.diagnostics {
                eprintln!("warning: {diagnostic}");
            }
            io_util::print_json(&exported.document)
        }
        Command::Validate { input } => {
            let text = io_util::read_input(&input)?;
            let diagnostics = commands::validate(&text)?;
            for diagnostic in &diagnostics {
                println!("{diagnostic}");
            }
            if diagnostics.is_empty() {
                Ok(())
            } else {
                Err(CliError::Invalid(diagnostics.len()))
            }
        }
        Command::Layout { input } => {
            let text = io_util::read_input(&input)?;
            io_util::print_json(&commands::layout(&text, spacing)?)
        }
        Command::Check { input } => {
            let text = io_util::read_input(&input)?;
            let report = commands::check(&text, spacing)?;
            io_util::print_json(&report)?;
            if report.identical {
                Ok(())
            } else {
                Err(CliError::RoundTripMismatch)
            }
        }
        Command::Edit { input, op } => {
            let text = io_util::read_input(&input)?;
            io_util::print_json(&commands::edit(&text, &op)?)
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
