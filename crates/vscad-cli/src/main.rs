mod commands;
mod config;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{export, import, list, plan, plugins, ExportArgs, ImportArgs, ListArgs, PlanArgs};
use tracing_subscriber::EnvFilter;
use vscad_assembly::PluginRegistry;

/// vscad - Virtual Satellite JSON to CAD document bridge
#[derive(Parser, Debug)]
#[command(name = "vscad")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory holding vscad.config.json (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    directory: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a JSON model into assembly documents
    Import(ImportArgs),

    /// Export an assembly document tree back to JSON
    Export(ExportArgs),

    /// Show the build order of a JSON model without importing it
    Plan(PlanArgs),

    /// List the documents in the work directory
    List(ListArgs),

    /// List the registered exchange plugins
    Plugins,
}

/// Install the fmt subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cwd = match cli.directory.map_or_else(std::env::current_dir, Ok) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("{} cannot determine working directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };
    let registry = PluginRegistry::with_defaults();

    let result = match cli.command {
        Command::Import(args) => import(args, &cwd, &registry),
        Command::Export(args) => export(args, &cwd, &registry),
        Command::Plan(args) => plan(args),
        Command::List(args) => list(args, &cwd),
        Command::Plugins => plugins(&registry),
    };

    if let Err(err) = result {
        tracing::error!("{:#}", err);
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
