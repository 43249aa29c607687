//! ngraph - build, inspect and hover-simulate Neva program diagrams.
//!
//! Every command starts from an entity model JSON file. Graph JSON goes to
//! stdout; diagnostics and logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{config as config_cmd, hover::HoverArgs};
use config::Config;

/// ngraph - Neva program diagrams from the command line.
#[derive(Parser, Debug)]
#[command(
    name = "ngraph",
    author,
    version,
    about = "Build, inspect and hover-simulate Neva program diagrams",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the diagram graph and print it as JSON.
    Build {
        /// Entity model JSON file.
        model: PathBuf,

        /// Write the graph to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the nodes and edges of the diagram.
    Inspect {
        /// Entity model JSON file.
        model: PathBuf,
    },

    /// Hover a node and print the resulting snapshot as JSON.
    Hover {
        /// Entity model JSON file.
        model: PathBuf,

        /// Id of the node under the pointer, e.g. `main/Main`.
        node: String,

        /// Precomputed `{ "<node id>": { "x": .., "y": .. } }` positions.
        #[arg(short, long)]
        positions: Option<PathBuf>,

        /// Move the pointer off the node again before printing.
        #[arg(long)]
        leave: bool,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Build { model, output } => {
            let built = commands::build::execute(&model, output.as_deref())?;
            if !cli.quiet {
                eprintln!(
                    "Graph built: {} nodes, {} edges, {} diagnostics",
                    built.graph.node_count(),
                    built.graph.edge_count(),
                    built.diagnostics.len()
                );
            }
        }

        Commands::Inspect { model } => {
            commands::inspect::execute(&model)?;
        }

        Commands::Hover {
            model,
            node,
            positions,
            leave,
        } => {
            let args = HoverArgs {
                model: &model,
                node: &node,
                positions: positions.as_deref(),
                leave,
            };
            commands::hover::execute(&config, args).await?;
        }

        Commands::Config(config_cmd_inner) => match config_cmd_inner {
            ConfigCommands::Show => {
                config_cmd::show(&config)?;
            }
            ConfigCommands::Path => {
                if let Some(path) = Config::config_file_path() {
                    println!("{}", path.display());
                } else {
                    println!("(no config file path available)");
                }
            }
        },
    }

    Ok(())
}
