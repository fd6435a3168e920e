//! TextGraph CLI — import and export node graphs as text documents.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::Session;
use manifest::{StrategyOverrides, TextGraphManifest};

#[derive(Parser)]
#[command(name = "textgraph", version, about = "Text serialization for node graphs")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new TextGraph project
    Init {
        /// Project name
        name: String,
    },
    /// Write a graph snapshot (GraphData JSON) as a text document
    Export {
        /// Input graph snapshot
        graph: PathBuf,
        /// Output document (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        strategies: StrategyArgs,
    },
    /// Read a text document back into a graph snapshot (GraphData JSON)
    Import {
        /// Input document
        document: PathBuf,
        /// Output graph snapshot (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        strategies: StrategyArgs,
    },
    /// Check that a document imports cleanly and is in canonical form
    Check {
        /// Document to check
        document: PathBuf,
        #[command(flatten)]
        strategies: StrategyArgs,
    },
    /// List registered strategies and the project's node types
    Strategies,
}

/// Strategy ids that override `[serialization]` in textgraph.toml.
#[derive(Args, Debug, Default)]
struct StrategyArgs {
    /// Text parser id
    #[arg(long)]
    parser: Option<String>,
    /// Connection parser id
    #[arg(long)]
    connections: Option<String>,
    /// Fragment writer id
    #[arg(long)]
    framer: Option<String>,
}

impl From<StrategyArgs> for StrategyOverrides {
    fn from(args: StrategyArgs) -> Self {
        Self {
            parser: args.parser,
            connections: args.connections,
            framer: args.framer,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name } => commands::init::run(&name),

        Commands::Export {
            graph,
            output,
            strategies,
        } => {
            let session = open_session(&cwd, strategies)?;
            commands::export::run(&session, &graph, output.as_deref())
        }

        Commands::Import {
            document,
            output,
            strategies,
        } => {
            let session = open_session(&cwd, strategies)?;
            commands::import::run(&session, &document, output.as_deref())
        }

        Commands::Check {
            document,
            strategies,
        } => {
            let session = open_session(&cwd, strategies)?;
            commands::check::run(&session, &document)
        }

        Commands::Strategies => {
            let manifest = load_manifest_optional(&cwd)?;
            commands::strategies::run(manifest.as_ref())
        }
    }
}

fn open_session(cwd: &Path, strategies: StrategyArgs) -> anyhow::Result<Session> {
    let manifest = load_manifest_optional(cwd)?;
    Session::open(manifest.as_ref(), &strategies.into())
}

/// Load textgraph.toml if one exists; strategy defaults apply otherwise.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<Option<TextGraphManifest>> {
    match TextGraphManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => {
            tracing::debug!(
                project = %manifest.project.name,
                dir = %dir.display(),
                "loaded manifest"
            );
            Ok(Some(manifest))
        }
        None => {
            tracing::debug!("no textgraph.toml found; using built-in strategy ids");
            Ok(None)
        }
    }
}
