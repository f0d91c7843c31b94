//! pitch CLI - proposal generator.
//!
//! Provides commands for:
//! - `render`: Render an AI-written markdown document to HTML
//! - `chat`: Answer the interview questions of a new proposal session
//! - `proposal`: Fetch, regenerate or preview a proposal

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ChatArgs, GlobalArgs, ProposalArgs, RenderArgs};
use error::CliError;
use output::Output;

/// pitch - Proposal generator.
#[derive(Parser)]
#[command(name = "pitch", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown document to HTML.
    Render(RenderArgs),
    /// Start an interview session with the proposal assistant.
    Chat(ChatArgs),
    /// Show, regenerate or preview a proposal.
    Proposal(ProposalArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.global.load_config()?;

    match cli.command {
        Commands::Render(args) => runtime()?.block_on(args.execute(&config)),
        Commands::Chat(args) => args.execute(&config),
        Commands::Proposal(args) => runtime()?.block_on(args.execute(&config)),
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    Ok(tokio::runtime::Runtime::new()?)
}
