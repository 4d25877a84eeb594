//! `docintel` command line entry point.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process};

/// Pull plain text and invoice fields out of PDFs and scanned images
#[derive(Parser)]
#[command(name = "docintel", author, version, about)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file to use instead of the default location
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text and fields from one file
    Process(process::ProcessArgs),

    /// Extract from every file matching a glob pattern
    Batch(batch::BatchArgs),

    /// Inspect or edit the config file
    Config(config::ConfigArgs),
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(log_level(cli.verbose))
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
