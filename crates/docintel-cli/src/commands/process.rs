//! Process command - extract text and fields from a single file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::{build_pipeline, config::load_config, process_file, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Declared media type (default: guessed from the file extension)
    #[arg(short, long)]
    media_type: Option<String>,

    /// Skip OCR and use only embedded PDF text
    #[arg(long)]
    text_only: bool,

    /// Include the span each field was matched at
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}", args.input.display()));

    let pipeline = build_pipeline(&config, args.text_only);
    let result = process_file(
        &pipeline,
        &args.input,
        args.media_type.as_deref(),
        args.explain,
    );
    pb.finish_and_clear();

    let report = result?;
    if report.backend_unavailable {
        eprintln!(
            "{} OCR backend unavailable, output may be incomplete",
            style("!").yellow()
        );
    }

    let output = report.render(args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
