//! Batch processing command for multiple files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use super::{build_pipeline, config::load_config, process_file, DocumentReport, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: print each report to stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Skip OCR and use only embedded PDF text
    #[arg(long)]
    text_only: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    report: Option<DocumentReport>,
    error: Option<String>,
    processed_at: DateTime<Utc>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
        )?
        .progress_chars("=>-"),
    );

    let pipeline = build_pipeline(&config, args.text_only);
    let mut results: Vec<ProcessResult> = Vec::with_capacity(files.len());

    for path in files {
        let result = process_file(&pipeline, &path, None, false);
        let processed_at = Utc::now();

        match result {
            Ok(report) => {
                let id = results.iter().filter(|r| r.report.is_some()).count() + 1;
                emit_report(&report, id, processed_at, &args, &pb)?;
                results.push(ProcessResult {
                    path,
                    report: Some(report),
                    error: None,
                    processed_at,
                });
            }
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if !args.continue_on_error {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(ProcessResult {
                    path,
                    report: None,
                    error: Some(error_msg),
                    processed_at,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Write one report to the output directory, or print it. `id` matches the
/// summary row and keeps same-named inputs from different directories apart.
fn emit_report(
    report: &DocumentReport,
    id: usize,
    processed_at: DateTime<Utc>,
    args: &BatchArgs,
    pb: &ProgressBar,
) -> anyhow::Result<()> {
    let content = report.render(args.format)?;

    match &args.output_dir {
        Some(output_dir) => {
            let output_path = output_dir.join(output_name(
                id,
                &report.filename,
                processed_at,
                args.format,
            ));
            fs::write(&output_path, content)?;
            debug!("Wrote output to {}", output_path.display());
        }
        None => pb.suspend(|| println!("{}", content)),
    }

    Ok(())
}

/// Timestamped, space-free name a file is stored under, e.g.
/// `20240115-093000_my_scan.pdf`.
pub fn stored_name(filename: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}", at.format("%Y%m%d-%H%M%S"), filename.replace(' ', "_"))
}

fn output_name(id: usize, filename: &str, at: DateTime<Utc>, format: OutputFormat) -> String {
    format!("{:04}_{}.{}", id, stored_name(filename, at), format.extension())
}

/// Document listing of every successfully processed file.
fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "filename",
        "invoice_number",
        "amount",
        "email",
        "date",
        "created_at",
    ])?;

    let processed = results
        .iter()
        .filter_map(|r| r.report.as_ref().map(|report| (report, r.processed_at)));

    for (id, (report, processed_at)) in processed.enumerate() {
        let fields = &report.fields;
        wtr.write_record([
            (id + 1).to_string().as_str(),
            stored_name(&report.filename, processed_at).as_str(),
            fields.invoice_number().unwrap_or_default(),
            fields.amount().unwrap_or_default(),
            fields.email().unwrap_or_default(),
            fields.date().unwrap_or_default(),
            processed_at.to_rfc3339().as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
