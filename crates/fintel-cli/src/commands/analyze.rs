//! Analyze command - run extraction over a batch of document images.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use fintel_core::{Analyzer, DocumentType, FintelError, InputDocument, OcrEngine};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input files or glob pattern (PNG/JPEG images)
    #[arg(required = true)]
    input: String,

    /// Document type (e.g. "Invoice", "Salary Slip")
    #[arg(short, long)]
    doc_type: DocumentType,

    /// Write the CSV report to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the invocation timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(timeout) = args.timeout {
        config.engine.timeout_secs = timeout;
    }

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching image files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} documents to analyze as {}",
        style("ℹ").blue(),
        files.len(),
        style(args.doc_type.name()).bold()
    );

    // A missing credential fails here, before any invocation.
    let engine = OcrEngine::from_env(config.engine.clone())
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    let analyzer = Analyzer::new(engine, args.doc_type);

    let documents: Vec<InputDocument> = files.into_iter().map(InputDocument::from_path).collect();

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let outcome = analyzer
        .run(&documents, |done, name| {
            debug!(done, document = name, "document finished");
            pb.set_message(name.to_string());
            pb.set_position(done as u64);
        })
        .await;

    let analysis = match outcome {
        Ok(analysis) => analysis,
        // Even a fully failed batch gets its per-document notices
        // printed before the overall error.
        Err(FintelError::BatchEmpty { warnings }) => {
            pb.finish_and_clear();
            println!("{}", style("Warnings:").yellow());
            for warning in &warnings {
                println!("  - {}", warning);
            }
            anyhow::bail!("no data extracted from any document in the batch");
        }
        Err(error) => return Err(error.into()),
    };

    pb.finish_with_message("Complete");
    println!();

    if !analysis.warnings.is_empty() {
        println!("{}", style("Warnings:").yellow());
        for warning in &analysis.warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    // Headline metrics
    for metric in analysis.table.headline_metrics() {
        println!("  {:<28} {}", metric.label, style(format_value(metric.value)).bold());
    }
    println!();

    // Table
    print_table(&analysis.table);

    if let Some(output) = &args.output {
        fs::write(output, analysis.table.to_csv()?)?;
        println!(
            "\n{} Report written to {}",
            style("✓").green(),
            output.display()
        );
    }

    println!(
        "\n{} Analyzed {} documents in {:?}",
        style("✓").green(),
        analysis.table.rows.len(),
        start.elapsed()
    );

    Ok(())
}

fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

fn print_table(table: &fintel_core::ResultTable) {
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let data_width = table
                .rows
                .iter()
                .map(|row| {
                    if i == 0 {
                        row.document.len()
                    } else {
                        format_value(row.values[i - 1]).len()
                    }
                })
                .max()
                .unwrap_or(0);
            col.len().max(data_width)
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<width$}", col, width = w))
        .collect();
    println!("  {}", style(header.join("  ")).bold());

    for row in &table.rows {
        let mut cells = vec![format!("{:<width$}", row.document, width = widths[0])];
        for (i, value) in row.values.iter().enumerate() {
            cells.push(format!("{:>width$}", format_value(*value), width = widths[i + 1]));
        }
        println!("  {}", cells.join("  "));
    }
}
