//! laporan CLI - workbook extraction and report rendering
//!
//! Extracts the canonical report model from a spreadsheet workbook and
//! prints its JSON summary to stdout. With `--template`, renders the
//! template against the extracted model instead; unresolved references
//! are reported as warnings on stderr, never as failures.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use laporan_core::ModelSummary;
use laporan_pipeline::ReportPipeline;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "laporan",
    version,
    about = "Extract a canonical report model from a spreadsheet workbook",
    long_about = "Extract a canonical report model from a spreadsheet workbook \
                  (.xlsx, .xls, .ods) and print its JSON summary, or render a \
                  report template against it."
)]
struct Cli {
    /// Workbook file to extract (.xlsx, .xls, .ods)
    workbook: PathBuf,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the full canonical model instead of the summary
    #[arg(long)]
    full: bool,

    /// Render this template file against the extracted model
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Write the rendered artifact to this file instead of stdout
    #[arg(long, value_name = "FILE", requires = "template")]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let pipeline = ReportPipeline::new();
    let model = pipeline.extract(&cli.workbook)?;

    for warning in &model.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    if let Some(template_path) = &cli.template {
        let template = fs::read_to_string(template_path)
            .with_context(|| format!("cannot read template {}", template_path.display()))?;
        let report = pipeline.render_with_model(&model, &template)?;

        for unresolved in &report.unresolved {
            eprintln!(
                "{} unresolved reference {} (line {})",
                "warning:".yellow().bold(),
                unresolved.path,
                unresolved.line
            );
        }

        match &cli.output {
            Some(path) => fs::write(path, &report.text)
                .with_context(|| format!("cannot write {}", path.display()))?,
            None => print!("{}", report.text),
        }
        return Ok(());
    }

    let json = if cli.full {
        if cli.pretty {
            serde_json::to_string_pretty(&model)?
        } else {
            serde_json::to_string(&model)?
        }
    } else {
        let summary = ModelSummary::from_model(&model);
        if cli.pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        }
    };
    println!("{json}");
    Ok(())
}
