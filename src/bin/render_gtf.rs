use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use splicefuse::cli;
use splicefuse::config::validate_gene;
use splicefuse::diagnostics::Diagnostics;
use splicefuse::gtf::{RenderOptions, feature_counts, render_model, write_gtf};
use splicefuse::pipeline::read_model;

#[derive(Parser)]
#[command(name = "render_gtf", about = "Render a splicefuse gene model as GTF")]
struct Cli {
    /// Gene model JSON produced by build_model
    #[arg(short = 'm', long = "model")]
    model: PathBuf,

    /// Output GTF file
    #[arg(short = 'o', long = "out")]
    out: PathBuf,

    /// Include isoforms without an annotated CDS
    #[arg(long = "all-isoforms")]
    all_isoforms: bool,

    /// Gene symbol to use instead of the one stored in the model
    #[arg(short = 'g', long = "gene")]
    gene: Option<String>,

    /// Also print debug and info diagnostics
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Render GTF");

    cli::section("Input");
    if let Some(gene) = &cli_args.gene {
        validate_gene(gene)?;
    }
    let model = read_model(&cli_args.model)
        .with_context(|| format!("failed to read model: {}", cli_args.model.display()))?;
    cli::kv("Model", &cli_args.model.display().to_string());
    cli::kv("Gene", cli_args.gene.as_deref().unwrap_or(&model.gene));
    cli::kv("Sequence", &model.genome.sequence_id);
    cli::kv("Isoforms", &model.isoforms.len().to_string());
    eprintln!();

    cli::section("Output");
    let options = RenderOptions {
        gene: cli_args.gene.clone(),
        all_isoforms: cli_args.all_isoforms,
    };
    let mut diagnostics = Diagnostics::new();
    let records = render_model(&model, &options, &mut diagnostics);

    let file = File::create(&cli_args.out)
        .with_context(|| format!("failed to create GTF file: {}", cli_args.out.display()))?;
    write_gtf(BufWriter::new(file), &records)?;

    for (feature, count) in feature_counts(&records) {
        cli::kv(feature.as_str(), &count.to_string());
    }
    cli::success(&format!(
        "{} lines written to {}",
        records.len(),
        cli_args.out.display()
    ));
    eprintln!();

    cli::report_diagnostics(&diagnostics, cli_args.verbose);
    cli::print_summary(start, diagnostics.warning_count());
    Ok(())
}
