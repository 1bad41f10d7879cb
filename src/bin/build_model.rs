use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use splicefuse::cli;
use splicefuse::config::RunConfig;
use splicefuse::diagnostics::Diagnostics;
use splicefuse::gtf::{RenderOptions, render_model, write_gtf};
use splicefuse::model::assembly::GeneIdentity;
use splicefuse::pipeline::{TableStreams, build_gene_model, write_model};

#[derive(Parser)]
#[command(
    name = "build_model",
    about = "Fuse upstream spliced-alignment tables into a gene model"
)]
struct Cli {
    /// Path to the JSON run configuration
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Also print debug and info diagnostics
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Build Gene Model");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = RunConfig::from_file(&cli_args.config)?;
    cli::kv("Config", &cli_args.config.display().to_string());
    cli::kv("Gene", &config.gene);
    cli::kv("Organism", &config.organism);
    cli::kv("Work dir", &config.work_dir().display().to_string());

    let paths = config.table_paths();
    for (name, path) in paths.iter() {
        cli::kv(name, &path.display().to_string());
    }
    eprintln!();

    // ── Forward pass ─────────────────────────────────────
    cli::section("Gene Model");

    let identity = GeneIdentity {
        gene: config.gene.clone(),
        organism: config.organism.clone(),
    };
    let mut diagnostics = Diagnostics::new();
    let streams = TableStreams::open(&paths)?;
    let model = match build_gene_model(&identity, streams, &mut diagnostics) {
        Ok(model) => model,
        Err(e) => {
            cli::report_diagnostics(&diagnostics, cli_args.verbose);
            return Err(e).context("failed to build gene model");
        }
    };

    let annotated = model
        .isoforms
        .values()
        .filter(|i| i.is_cds_annotated())
        .count();
    cli::kv("Strand", &model.genome.strand.to_string());
    cli::kv(
        "Isoforms",
        &format!("{} ({annotated} with CDS)", model.isoforms.len()),
    );
    cli::kv("Introns", &model.introns.len().to_string());

    let model_path = config.resolve(&config.outputs.model);
    write_model(&model, &model_path)
        .with_context(|| format!("failed to write model: {}", model_path.display()))?;
    cli::success(&format!("model written to {}", model_path.display()));
    eprintln!();

    // ── GTF ──────────────────────────────────────────────
    let outputs: Vec<(PathBuf, bool)> = config.gtf_outputs().collect();
    if !outputs.is_empty() {
        cli::section("GTF");
        for (path, all_isoforms) in outputs {
            let options = RenderOptions {
                gene: None,
                all_isoforms,
            };
            let records = render_model(&model, &options, &mut diagnostics);
            let file = File::create(&path)
                .with_context(|| format!("failed to create GTF file: {}", path.display()))?;
            write_gtf(BufWriter::new(file), &records)?;
            cli::success(&format!("{} lines written to {}", records.len(), path.display()));
        }
        eprintln!();
    }

    // ── Diagnostics ──────────────────────────────────────
    cli::section("Diagnostics");
    cli::report_diagnostics(&diagnostics, cli_args.verbose);

    cli::print_summary(start, diagnostics.warning_count());
    Ok(())
}
