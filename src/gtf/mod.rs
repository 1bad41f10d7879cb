//! GTF rendering of a projected gene model, and reading the lines back.

pub mod record;

use std::collections::BTreeMap;
use std::io::{BufRead, Write};

use crate::codon;
use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::model::{FeatureKind, GeneModel, Isoform};

pub use record::{GtfRecord, SOURCE};

/// Which isoforms to render and under which gene name.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Overrides the model's gene symbol in `gene_id`/`transcript_id`.
    pub gene: Option<String>,
    /// Render isoforms without an annotated CDS as well.
    pub all_isoforms: bool,
}

/// Render the model as GTF records, isoforms by index, exons in genomic order.
pub fn render_model(
    model: &GeneModel,
    options: &RenderOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<GtfRecord> {
    let gene = options.gene.as_deref().unwrap_or(&model.gene);
    let strand = model.genome.strand;
    let mut records = Vec::new();

    for (&index, isoform) in &model.isoforms {
        if !options.all_isoforms && !isoform.is_cds_annotated() {
            continue;
        }
        recheck_codons(index, isoform, diagnostics);

        let transcript_id = format!("{gene}.{index}");
        let line = |feature: FeatureKind, bounds: (u64, u64), frame: Option<u8>| GtfRecord {
            seqname: model.genome.sequence_id.clone(),
            source: SOURCE.to_string(),
            feature,
            start: bounds.0,
            end: bounds.1,
            strand,
            frame,
            gene_id: gene.to_string(),
            transcript_id: transcript_id.clone(),
        };

        for exon in &isoform.exons {
            let bounds = (
                exon.chromosome_start.min(exon.chromosome_end),
                exon.chromosome_start.max(exon.chromosome_end),
            );
            records.push(line(FeatureKind::Exon, bounds, None));
            let mut regions: Vec<_> = exon.regions.iter().collect();
            regions.sort_by_key(|r| r.kind);
            for region in regions {
                let frame = if region.kind.is_coding() {
                    region.frame
                } else {
                    None
                };
                records.push(line(region.kind, region.bounds(), frame));
            }
        }
    }

    diagnostics.info(
        Stage::Rendering,
        format!("{} GTF lines for gene {gene}", records.len()),
    );
    records
}

/// Warn, without failing, when the transcript sequence disagrees with an observed codon.
fn recheck_codons(index: u32, isoform: &Isoform, diagnostics: &mut Diagnostics) {
    let Some(cds) = isoform.cds else {
        return;
    };
    if let Some((from, to)) = cds.start_codon_window() {
        let codon = isoform.transcript_slice(from, to).unwrap_or_default();
        if !codon::is_start_codon(codon.as_bytes()) {
            diagnostics.warn(
                Stage::Rendering,
                format!("isoform {index}: wrong start_codon '{codon}'"),
            );
        }
    }
    if let Some((from, to)) = cds.stop_codon_window() {
        let codon = isoform.transcript_slice(from, to).unwrap_or_default();
        if !codon::is_stop_codon(codon.as_bytes()) {
            diagnostics.warn(
                Stage::Rendering,
                format!("isoform {index}: wrong stop_codon '{codon}'"),
            );
        }
    }
}

/// Write records one per line.
pub fn write_gtf<W: Write>(mut writer: W, records: &[GtfRecord]) -> Result<(), Error> {
    for record in records {
        writeln!(writer, "{record}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read GTF records, skipping blank and `#` lines.
pub fn read_gtf<R: BufRead>(reader: R) -> Result<Vec<GtfRecord>, Error> {
    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let record = line
            .parse()
            .map_err(|e| Error::Parse(format!("{e} (line {line_num}: {line})")))?;
        records.push(record);
    }
    Ok(records)
}

/// Number of records per feature kind.
#[must_use]
pub fn feature_counts(records: &[GtfRecord]) -> BTreeMap<FeatureKind, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.feature).or_insert(0) += 1;
    }
    counts
}
