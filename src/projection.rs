//! CDS/UTR/frame projection.
//!
//! Walks each isoform's exons once in transcript direction, classifying every
//! exon into 5'UTR, start codon, CDS, stop codon and 3'UTR sub-ranges with
//! chromosome coordinates and reading frames. Codon motifs are checked after
//! the walk; a wrong motif is fatal.

use crate::codon::{self, CodonTable};
use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::model::{CodingSpan, Exon, FeatureKind, GeneModel, Isoform, SubRange};
use crate::strand::Strand;

/// Bases collected across exons for one codon; latches once three are held.
#[derive(Debug, Default)]
struct CodonBuffer {
    bases: [u8; 3],
    len: usize,
}

impl CodonBuffer {
    fn extend(&mut self, bases: &[u8]) {
        for &b in bases {
            if self.len == 3 {
                break;
            }
            self.bases[self.len] = b;
            self.len += 1;
        }
    }

    fn codon(&self) -> Option<&[u8]> {
        (self.len == 3).then_some(&self.bases[..])
    }
}

/// Project every isoform of the model in place.
pub fn project_model(model: &mut GeneModel, diagnostics: &mut Diagnostics) -> Result<(), Error> {
    let strand = model.genome.strand;
    let table = CodonTable::standard();
    for (&index, isoform) in model.isoforms.iter_mut() {
        project_isoform(index, isoform, strand, &table, diagnostics)?;
    }
    Ok(())
}

/// Classify one isoform's exons into sub-ranges and validate its codons.
pub fn project_isoform(
    index: u32,
    isoform: &mut Isoform,
    strand: Strand,
    table: &CodonTable,
    diagnostics: &mut Diagnostics,
) -> Result<(), Error> {
    let Some(cds) = isoform.cds else {
        isoform.frames = vec![None; isoform.exons.len()];
        return Ok(());
    };

    let mut start_codon = CodonBuffer::default();
    let mut stop_codon = CodonBuffer::default();
    let mut consumed = 0u32;

    for (number, i) in isoform.transcript_order(strand).into_iter().enumerate() {
        let exon = &mut isoform.exons[i];
        let last = exon.cumulative_transcript_length;
        let first = last + 1 - exon.transcript_span();
        check_trims(index, number + 1, exon, first, last, &cds)?;
        let walker = ExonWalker {
            exon: &*exon,
            first,
            last,
            strand,
        };

        let mut regions = Vec::with_capacity(5);
        let mut frame = None;

        if cds.start > 1
            && let Some(r) = walker.segment(FeatureKind::FivePrimeUtr, first, cds.start - 1, None)
        {
            regions.push(r);
        }
        if let Some((a, b)) = cds.start_codon_window()
            && let Some(r) = walker.segment(FeatureKind::StartCodon, a, b, Some(a))
        {
            start_codon.extend(walker.bases(&r, a));
            regions.push(r);
        }
        if let Some(r) = walker.segment(FeatureKind::Cds, cds.start, cds.coding_end(), None) {
            let segment_frame = ((3 - consumed % 3) % 3) as u8;
            consumed += r.base_count() as u32;
            frame = Some(segment_frame);
            regions.push(SubRange {
                frame: Some(segment_frame),
                ..r
            });
        }
        if let Some((a, b)) = cds.stop_codon_window()
            && let Some(r) = walker.segment(FeatureKind::StopCodon, a, b, Some(a))
        {
            stop_codon.extend(walker.bases(&r, a));
            regions.push(r);
        }
        if let Some(r) = walker.segment(FeatureKind::ThreePrimeUtr, cds.end + 1, last, None) {
            regions.push(r);
        }

        exon.regions = regions;
        exon.frame = frame;
    }
    isoform.frames = isoform.exons.iter().map(|e| e.frame).collect();

    check_codons(index, &cds, &start_codon, &stop_codon)?;
    check_coding_sequence(index, isoform, &cds, table, diagnostics);
    Ok(())
}

/// One exon viewed as transcript positions `[first, last]`.
struct ExonWalker<'a> {
    exon: &'a Exon,
    first: u32,
    last: u32,
    strand: Strand,
}

impl ExonWalker<'_> {
    /// Part of the exon within transcript window `[from, to]`, or `None` if disjoint.
    ///
    /// With `codon_origin`, the frame counts from that transcript position.
    fn segment(
        &self,
        kind: FeatureKind,
        from: u32,
        to: u32,
        codon_origin: Option<u32>,
    ) -> Option<SubRange> {
        let a = from.max(self.first);
        let b = to.min(self.last);
        if a > b {
            return None;
        }
        Some(SubRange {
            kind,
            chromosome_start: self.chromosome(a),
            chromosome_end: self.chromosome(b),
            frame: codon_origin.map(|origin| ((3 - (a - origin) % 3) % 3) as u8),
        })
    }

    fn chromosome(&self, position: u32) -> u64 {
        let offset = i64::from(position - self.first);
        let five_prime = self.exon.five_prime_coordinate(self.strand);
        five_prime.saturating_add_signed(offset * self.strand.sign())
    }

    /// Exon bases under a segment that starts at transcript position `window_from` or later.
    fn bases(&self, segment: &SubRange, window_from: u32) -> &[u8] {
        let from = (window_from.max(self.first) - self.first) as usize;
        let len = segment.base_count() as usize;
        self.exon
            .sequence
            .as_bytes()
            .get(from..from + len)
            .unwrap_or_default()
    }
}

/// The exon's UTR trims must put its coding part where the CDS annotation does.
///
/// A trim covering the whole exon marks an exon without coding bases.
fn check_trims(
    index: u32,
    number: usize,
    exon: &Exon,
    first: u32,
    last: u32,
    cds: &CodingSpan,
) -> Result<(), Error> {
    let span = last + 1 - first;
    let (from, to) = (cds.start.max(first), cds.end.min(last));
    let coding = (from <= to).then_some((from, to));

    let checks = [
        ("5'", exon.five_prime_utr_length, coding.map(|(a, _)| a - first)),
        ("3'", exon.three_prime_utr_length, coding.map(|(_, b)| last - b)),
    ];
    for (side, trim, annotated) in checks {
        let Some(trim) = trim else {
            continue;
        };
        let agrees = match annotated {
            Some(untranslated) => trim == untranslated,
            None => trim >= span,
        };
        if !agrees {
            let annotated =
                annotated.map_or_else(|| "no coding bases".to_string(), |u| u.to_string());
            return Err(Error::Consistency(format!(
                "isoform {index}: exon {number} has {side} UTR trim {trim}, CDS {}..{} gives {annotated}",
                cds.start, cds.end
            )));
        }
    }
    Ok(())
}

fn check_codons(
    index: u32,
    cds: &CodingSpan,
    start_codon: &CodonBuffer,
    stop_codon: &CodonBuffer,
) -> Result<(), Error> {
    if cds.start_observed {
        let codon = start_codon.codon().unwrap_or_default();
        if !codon::is_start_codon(codon) {
            return Err(Error::Consistency(format!(
                "isoform {index}: wrong start_codon '{}' at {}",
                String::from_utf8_lossy(codon),
                cds.start
            )));
        }
    }
    if cds.stop_observed {
        let codon = stop_codon.codon().unwrap_or_default();
        if !codon::is_stop_codon(codon) {
            return Err(Error::Consistency(format!(
                "isoform {index}: wrong stop_codon '{}' ending at {}",
                String::from_utf8_lossy(codon),
                cds.end
            )));
        }
    }
    Ok(())
}

/// Non-fatal checks on the annotated CDS.
fn check_coding_sequence(
    index: u32,
    isoform: &Isoform,
    cds: &CodingSpan,
    table: &CodonTable,
    diagnostics: &mut Diagnostics,
) {
    let span = cds.span_length();
    if span % 3 != 0 {
        diagnostics.warn(
            Stage::Projection,
            format!("isoform {index}: CDS length {span} is not a multiple of 3"),
        );
    }
    if let Some(length) = isoform.cds_length
        && length != span
    {
        diagnostics.warn(
            Stage::Projection,
            format!("isoform {index}: exon trims give CDS length {length}, annotation spans {span}"),
        );
    }

    let Some(coding) = isoform.transcript_slice(cds.start, cds.coding_end()) else {
        diagnostics.warn(
            Stage::Projection,
            format!("isoform {index}: transcript sequence does not cover the CDS"),
        );
        return;
    };
    let protein = codon::translate(coding.as_bytes(), table);

    if let Some(declared) = isoform.protein
        && !declared.truncated
        && declared.residues as usize != protein.len()
    {
        diagnostics.warn(
            Stage::Projection,
            format!(
                "isoform {index}: declared protein length {}, CDS translates to {}",
                declared.residues,
                protein.len()
            ),
        );
    }
    let internal_stops = protein.iter().filter(|&&aa| aa == b'*').count();
    if internal_stops > 0 {
        diagnostics.warn(
            Stage::Projection,
            format!("isoform {index}: {internal_stops} internal stop codon(s)"),
        );
    }
}
