//! Per-isoform exon geometry table (`CCDS_transcripts.txt`).
//!
//! ```text
//! 2                         isoform count
//! 3863                      genomic sequence length
//! >1:2:1:1:-1               index:exons:reference:source_db:nmd
//! 1001:1120:1:120:0:10:-1   chrom start:chrom end:rel start:rel end:polyA:5' trim:3' trim
//! acgt...
//! ```

use std::io::BufRead;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::model::Exon;

use super::at_line;

/// One `>` block of the geometry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IsoformGeometry {
    pub index: u32,
    pub exon_count: u32,
    pub is_reference: bool,
    pub from_source_database: bool,
    /// Absent when the table reports -1.
    pub nmd: Option<bool>,
    /// Set when any exon carries the poly-A marker.
    pub poly_a: bool,
    /// Exons in table order.
    pub exons: Vec<Exon>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryTable {
    pub isoform_count: u32,
    pub genomic_length: u64,
    pub blocks: Vec<IsoformGeometry>,
}

/// Parse the geometry table.
pub fn parse_geometry<R: BufRead>(
    reader: R,
    diagnostics: &mut Diagnostics,
) -> Result<GeometryTable, Error> {
    let mut header_values: Vec<u64> = Vec::with_capacity(2);
    let mut blocks: Vec<IsoformGeometry> = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let raw = line?;
        let cleaned = clean_line(&raw);
        if cleaned.is_empty() {
            continue;
        }

        if header_values.len() < 2 {
            let value = cleaned.parse().map_err(|e| {
                Error::Parse(format!(
                    "expected a count in the table header: {e} (line {line_num}: {raw})"
                ))
            })?;
            header_values.push(value);
            continue;
        }

        parse_body_line(&cleaned, &mut blocks).map_err(|e| at_line(e, line_num, &raw))?;
    }

    let [isoform_count, genomic_length] = header_values[..] else {
        return Err(Error::Parse(
            "geometry table is missing its isoform count and genomic length".to_string(),
        ));
    };
    for block in &blocks {
        check_block(block)?;
    }

    let isoform_count = u32::try_from(isoform_count)
        .map_err(|e| Error::Parse(format!("isoform count {isoform_count}: {e}")))?;
    if isoform_count as usize != blocks.len() {
        diagnostics.warn(
            Stage::Geometry,
            format!(
                "header declares {isoform_count} isoforms but {} blocks were found",
                blocks.len()
            ),
        );
    }
    diagnostics.info(
        Stage::Geometry,
        format!("{} isoform blocks over {genomic_length} bases", blocks.len()),
    );

    Ok(GeometryTable {
        isoform_count,
        genomic_length,
        blocks,
    })
}

/// Strip all whitespace and drop `#` comments.
fn clean_line(line: &str) -> String {
    let without_comment = line.split_once('#').map_or(line, |(before, _)| before);
    without_comment
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn parse_body_line(line: &str, blocks: &mut Vec<IsoformGeometry>) -> Result<(), Error> {
    if let Some(header) = line.strip_prefix('>') {
        if let Some(previous) = blocks.last() {
            check_block(previous)?;
        }
        blocks.push(parse_block_header(header)?);
        return Ok(());
    }

    let block = blocks
        .last_mut()
        .ok_or_else(|| Error::Parse("geometry line before any '>' block header".to_string()))?;

    if line.contains(':') {
        if let Some(previous) = block.exons.last()
            && previous.sequence.is_empty()
        {
            return Err(Error::Parse(format!(
                "isoform {}: exon {} has no sequence line",
                block.index,
                block.exons.len()
            )));
        }
        let exon = parse_exon(line)?;
        block.poly_a |= exon.poly_a;
        block.exons.push(exon);
        return Ok(());
    }

    if is_nucleotide_line(line) {
        let exon = block.exons.last_mut().ok_or_else(|| {
            Error::Parse(format!("isoform {}: sequence line before any exon", block.index))
        })?;
        if !exon.sequence.is_empty() {
            return Err(Error::Parse(format!(
                "isoform {}: exon already has a sequence",
                block.index
            )));
        }
        exon.sequence = line.to_string();
        return Ok(());
    }

    Err(Error::Parse("unrecognized geometry line".to_string()))
}

fn parse_block_header(header: &str) -> Result<IsoformGeometry, Error> {
    let fields = integer_fields(header, 5, "block header")?;
    let index = u32::try_from(fields[0])
        .map_err(|e| Error::Parse(format!("invalid isoform index {}: {e}", fields[0])))?;
    let exon_count = u32::try_from(fields[1])
        .map_err(|e| Error::Parse(format!("invalid exon count {}: {e}", fields[1])))?;
    Ok(IsoformGeometry {
        index,
        exon_count,
        is_reference: fields[2] != 0,
        from_source_database: fields[3] != 0,
        nmd: match fields[4] {
            -1 => None,
            0 => Some(false),
            _ => Some(true),
        },
        poly_a: false,
        exons: Vec::new(),
    })
}

fn parse_exon(line: &str) -> Result<Exon, Error> {
    let fields = integer_fields(line, 7, "exon line")?;
    let clamp = |v: i64| v.max(0);
    let relative = |v: i64| {
        u32::try_from(clamp(v))
            .map_err(|e| Error::Parse(format!("relative coordinate {v} out of range: {e}")))
    };
    let trim = |v: i64| -> Result<Option<u32>, Error> {
        if v < 0 {
            Ok(None)
        } else {
            relative(v).map(Some)
        }
    };

    Ok(Exon {
        chromosome_start: clamp(fields[0]).unsigned_abs(),
        chromosome_end: clamp(fields[1]).unsigned_abs(),
        relative_start: relative(fields[2])?,
        relative_end: relative(fields[3])?,
        poly_a: fields[4] == 1,
        five_prime_utr_length: trim(fields[5])?,
        three_prime_utr_length: trim(fields[6])?,
        sequence: String::new(),
        cumulative_transcript_length: 0,
        cumulative_genome_length: 0,
        regions: Vec::new(),
        frame: None,
    })
}

fn integer_fields(line: &str, expected: usize, what: &str) -> Result<Vec<i64>, Error> {
    let fields = line
        .split(':')
        .map(|f| {
            f.parse::<i64>()
                .map_err(|e| Error::Parse(format!("invalid {what} field '{f}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if fields.len() != expected {
        return Err(Error::Parse(format!(
            "{what} has {} fields, expected {expected}",
            fields.len()
        )));
    }
    Ok(fields)
}

fn is_nucleotide_line(line: &str) -> bool {
    line.bytes()
        .all(|b| matches!(b.to_ascii_uppercase(), b'A' | b'C' | b'G' | b'T' | b'N'))
}

fn check_block(block: &IsoformGeometry) -> Result<(), Error> {
    if block.exons.len() != block.exon_count as usize {
        return Err(Error::Parse(format!(
            "isoform {} declares {} exons but has {} exon lines",
            block.index,
            block.exon_count,
            block.exons.len()
        )));
    }
    if let Some(position) = block.exons.iter().position(|e| e.sequence.is_empty()) {
        return Err(Error::Parse(format!(
            "isoform {}: exon {} has no sequence line",
            block.index,
            position + 1
        )));
    }
    Ok(())
}
