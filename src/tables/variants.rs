//! Variant annotation table (`VariantGTF.txt`).
//!
//! ```text
//! variant_isoform#1 /nex=3 /L=1234 /CDS=<10..900 /RefSeq=NM_000001(YN) /ProtL=>297 /Frame=yes /Type=Ref
//! ```

use std::collections::BTreeMap;
use std::io::BufRead;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::model::{CodingSpan, ProteinLength, ReferenceXref};

use super::at_line;

const RECORD_PREFIX: &str = "variant_isoform#";

/// Skeleton of one isoform as described by the variant table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord {
    pub index: u32,
    pub exon_count: u32,
    pub length: Option<u32>,
    pub cds: Option<CodingSpan>,
    pub reference: Option<ReferenceXref>,
    pub protein: Option<ProteinLength>,
    pub reference_frame: bool,
    pub variant_type: Option<String>,
    /// `Type=Ref`.
    pub is_reference: bool,
}

/// Parse the variant table into records keyed by isoform index.
pub fn parse_variants<R: BufRead>(
    reader: R,
    diagnostics: &mut Diagnostics,
) -> Result<BTreeMap<u32, VariantRecord>, Error> {
    let mut records = BTreeMap::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let record = parse_record(trimmed).map_err(|e| at_line(e, line_num, &line))?;
        let index = record.index;
        if records.insert(index, record).is_some() {
            return Err(Error::Parse(format!(
                "duplicate isoform index {index} (line {line_num}: {line})"
            )));
        }
    }

    let annotated = records.values().filter(|r| r.cds.is_some()).count();
    diagnostics.info(
        Stage::Variants,
        format!("{} isoforms, {annotated} with annotated CDS", records.len()),
    );
    Ok(records)
}

fn parse_record(line: &str) -> Result<VariantRecord, Error> {
    let mut tokens = line.split(" /");
    let head = tokens.next().unwrap_or_default().trim();
    let index_text = head
        .strip_prefix(RECORD_PREFIX)
        .ok_or_else(|| Error::Parse(format!("expected '{RECORD_PREFIX}<index>', got '{head}'")))?;
    let index: u32 = index_text
        .parse()
        .map_err(|e| Error::Parse(format!("invalid isoform index '{index_text}': {e}")))?;

    let mut exon_count = None;
    let mut length = None;
    let mut cds = None;
    let mut reference = None;
    let mut protein_text = None;
    let mut frame_text = None;
    let mut variant_type = None;

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| Error::Parse(format!("token without '=': '{token}'")))?;
        match key {
            "nex" => exon_count = Some(parse_number(value, "nex")?),
            "L" => length = Some(parse_number(value, "L")?),
            "CDS" => cds = parse_cds(value)?,
            "RefSeq" => reference = Some(parse_reference(value)),
            "ProtL" => protein_text = Some(value),
            "Frame" => frame_text = Some(value),
            "Type" => variant_type = Some(value.trim_end().to_string()),
            other => {
                return Err(Error::Parse(format!("unknown variant key '{other}'")));
            }
        }
    }

    let exon_count =
        exon_count.ok_or_else(|| Error::Parse(format!("isoform {index} has no 'nex' key")))?;

    // Protein length and frame agreement only mean something for an annotated CDS.
    let protein = match (protein_text, cds.is_some()) {
        (Some(text), true) => parse_protein(text)?,
        _ => None,
    };
    let reference_frame = cds.is_some()
        && frame_text.is_some_and(|v| v.starts_with('y') || v.starts_with('Y'));

    let is_reference = variant_type.as_deref() == Some("Ref");
    // A transcript in the reference frame is labelled after its reference accession.
    if reference_frame && variant_type.is_some() {
        let accession = reference.as_ref().and_then(|r| r.accession.as_deref());
        variant_type = Some(match accession {
            Some(accession) => format!("{accession} (Reference TR)"),
            None => "(Reference TR)".to_string(),
        });
    }

    Ok(VariantRecord {
        index,
        exon_count,
        length,
        cds,
        reference,
        protein,
        reference_frame,
        is_reference,
        variant_type,
    })
}

fn parse_number(value: &str, key: &str) -> Result<u32, Error> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Parse(format!("invalid {key} value '{value}': {e}")))
}

/// `[<]start..end[>]`, or `..` for no CDS.
fn parse_cds(value: &str) -> Result<Option<CodingSpan>, Error> {
    let value = value.trim();
    if value == ".." {
        return Ok(None);
    }
    let (start_text, start_observed) = match value.strip_prefix('<') {
        Some(rest) => (rest, false),
        None => (value, true),
    };
    let (body, stop_observed) = match start_text.strip_suffix('>') {
        Some(rest) => (rest, false),
        None => (start_text, true),
    };
    let (start, end) = body
        .split_once("..")
        .ok_or_else(|| Error::Parse(format!("malformed CDS range '{value}'")))?;
    let start: u32 = start
        .parse()
        .map_err(|e| Error::Parse(format!("malformed CDS range '{value}': {e}")))?;
    let end: u32 = end
        .parse()
        .map_err(|e| Error::Parse(format!("malformed CDS range '{value}': {e}")))?;
    if start == 0 || start > end {
        return Err(Error::Parse(format!("CDS range '{value}' is empty or reversed")));
    }
    Ok(Some(CodingSpan {
        start,
        end,
        start_observed,
        stop_observed,
    }))
}

/// Accession with an optional `(YN)`-style suffix giving start/stop codon agreement.
fn parse_reference(value: &str) -> ReferenceXref {
    let value = value.trim();
    let (accession, flags) = match value.strip_suffix(')').and_then(|v| v.rsplit_once('(')) {
        Some((acc, flags)) if flags.len() == 2 && flags.chars().all(|c| "YNyn".contains(c)) => {
            (acc, Some(flags.to_ascii_uppercase()))
        }
        _ => (value, None),
    };
    let (start_codon_agrees, stop_codon_agrees) = match flags.as_deref() {
        Some(f) => (!f.starts_with('N'), !f.ends_with('N')),
        None => (true, true),
    };
    ReferenceXref {
        accession: (!accession.is_empty()).then(|| accession.to_string()),
        start_codon_agrees,
        stop_codon_agrees,
    }
}

/// `[>]n`, or `..` when unknown.
fn parse_protein(value: &str) -> Result<Option<ProteinLength>, Error> {
    let value = value.trim();
    if value == ".." {
        return Ok(None);
    }
    let (digits, truncated) = match value.strip_prefix('>') {
        Some(rest) => (rest, true),
        None => (value, false),
    };
    let residues = digits
        .parse()
        .map_err(|e| Error::Parse(format!("invalid ProtL value '{value}': {e}")))?;
    Ok(Some(ProteinLength {
        residues,
        truncated,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<BTreeMap<u32, VariantRecord>, Error> {
        parse_variants(Cursor::new(text), &mut Diagnostics::new())
    }

    #[test]
    fn full_record() {
        let text = "variant_isoform#2 /nex=3 /L=1234 /CDS=<10..900> /RefSeq=NM_000001(YN) /ProtL=>296 /Frame=yes /Type=Ref\n";
        let records = parse(text).unwrap();
        let record = &records[&2];
        assert_eq!(record.exon_count, 3);
        assert_eq!(record.length, Some(1234));
        let cds = record.cds.unwrap();
        assert_eq!((cds.start, cds.end), (10, 900));
        assert!(!cds.start_observed);
        assert!(!cds.stop_observed);
        let reference = record.reference.as_ref().unwrap();
        assert_eq!(reference.accession.as_deref(), Some("NM_000001"));
        assert!(reference.start_codon_agrees);
        assert!(!reference.stop_codon_agrees);
        assert_eq!(
            record.protein,
            Some(ProteinLength {
                residues: 296,
                truncated: true
            })
        );
        assert!(record.reference_frame);
        assert!(record.is_reference);
        assert_eq!(
            record.variant_type.as_deref(),
            Some("NM_000001 (Reference TR)")
        );
    }

    #[test]
    fn reference_frame_label_without_accession() {
        let text = "variant_isoform#1 /nex=1 /CDS=1..30 /Frame=yes /Type=Alt \n";
        let record = &parse(text).unwrap()[&1];
        assert!(!record.is_reference);
        assert_eq!(record.variant_type.as_deref(), Some("(Reference TR)"));

        let text = "variant_isoform#1 /nex=1 /CDS=1..30 /Frame=no /Type=Alt \n";
        let record = &parse(text).unwrap()[&1];
        assert_eq!(record.variant_type.as_deref(), Some("Alt"));
    }

    #[test]
    fn record_without_cds() {
        let text = "variant_isoform#1 /nex=2 /L=800 /CDS=.. /ProtL=.. /Frame=yes /Type=Alt\n";
        let record = &parse(text).unwrap()[&1];
        assert!(record.cds.is_none());
        assert!(record.protein.is_none());
        assert!(!record.reference_frame);
        assert!(!record.is_reference);
        assert_eq!(record.variant_type.as_deref(), Some("Alt"));
    }

    #[test]
    fn observed_codons() {
        let record = &parse("variant_isoform#1 /nex=1 /CDS=1..30\n").unwrap()[&1];
        let cds = record.cds.unwrap();
        assert!(cds.start_observed && cds.stop_observed);
        assert_eq!(cds.span_length(), 30);
    }

    #[test]
    fn reference_without_flags() {
        let xref = parse_reference("NM_000002");
        assert_eq!(xref.accession.as_deref(), Some("NM_000002"));
        assert!(xref.start_codon_agrees && xref.stop_codon_agrees);
        let xref = parse_reference("(NN)");
        assert!(xref.accession.is_none());
        assert!(!xref.start_codon_agrees && !xref.stop_codon_agrees);
    }

    #[test]
    fn comment_lines_skipped() {
        let records = parse("# header\nvariant_isoform#1 /nex=1\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn missing_nex() {
        let err = parse("variant_isoform#1 /L=10\n").unwrap_err();
        assert!(err.to_string().contains("nex"));
    }

    #[test]
    fn unknown_key() {
        let err = parse("variant_isoform#1 /nex=1 /Foo=bar\n").unwrap_err();
        assert!(err.to_string().contains("unknown variant key 'Foo'"));
    }

    #[test]
    fn token_without_equals() {
        assert!(parse("variant_isoform#1 /nex=1 /CDS\n").is_err());
    }

    #[test]
    fn reversed_cds() {
        let err = parse("variant_isoform#1 /nex=1 /CDS=90..10\n").unwrap_err();
        assert!(err.to_string().contains("reversed"));
    }

    #[test]
    fn malformed_cds() {
        assert!(parse("variant_isoform#1 /nex=1 /CDS=10-90\n").is_err());
    }

    #[test]
    fn duplicate_index() {
        let err = parse("variant_isoform#1 /nex=1\nvariant_isoform#1 /nex=2\n").unwrap_err();
        assert!(err.to_string().contains("duplicate isoform index 1"));
    }
}
