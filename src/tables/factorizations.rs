//! EST factorization records (`out-after-intron-agree.txt`).
//!
//! ```text
//! >AA123456 /gb=AA123456 /clone_end=3'
//! #polya=1
//! #polyad=1
//! 1 120 1 120 ACGT... ACGT...
//! 121 300 411 590 ACGT... ACGT...
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;

use super::at_line;

/// One aligned EST block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub est_start: u32,
    pub est_end: u32,
    pub relative_start: u32,
    pub relative_end: u32,
    pub est_sequence: String,
    pub genome_sequence: String,
}

/// One EST's factorization. Intermediate only; never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factorization {
    /// Header text without the leading `>`.
    pub header: String,
    pub accession: String,
    pub clone_end: Option<String>,
    pub fragments: Vec<Fragment>,
    pub poly_a: bool,
    pub pas: bool,
    pas_fragment: Option<usize>,
}

impl Factorization {
    fn from_header(header: &str) -> Self {
        Self {
            header: header.to_string(),
            accession: header_accession(header),
            clone_end: header_tag(header, "/clone_end=", &['\'', ' ', '/']),
            fragments: Vec::new(),
            poly_a: false,
            pas: false,
            pas_fragment: None,
        }
    }

    /// First fragment seen while the PAS flag was set.
    #[must_use]
    pub fn pas_fragment(&self) -> Option<&Fragment> {
        self.pas_fragment.map(|i| &self.fragments[i])
    }
}

/// All factorizations of a run, addressable by EST accession.
#[derive(Debug, Default)]
pub struct FactorizationSet {
    records: Vec<Factorization>,
    by_accession: HashMap<String, Vec<usize>>,
}

impl FactorizationSet {
    fn push(&mut self, record: Factorization) -> usize {
        let handle = self.records.len();
        self.by_accession
            .entry(record.accession.clone())
            .or_default()
            .push(handle);
        self.records.push(record);
        handle
    }

    /// Records for one accession, in file order.
    pub fn records_for<'a>(&'a self, accession: &str) -> impl Iterator<Item = &'a Factorization> {
        self.by_accession
            .get(accession)
            .into_iter()
            .flatten()
            .map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Factorization> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

enum ParserState {
    AwaitingHeader,
    /// Handle of the record receiving flag and fragment lines.
    InRecord(usize),
}

/// Parse a factorization stream.
pub fn parse_factorizations<R: BufRead>(
    reader: R,
    diagnostics: &mut Diagnostics,
) -> Result<FactorizationSet, Error> {
    let mut set = FactorizationSet::default();
    let mut state = ParserState::AwaitingHeader;
    let mut fragment_count = 0usize;

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;
        let trimmed = line.trim_end();
        if trimmed.trim_start().is_empty() {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('>') {
            state = ParserState::InRecord(set.push(Factorization::from_header(header)));
            continue;
        }

        let ParserState::InRecord(handle) = state else {
            return Err(Error::Parse(format!(
                "factorization line before any '>' header (line {line_num}: {line})"
            )));
        };
        let record = &mut set.records[handle];

        if let Some(flag) = trimmed.strip_prefix('#') {
            apply_flag(record, flag).map_err(|e| at_line(e, line_num, &line))?;
            continue;
        }

        let fragment = parse_fragment(trimmed).map_err(|e| at_line(e, line_num, &line))?;
        if record.pas && record.pas_fragment.is_none() {
            record.pas_fragment = Some(record.fragments.len());
        }
        record.fragments.push(fragment);
        fragment_count += 1;
    }

    diagnostics.info(
        Stage::Factorizations,
        format!("{} factorizations, {fragment_count} fragments", set.len()),
    );
    Ok(set)
}

/// `polya=<0|1>` and `polyad…=<0|1>` set flags; any other `#` line is a comment.
fn apply_flag(record: &mut Factorization, flag: &str) -> Result<(), Error> {
    let Some((key, value)) = flag.split_once('=') else {
        return Ok(());
    };
    let target = if key == "polya" {
        &mut record.poly_a
    } else if key.starts_with("polyad") {
        &mut record.pas
    } else {
        return Ok(());
    };
    *target = match value.trim() {
        "1" => true,
        "0" => false,
        other => {
            return Err(Error::Parse(format!(
                "flag '{key}' expects 0 or 1, got '{other}'"
            )));
        }
    };
    Ok(())
}

fn parse_fragment(line: &str) -> Result<Fragment, Error> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(Error::Parse(format!(
            "fragment line has {} fields, expected 6",
            fields.len()
        )));
    }
    let number = |i: usize, name: &str| -> Result<u32, Error> {
        fields[i]
            .parse()
            .map_err(|e| Error::Parse(format!("invalid {name} '{}': {e}", fields[i])))
    };

    Ok(Fragment {
        est_start: number(0, "EST start")?,
        est_end: number(1, "EST end")?,
        relative_start: number(2, "relative start")?,
        relative_end: number(3, "relative end")?,
        est_sequence: fields[4].to_string(),
        genome_sequence: fields[5].to_string(),
    })
}

/// Accession from `/gb=` (either case), else the first header token.
fn header_accession(header: &str) -> String {
    header_tag(header, "/gb=", &[' ', '/'])
        .or_else(|| header_tag(header, "/GB=", &[' ', '/']))
        .unwrap_or_else(|| {
            header
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string()
        })
}

fn header_tag(header: &str, tag: &str, terminators: &[char]) -> Option<String> {
    let start = header.find(tag)? + tag.len();
    let rest = &header[start..];
    let end = rest.find(terminators).unwrap_or(rest.len());
    let value = &rest[..end];
    (!value.is_empty()).then(|| value.to_string())
}
