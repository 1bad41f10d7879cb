//! Genome reference derived from the genomic sequence header.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::strand::Strand;

/// Identity and orientation of the genomic sequence the tables refer to.
///
/// Derived once from a header of the form `>chr12:1000:5000:-1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeReference {
    /// Header text without the leading `>`; used as the GTF sequence name.
    pub sequence_id: String,
    pub chromosome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_end: Option<u64>,
    pub strand: Strand,
}

impl GenomeReference {
    /// Parse a genomic FASTA header line.
    pub fn from_header(line: &str) -> Result<Self, Error> {
        let header = line
            .trim_end()
            .strip_prefix('>')
            .ok_or_else(|| Error::Parse(format!("genomic header must start with '>': {line}")))?;

        let tokens: Vec<&str> = header.split(':').collect();
        if tokens.len() < 2 || tokens[0].is_empty() {
            return Err(Error::Parse(format!(
                "genomic header needs '<chromosome>:…:<strand>': {line}"
            )));
        }

        let strand = Strand::from_header_token(tokens[tokens.len() - 1])?;

        let (region_start, region_end) = if tokens.len() == 4 {
            (
                Some(parse_coordinate(tokens[1], line)?),
                Some(parse_coordinate(tokens[2], line)?),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            sequence_id: header.to_string(),
            chromosome: tokens[0].to_string(),
            region_start,
            region_end,
            strand,
        })
    }

    /// Read the header from the first non-empty line of a genomic FASTA stream.
    pub fn from_reader<R: BufRead>(reader: R, diagnostics: &mut Diagnostics) -> Result<Self, Error> {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let genome = Self::from_header(&line)?;
            diagnostics.info(
                Stage::Genome,
                format!("sequence '{}' on strand {}", genome.sequence_id, genome.strand),
            );
            return Ok(genome);
        }
        Err(Error::Parse("genomic sequence file is empty".to_string()))
    }
}

fn parse_coordinate(token: &str, line: &str) -> Result<u64, Error> {
    token
        .trim()
        .parse()
        .map_err(|e| Error::Parse(format!("invalid genomic coordinate '{token}': {e} ({line})")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn full_header() {
        let genome = GenomeReference::from_header(">chr12:6534512:6538374:-1").unwrap();
        assert_eq!(genome.sequence_id, "chr12:6534512:6538374:-1");
        assert_eq!(genome.chromosome, "chr12");
        assert_eq!(genome.region_start, Some(6534512));
        assert_eq!(genome.region_end, Some(6538374));
        assert_eq!(genome.strand, Strand::Reverse);
    }

    #[test]
    fn short_header() {
        let genome = GenomeReference::from_header(">chr1:+1").unwrap();
        assert_eq!(genome.chromosome, "chr1");
        assert!(genome.region_start.is_none());
        assert_eq!(genome.strand, Strand::Forward);
    }

    #[test]
    fn missing_sigil() {
        assert!(GenomeReference::from_header("chr1:1:2:+1").is_err());
    }

    #[test]
    fn bad_strand() {
        assert!(GenomeReference::from_header(">chr1:1:2:x").is_err());
    }

    #[test]
    fn reader_skips_blank_lines_and_ignores_sequence() {
        let fasta = "\n>chr7:100:900:+1\nACGTACGT\n";
        let mut diagnostics = Diagnostics::new();
        let genome = GenomeReference::from_reader(Cursor::new(fasta), &mut diagnostics).unwrap();
        assert_eq!(genome.region_end, Some(900));
        assert_eq!(diagnostics.entries().len(), 1);
    }

    #[test]
    fn empty_reader() {
        let mut diagnostics = Diagnostics::new();
        assert!(GenomeReference::from_reader(Cursor::new(""), &mut diagnostics).is_err());
    }
}
