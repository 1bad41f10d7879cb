//! One GTF line.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::FeatureKind;
use crate::strand::Strand;

/// Source column written on every line.
pub const SOURCE: &str = "splicefuse";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtfRecord {
    pub seqname: String,
    pub source: String,
    pub feature: FeatureKind,
    /// 1-based inclusive, `start <= end`.
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub frame: Option<u8>,
    pub gene_id: String,
    pub transcript_id: String,
}

impl fmt::Display for GtfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t.\t{}\t",
            self.seqname, self.source, self.feature, self.start, self.end, self.strand
        )?;
        match self.frame {
            Some(frame) => write!(f, "{frame}")?,
            None => f.write_str(".")?,
        }
        write!(
            f,
            "\tgene_id \"{}\"; transcript_id \"{}\";",
            self.gene_id, self.transcript_id
        )
    }
}

impl FromStr for GtfRecord {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let columns: Vec<&str> = line.trim_end().split('\t').collect();
        if columns.len() != 9 {
            return Err(Error::Parse(format!(
                "GTF line has {} columns, expected 9",
                columns.len()
            )));
        }

        let coordinate = |i: usize, name: &str| -> Result<u64, Error> {
            columns[i]
                .parse()
                .map_err(|e| Error::Parse(format!("invalid {name} '{}': {e}", columns[i])))
        };
        let start = coordinate(3, "start")?;
        let end = coordinate(4, "end")?;
        if start > end {
            return Err(Error::Parse(format!("GTF start {start} exceeds end {end}")));
        }

        let frame = match columns[7] {
            "." => None,
            "0" => Some(0),
            "1" => Some(1),
            "2" => Some(2),
            other => return Err(Error::Parse(format!("invalid GTF frame '{other}'"))),
        };

        let (gene_id, transcript_id) = parse_attributes(columns[8])?;

        Ok(Self {
            seqname: columns[0].to_string(),
            source: columns[1].to_string(),
            feature: columns[2].parse()?,
            start,
            end,
            strand: Strand::from_gtf(columns[6])?,
            frame,
            gene_id,
            transcript_id,
        })
    }
}

/// Parse `gene_id "G"; transcript_id "G.1";`.
fn parse_attributes(text: &str) -> Result<(String, String), Error> {
    let mut gene_id = None;
    let mut transcript_id = None;

    for pair in text.split(';') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair
            .split_once(' ')
            .ok_or_else(|| Error::Parse(format!("attribute without value: '{pair}'")))?;
        let value = value.trim().trim_matches('"').to_string();
        match key {
            "gene_id" => gene_id = Some(value),
            "transcript_id" => transcript_id = Some(value),
            other => return Err(Error::Parse(format!("unknown GTF attribute '{other}'"))),
        }
    }

    match (gene_id, transcript_id) {
        (Some(g), Some(t)) => Ok((g, t)),
        _ => Err(Error::Parse(
            "GTF attributes need gene_id and transcript_id".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GtfRecord {
        GtfRecord {
            seqname: "chr5:1001:2000:+1".into(),
            source: SOURCE.into(),
            feature: FeatureKind::Cds,
            start: 1011,
            end: 1020,
            strand: Strand::Forward,
            frame: Some(0),
            gene_id: "GENE".into(),
            transcript_id: "GENE.1".into(),
        }
    }

    #[test]
    fn display_layout() {
        assert_eq!(
            record().to_string(),
            "chr5:1001:2000:+1\tsplicefuse\tCDS\t1011\t1020\t.\t+\t0\tgene_id \"GENE\"; transcript_id \"GENE.1\";"
        );
    }

    #[test]
    fn parse_back() {
        let line = record().to_string();
        assert_eq!(line.parse::<GtfRecord>().unwrap(), record());
    }

    #[test]
    fn frameless_feature() {
        let mut exon = record();
        exon.feature = FeatureKind::Exon;
        exon.frame = None;
        let line = exon.to_string();
        assert!(line.contains("\t+\t.\t"));
        assert_eq!(line.parse::<GtfRecord>().unwrap().frame, None);
    }

    #[test]
    fn rejects_reversed_coordinates() {
        let line = record().to_string().replace("1011\t1020", "1020\t1011");
        assert!(line.parse::<GtfRecord>().is_err());
    }

    #[test]
    fn rejects_unknown_attribute() {
        let line = format!("{} exon_number \"1\";", record());
        let err = line.parse::<GtfRecord>().unwrap_err();
        assert!(err.to_string().contains("exon_number"));
    }

    #[test]
    fn rejects_short_line() {
        assert!("chr1\tsplicefuse\texon\t1\t2".parse::<GtfRecord>().is_err());
    }
}
