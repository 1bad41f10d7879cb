//! Gene model types: the single artifact persisted by the forward pass.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::genome::GenomeReference;
use crate::strand::Strand;

/// Schema version written into every model document.
pub const MODEL_VERSION: u32 = 3;

/// Kind of a projected sub-range, named as it appears in GTF column 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    #[serde(rename = "exon")]
    Exon,
    #[serde(rename = "5UTR")]
    FivePrimeUtr,
    #[serde(rename = "start_codon")]
    StartCodon,
    #[serde(rename = "CDS")]
    Cds,
    #[serde(rename = "stop_codon")]
    StopCodon,
    #[serde(rename = "3UTR")]
    ThreePrimeUtr,
}

impl FeatureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exon => "exon",
            Self::FivePrimeUtr => "5UTR",
            Self::StartCodon => "start_codon",
            Self::Cds => "CDS",
            Self::StopCodon => "stop_codon",
            Self::ThreePrimeUtr => "3UTR",
        }
    }

    /// Whether GTF column 8 carries a frame for this kind.
    #[must_use]
    pub fn is_coding(self) -> bool {
        matches!(self, Self::StartCodon | Self::Cds | Self::StopCodon)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exon" => Ok(Self::Exon),
            "5UTR" => Ok(Self::FivePrimeUtr),
            "start_codon" => Ok(Self::StartCodon),
            "CDS" => Ok(Self::Cds),
            "stop_codon" => Ok(Self::StopCodon),
            "3UTR" => Ok(Self::ThreePrimeUtr),
            other => Err(Error::Parse(format!("unknown feature kind: '{other}'"))),
        }
    }
}

/// A classified piece of an exon.
///
/// Coordinates are stored in transcript direction: on the reverse strand
/// `chromosome_start > chromosome_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRange {
    pub kind: FeatureKind,
    pub chromosome_start: u64,
    pub chromosome_end: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u8>,
}

impl SubRange {
    /// Bounds ordered so that the first value is not greater than the second.
    #[must_use]
    pub fn bounds(&self) -> (u64, u64) {
        (
            self.chromosome_start.min(self.chromosome_end),
            self.chromosome_start.max(self.chromosome_end),
        )
    }

    /// Number of bases covered, at least one.
    #[must_use]
    pub fn base_count(&self) -> u64 {
        self.chromosome_start.abs_diff(self.chromosome_end) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exon {
    pub relative_start: u32,
    pub relative_end: u32,
    pub chromosome_start: u64,
    pub chromosome_end: u64,
    pub poly_a: bool,
    /// Untranslated bases at the transcript 5' side of this exon; absent when not applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub five_prime_utr_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_prime_utr_length: Option<u32>,
    pub sequence: String,
    /// Transcript length from the isoform's 5' end through this exon.
    #[serde(default)]
    pub cumulative_transcript_length: u32,
    /// Genomic span from the isoform's 5' end through this exon.
    #[serde(default)]
    pub cumulative_genome_length: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<SubRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u8>,
}

impl Exon {
    /// Number of transcript bases covered by the exon.
    #[must_use]
    pub fn transcript_span(&self) -> u32 {
        self.relative_end.abs_diff(self.relative_start) + 1
    }

    /// Chromosome coordinate of the exon's first base in transcript direction.
    #[must_use]
    pub fn five_prime_coordinate(&self, strand: Strand) -> u64 {
        match strand {
            Strand::Forward => self.chromosome_start.min(self.chromosome_end),
            Strand::Reverse => self.chromosome_start.max(self.chromosome_end),
        }
    }

    /// Chromosome coordinate of the exon's last base in transcript direction.
    #[must_use]
    pub fn three_prime_coordinate(&self, strand: Strand) -> u64 {
        match strand {
            Strand::Forward => self.chromosome_start.max(self.chromosome_end),
            Strand::Reverse => self.chromosome_start.min(self.chromosome_end),
        }
    }

    /// Exon span minus its UTR trims, absent trims counting as zero.
    #[must_use]
    pub fn trimmed_length(&self) -> i64 {
        i64::from(self.transcript_span())
            - i64::from(self.five_prime_utr_length.unwrap_or(0))
            - i64::from(self.three_prime_utr_length.unwrap_or(0))
    }

    /// Sub-ranges of one kind, in transcript order.
    pub fn regions_of(&self, kind: FeatureKind) -> impl Iterator<Item = &SubRange> {
        self.regions.iter().filter(move |r| r.kind == kind)
    }
}

/// Classification of an intron by splicing machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntronClass {
    U12,
    U2,
    #[serde(rename = "unclassified")]
    Unclassified,
}

impl IntronClass {
    /// Upstream encodes U12 as 0 and U2 as 1; anything else is unclassified.
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::U12,
            1 => Self::U2,
            _ => Self::Unclassified,
        }
    }
}

/// One EST's alignment evidence across an intron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportPair {
    pub est: String,
    pub donor_est_suffix: String,
    pub acceptor_est_prefix: String,
    pub donor_est_start: u32,
    pub donor_est_end: u32,
    pub acceptor_est_start: u32,
    pub acceptor_est_end: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intron {
    pub relative_start: u32,
    pub relative_end: u32,
    pub chromosome_start: u64,
    pub chromosome_end: u64,
    pub length: u32,
    pub supporting_est_count: u32,
    pub supporting_ests: Vec<String>,
    pub donor_alignment_error: f64,
    pub acceptor_alignment_error: f64,
    pub donor_score: f64,
    pub acceptor_score: f64,
    pub bps_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bps_position: Option<u32>,
    pub class: IntronClass,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_sequence: Option<String>,
    pub donor_suffix: String,
    pub intron_prefix: String,
    pub intron_suffix: String,
    pub acceptor_prefix: String,
    #[serde(default)]
    pub support: Vec<SupportPair>,
}

/// Transcript-local CDS annotation. `end` includes the stop codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingSpan {
    pub start: u32,
    pub end: u32,
    /// False when the variant table marks the start with `<`.
    pub start_observed: bool,
    /// False when the variant table marks the end with `>`.
    pub stop_observed: bool,
}

impl CodingSpan {
    #[must_use]
    pub fn span_length(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Last transcript position of the CDS feature proper (stop codon excluded).
    #[must_use]
    pub fn coding_end(&self) -> u32 {
        if self.stop_observed {
            self.end.saturating_sub(3)
        } else {
            self.end
        }
    }

    #[must_use]
    pub fn start_codon_window(&self) -> Option<(u32, u32)> {
        self.start_observed.then(|| (self.start, self.start + 2))
    }

    #[must_use]
    pub fn stop_codon_window(&self) -> Option<(u32, u32)> {
        self.stop_observed
            .then(|| (self.end.saturating_sub(2), self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinLength {
    pub residues: u32,
    /// Set when the length is inferred from an incomplete CDS (`>` marker).
    pub truncated: bool,
}

/// Cross-reference to the reference transcript the CDS was compared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceXref {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    pub start_codon_agrees: bool,
    pub stop_codon_agrees: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isoform {
    /// Exons in ascending chromosome order.
    pub exons: Vec<Exon>,
    /// Indices into the model's intron map, one per matched junction.
    pub introns: Vec<u32>,
    pub number_exons: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cds: Option<CodingSpan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cds_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<ProteinLength>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceXref>,
    pub reference_frame: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_type: Option<String>,
    /// Marked `Type=Ref` in the variant table.
    pub reference_transcript: bool,
    /// Reference flag of the geometry table block.
    pub geometry_reference: bool,
    pub from_source_database: bool,
    pub poly_a: bool,
    pub pas: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nmd: Option<bool>,
    /// Exon sequences concatenated in transcript order.
    pub sequence: String,
    /// Frame of each exon's CDS segment, aligned with `exons`.
    #[serde(default)]
    pub frames: Vec<Option<u8>>,
}

impl Isoform {
    #[must_use]
    pub fn is_cds_annotated(&self) -> bool {
        self.cds.is_some()
    }

    /// Exon indices in transcript 5'→3' order.
    #[must_use]
    pub fn transcript_order(&self, strand: Strand) -> Vec<usize> {
        transcript_order(self.exons.len(), strand)
    }

    /// Transcript positions `[first, last]` (1-based, inclusive) as a sequence slice.
    #[must_use]
    pub fn transcript_slice(&self, first: u32, last: u32) -> Option<&str> {
        if first == 0 || last < first {
            return None;
        }
        self.sequence.get(first as usize - 1..last as usize)
    }
}

/// Positions of `len` stored (genomic-order) exons in transcript 5'→3' order.
#[must_use]
pub fn transcript_order(len: usize, strand: Strand) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if strand.is_reverse() {
        order.reverse();
    }
    order
}

/// The fused gene-structure model for one locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneModel {
    pub version: u32,
    pub gene: String,
    pub organism: String,
    pub genome: GenomeReference,
    pub isoforms: BTreeMap<u32, Isoform>,
    pub introns: BTreeMap<u32, Intron>,
    pub number_isoforms: u32,
    pub length_genomic_sequence: u64,
}
