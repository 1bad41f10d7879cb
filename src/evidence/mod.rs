//! Cross-table evidence: which EST fragments support which intron, and which
//! isoforms end at a poly-adenylation signal.

pub mod pas;
pub mod support;

use std::collections::{BTreeMap, BTreeSet};

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::model::Intron;
use crate::tables::factorizations::FactorizationSet;
use crate::tables::geometry::GeometryTable;

pub use pas::PAS_TOLERANCE;

/// Evidence resolved ahead of assembly.
#[derive(Debug, Default)]
pub struct LinkedEvidence {
    /// Isoform indices whose final exon matches a PAS fragment.
    pub pas_isoforms: BTreeSet<u32>,
}

/// Resolve support pairs into `introns` and collect PAS isoforms.
pub fn link(
    introns: &mut BTreeMap<u32, Intron>,
    factorizations: &FactorizationSet,
    geometry: &GeometryTable,
    diagnostics: &mut Diagnostics,
) -> Result<LinkedEvidence, Error> {
    support::resolve_support(introns, factorizations, diagnostics)?;
    let pas_isoforms = pas::resolve_pas(&geometry.blocks, factorizations, diagnostics);
    Ok(LinkedEvidence { pas_isoforms })
}
