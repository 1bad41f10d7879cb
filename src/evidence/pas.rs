//! Poly-adenylation signal matching between isoform ends and EST fragments.

use std::collections::BTreeSet;

use crate::diagnostics::{Diagnostics, Stage};
use crate::model::Exon;
use crate::tables::factorizations::{FactorizationSet, Fragment};
use crate::tables::geometry::IsoformGeometry;

/// Maximum distance, in bases, between the ends of a PAS fragment and the final exon.
pub const PAS_TOLERANCE: u32 = 30;

/// Indices of poly-A isoforms whose final exon agrees with some latched PAS fragment.
pub fn resolve_pas(
    blocks: &[IsoformGeometry],
    factorizations: &FactorizationSet,
    diagnostics: &mut Diagnostics,
) -> BTreeSet<u32> {
    let pas_fragments: Vec<&Fragment> = factorizations
        .iter()
        .filter_map(|record| record.pas_fragment())
        .collect();

    let matched: BTreeSet<u32> = blocks
        .iter()
        .filter(|block| block.poly_a)
        .filter(|block| {
            final_exon(&block.exons)
                .is_some_and(|exon| pas_fragments.iter().any(|f| same_end(exon, f)))
        })
        .map(|block| block.index)
        .collect();

    diagnostics.info(
        Stage::Linker,
        format!(
            "{} PAS fragments, {} isoforms with PAS",
            pas_fragments.len(),
            matched.len()
        ),
    );
    matched
}

/// The exon with the greatest relative end.
fn final_exon(exons: &[Exon]) -> Option<&Exon> {
    exons.iter().max_by_key(|e| e.relative_end)
}

fn same_end(exon: &Exon, fragment: &Fragment) -> bool {
    exon.relative_start == fragment.relative_start
        && exon.relative_end.abs_diff(fragment.relative_end) <= PAS_TOLERANCE
}
