//! Gene model: types plus the assembler that fills them from parsed tables.

pub mod assembly;
pub mod types;

pub use types::{
    CodingSpan, Exon, FeatureKind, GeneModel, Intron, IntronClass, Isoform, MODEL_VERSION,
    ProteinLength, ReferenceXref, SubRange, SupportPair,
};
