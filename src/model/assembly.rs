//! Gene model assembly: merge variant skeletons with exon geometry, order
//! exons, attach introns and build transcript sequences.

use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::evidence::LinkedEvidence;
use crate::genome::GenomeReference;
use crate::strand::Strand;
use crate::tables::geometry::{GeometryTable, IsoformGeometry};
use crate::tables::variants::VariantRecord;

use super::types::{Exon, GeneModel, Intron, Isoform, MODEL_VERSION, transcript_order};

/// Gene symbol and organism written into the model.
#[derive(Debug, Clone)]
pub struct GeneIdentity {
    pub gene: String,
    pub organism: String,
}

/// Assemble the gene model from parsed tables and linked evidence.
pub fn assemble(
    identity: &GeneIdentity,
    genome: GenomeReference,
    variants: BTreeMap<u32, VariantRecord>,
    geometry: GeometryTable,
    introns: BTreeMap<u32, Intron>,
    evidence: &LinkedEvidence,
    diagnostics: &mut Diagnostics,
) -> Result<GeneModel, Error> {
    let mut blocks: BTreeMap<u32, IsoformGeometry> = BTreeMap::new();
    for block in geometry.blocks {
        let index = block.index;
        if blocks.insert(index, block).is_some() {
            return Err(Error::Consistency(format!(
                "isoform {index} appears twice in the geometry table"
            )));
        }
    }

    if let Some(index) = blocks.keys().find(|&i| !variants.contains_key(i)) {
        return Err(Error::Consistency(format!(
            "isoform {index} has geometry but no variant record"
        )));
    }

    let strand = genome.strand;
    let mut isoforms = BTreeMap::new();
    for (index, variant) in variants {
        let block = blocks.remove(&index).ok_or_else(|| {
            Error::Consistency(format!("isoform {index} has a variant record but no geometry"))
        })?;
        let pas = evidence.pas_isoforms.contains(&index);
        let isoform = build_isoform(variant, block, pas, strand, &introns, diagnostics)?;
        isoforms.insert(index, isoform);
    }

    diagnostics.info(
        Stage::Assembly,
        format!(
            "{} isoforms assembled, {} with CDS",
            isoforms.len(),
            isoforms.values().filter(|i| i.is_cds_annotated()).count()
        ),
    );

    Ok(GeneModel {
        version: MODEL_VERSION,
        gene: identity.gene.clone(),
        organism: identity.organism.clone(),
        genome,
        isoforms,
        introns,
        number_isoforms: geometry.isoform_count,
        length_genomic_sequence: geometry.genomic_length,
    })
}

fn build_isoform(
    variant: VariantRecord,
    block: IsoformGeometry,
    pas: bool,
    strand: Strand,
    introns: &BTreeMap<u32, Intron>,
    diagnostics: &mut Diagnostics,
) -> Result<Isoform, Error> {
    let index = variant.index;
    if block.exon_count > variant.exon_count {
        return Err(Error::Consistency(format!(
            "isoform {index}: geometry lists {} exons, variant table only {}",
            block.exon_count, variant.exon_count
        )));
    }
    if block.exon_count < variant.exon_count {
        diagnostics.debug(
            Stage::Assembly,
            format!(
                "isoform {index}: {} of {} exons have geometry",
                block.exon_count, variant.exon_count
            ),
        );
    }
    if block.is_reference != variant.is_reference {
        diagnostics.debug(
            Stage::Assembly,
            format!("isoform {index}: reference flags differ between tables"),
        );
    }

    let cds_length = variant.cds.map(|_| {
        let total: i64 = block.exons.iter().map(Exon::trimmed_length).sum();
        u32::try_from(total.max(0)).unwrap_or(u32::MAX)
    });

    let mut exons = block.exons;
    exons.sort_by_key(|e| e.relative_end);
    if strand.is_reverse() {
        exons.reverse();
    }

    let order = transcript_order(exons.len(), strand);
    let attached = attach_introns(index, &exons, &order, introns, diagnostics);
    let sequence = accumulate(&mut exons, &order, strand);
    let transcript_length = order
        .last()
        .map_or(0, |&i| exons[i].cumulative_transcript_length);

    if let Some(length) = variant.length
        && length != transcript_length
    {
        diagnostics.warn(
            Stage::Assembly,
            format!("isoform {index}: declared length {length}, exons cover {transcript_length}"),
        );
    }
    if let Some(cds) = variant.cds
        && cds.end > transcript_length
    {
        return Err(Error::Consistency(format!(
            "isoform {index}: CDS {}..{} extends past transcript end {transcript_length}",
            cds.start, cds.end
        )));
    }

    let frames = vec![None; exons.len()];
    Ok(Isoform {
        number_exons: variant.exon_count,
        introns: attached,
        length: variant.length.or(Some(transcript_length)),
        cds: variant.cds,
        cds_length,
        protein: variant.protein,
        reference: variant.reference,
        reference_frame: variant.reference_frame,
        variant_type: variant.variant_type,
        reference_transcript: variant.is_reference,
        geometry_reference: block.is_reference,
        from_source_database: block.from_source_database,
        poly_a: block.poly_a,
        pas,
        nmd: block.nmd,
        sequence,
        frames,
        exons,
    })
}

/// Match each exon junction against intron chromosome coordinates, in either orientation.
fn attach_introns(
    isoform: u32,
    exons: &[Exon],
    order: &[usize],
    introns: &BTreeMap<u32, Intron>,
    diagnostics: &mut Diagnostics,
) -> Vec<u32> {
    let mut attached = Vec::new();
    for pair in order.windows(2) {
        let (a, b) = (&exons[pair[0]], &exons[pair[1]]);
        let mut bounds = [
            a.chromosome_start,
            a.chromosome_end,
            b.chromosome_start,
            b.chromosome_end,
        ];
        bounds.sort_unstable();
        let left = bounds[1] + 1;
        let right = bounds[2].saturating_sub(1);

        let before = attached.len();
        attached.extend(
            introns
                .iter()
                .filter(|(_, intron)| {
                    (intron.chromosome_start == left && intron.chromosome_end == right)
                        || (intron.chromosome_end == left && intron.chromosome_start == right)
                })
                .map(|(&i, _)| i),
        );
        if attached.len() == before {
            diagnostics.warn(
                Stage::Assembly,
                format!("isoform {isoform}: no intron spans junction {left}..{right}"),
            );
        }
    }
    attached
}

/// Fill cumulative lengths and return the transcript sequence.
fn accumulate(exons: &mut [Exon], order: &[usize], strand: Strand) -> String {
    let Some(&first) = order.first() else {
        return String::new();
    };
    let origin = exons[first].five_prime_coordinate(strand);

    let mut sequence = String::with_capacity(exons.iter().map(|e| e.sequence.len()).sum());
    let mut transcript_length = 0u32;
    for &i in order {
        let exon = &mut exons[i];
        transcript_length += exon.transcript_span();
        exon.cumulative_transcript_length = transcript_length;
        exon.cumulative_genome_length = exon.three_prime_coordinate(strand).abs_diff(origin) + 1;
        sequence.push_str(&exon.sequence);
    }
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::evidence::LinkedEvidence;
    use crate::model::CodingSpan;
    use crate::tables::geometry::parse_geometry;
    use crate::tables::introns::parse_introns;
    use crate::tables::variants::parse_variants;
    use std::io::Cursor;

    fn identity() -> GeneIdentity {
        GeneIdentity {
            gene: "TEST1".into(),
            organism: "human".into(),
        }
    }

    fn intron_row(cs: u64, ce: u64) -> String {
        format!(
            "1\t2\t{cs}\t{ce}\t10\t0\t\t0\t0\t0\t0\t0\t-1\t1\tGT-AG\t.\tA\tA\tA\tA\n"
        )
    }

    fn build(
        header: &str,
        variants: &str,
        geometry: &str,
        introns: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<GeneModel, Error> {
        let genome = GenomeReference::from_header(header).unwrap();
        let variants = parse_variants(Cursor::new(variants), diagnostics).unwrap();
        let geometry = parse_geometry(Cursor::new(geometry), diagnostics).unwrap();
        let introns = parse_introns(Cursor::new(introns), diagnostics).unwrap();
        assemble(
            &identity(),
            genome,
            variants,
            geometry,
            introns,
            &LinkedEvidence::default(),
            diagnostics,
        )
    }

    const REVERSE_GEOMETRY: &str = "\
1
5000
>1:3:0:0:-1
4100:4001:101:200:0:-1:-1
cccccccccc
4900:4801:1:100:0:-1:-1
aaaaaaaaaa
3300:3201:201:300:1:-1:-1
gggggggggg
";

    #[test]
    fn reverse_strand_order_is_reversed() {
        let mut diagnostics = Diagnostics::new();
        let introns = format!("{}{}", intron_row(4101, 4800), intron_row(3301, 4000));
        let model = build(
            ">chr2:1:5000:-1",
            "variant_isoform#1 /nex=3\n",
            REVERSE_GEOMETRY,
            &introns,
            &mut diagnostics,
        )
        .unwrap();

        let isoform = &model.isoforms[&1];
        let relative_ends: Vec<u32> = isoform.exons.iter().map(|e| e.relative_end).collect();
        assert_eq!(relative_ends, [300, 200, 100]);
        assert_eq!(isoform.sequence, "aaaaaaaaaaccccccccccgggggggggg");
        assert_eq!(isoform.introns, [1, 2]);
        assert_eq!(isoform.exons[0].cumulative_transcript_length, 300);
        assert_eq!(isoform.exons[2].cumulative_transcript_length, 100);
        assert_eq!(isoform.exons[0].cumulative_genome_length, 4900 - 3201 + 1);
        assert_eq!(isoform.length, Some(300));
        assert!(isoform.poly_a);
        assert!(!isoform.pas);
        assert_eq!(diagnostics.warning_count(), 0);
    }

    #[test]
    fn forward_strand_keeps_ascending_order() {
        let geometry = "1\n900\n>1:2:1:0:0\n501:600:101:200:0:-1:0\nacgt\n101:200:1:100:0:10:-1\nacgt\n";
        let mut diagnostics = Diagnostics::new();
        let model = build(
            ">chr1:1:900:+1",
            "variant_isoform#1 /nex=2 /CDS=11..200\n",
            geometry,
            &intron_row(201, 500),
            &mut diagnostics,
        )
        .unwrap();
        let isoform = &model.isoforms[&1];
        assert_eq!(isoform.exons[0].chromosome_start, 101);
        assert_eq!(isoform.introns, [1]);
        assert_eq!(isoform.cds_length, Some(190));
        assert_eq!(
            isoform.cds,
            Some(CodingSpan {
                start: 11,
                end: 200,
                start_observed: true,
                stop_observed: true
            })
        );
        assert!(isoform.geometry_reference);
        assert_eq!(isoform.nmd, Some(false));
    }

    #[test]
    fn unmatched_junction_warns() {
        let mut diagnostics = Diagnostics::new();
        build(
            ">chr2:1:5000:-1",
            "variant_isoform#1 /nex=3\n",
            REVERSE_GEOMETRY,
            &intron_row(4101, 4800),
            &mut diagnostics,
        )
        .unwrap();
        assert_eq!(diagnostics.warning_count(), 1);
    }

    #[test]
    fn isoform_missing_from_variants() {
        let err = build(
            ">chr2:1:5000:-1",
            "variant_isoform#2 /nex=3\n",
            REVERSE_GEOMETRY,
            "",
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("isoform 1 has geometry but no variant record"));
    }

    #[test]
    fn geometry_exceeding_variant_exons() {
        let err = build(
            ">chr2:1:5000:-1",
            "variant_isoform#1 /nex=2\n",
            REVERSE_GEOMETRY,
            "",
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Consistency(_)));
    }

    #[test]
    fn cds_past_transcript_end() {
        let err = build(
            ">chr2:1:5000:-1",
            "variant_isoform#1 /nex=3 /CDS=10..301\n",
            REVERSE_GEOMETRY,
            "",
            &mut Diagnostics::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("extends past transcript end 300"));
    }
}
