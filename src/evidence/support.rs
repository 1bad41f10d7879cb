//! Intron support pairs: one donor and one acceptor fragment per supporting EST.

use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::model::{Intron, SupportPair};
use crate::tables::factorizations::{Factorization, FactorizationSet, Fragment};

/// Attach support pairs to every intron.
///
/// For each declared EST the first factorization, in file order, with exactly
/// one donor and one acceptor fragment flanking the intron wins. Fails when
/// the number of resolved ESTs differs from the declared count.
pub fn resolve_support(
    introns: &mut BTreeMap<u32, Intron>,
    factorizations: &FactorizationSet,
    diagnostics: &mut Diagnostics,
) -> Result<(), Error> {
    let mut total = 0usize;

    for (&index, intron) in introns.iter_mut() {
        let mut pairs = Vec::with_capacity(intron.supporting_ests.len());
        for est in &intron.supporting_ests {
            let pair = factorizations
                .records_for(est)
                .find_map(|record| support_pair(intron, record));
            match pair {
                Some(pair) => pairs.push(pair),
                None => diagnostics.debug(
                    Stage::Linker,
                    format!("intron {index}: no factorization of {est} spans the junction"),
                ),
            }
        }

        if pairs.len() != intron.supporting_est_count as usize {
            return Err(Error::Consistency(format!(
                "intron {index}: {} support pairs resolved, {} declared",
                pairs.len(),
                intron.supporting_est_count
            )));
        }
        total += pairs.len();
        intron.support = pairs;
    }

    diagnostics.info(
        Stage::Linker,
        format!("{total} support pairs across {} introns", introns.len()),
    );
    Ok(())
}

fn support_pair(intron: &Intron, record: &Factorization) -> Option<SupportPair> {
    let donor_end = intron.relative_start.checked_sub(1)?;
    let acceptor_start = intron.relative_end + 1;

    let donor = exactly_one(record.fragments.iter().filter(|f| f.relative_end == donor_end))?;
    let acceptor = exactly_one(
        record
            .fragments
            .iter()
            .filter(|f| f.relative_start == acceptor_start),
    )?;

    Some(SupportPair {
        est: record.accession.clone(),
        donor_est_suffix: suffix(&donor.est_sequence, intron.donor_suffix.len()).to_string(),
        acceptor_est_prefix: prefix(&acceptor.est_sequence, intron.acceptor_prefix.len())
            .to_string(),
        donor_est_start: donor.est_start,
        donor_est_end: donor.est_end,
        acceptor_est_start: acceptor.est_start,
        acceptor_est_end: acceptor.est_end,
    })
}

fn exactly_one<'a>(mut matches: impl Iterator<Item = &'a Fragment>) -> Option<&'a Fragment> {
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}

fn suffix(sequence: &str, len: usize) -> &str {
    sequence
        .get(sequence.len().saturating_sub(len)..)
        .unwrap_or(sequence)
}

fn prefix(sequence: &str, len: usize) -> &str {
    sequence.get(..len.min(sequence.len())).unwrap_or(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IntronClass;
    use crate::tables::factorizations::parse_factorizations;
    use std::io::Cursor;

    fn intron(ests: &[&str], declared: u32) -> Intron {
        Intron {
            relative_start: 121,
            relative_end: 410,
            chromosome_start: 1121,
            chromosome_end: 1410,
            length: 290,
            supporting_est_count: declared,
            supporting_ests: ests.iter().map(|s| s.to_string()).collect(),
            donor_alignment_error: 0.0,
            acceptor_alignment_error: 0.0,
            donor_score: 0.0,
            acceptor_score: 0.0,
            bps_score: 0.0,
            bps_position: None,
            class: IntronClass::U2,
            pattern: "GT-AG".into(),
            repeat_sequence: None,
            donor_suffix: "CAG".into(),
            intron_prefix: "GTAAG".into(),
            intron_suffix: "TTCAG".into(),
            acceptor_prefix: "GGCA".into(),
            support: Vec::new(),
        }
    }

    fn factorizations(text: &str) -> FactorizationSet {
        parse_factorizations(Cursor::new(text), &mut Diagnostics::new()).unwrap()
    }

    const TWO_ESTS: &str = "\
>EST1
1 120 1 120 AAAAAAAAAACCCAAG CCCAAG
121 200 411 490 GGCATTTT GGCATTTT
>EST2
5 60 61 120 TTTTTTTGAG TTTTTTTGAG
61 90 411 440 GGCAT GGCAT
";

    #[test]
    fn resolves_declared_pairs() {
        let mut introns = BTreeMap::from([(1, intron(&["EST1", "EST2"], 2))]);
        resolve_support(&mut introns, &factorizations(TWO_ESTS), &mut Diagnostics::new())
            .unwrap();

        let support = &introns[&1].support;
        assert_eq!(support.len(), 2);
        assert_eq!(support[0].est, "EST1");
        assert_eq!(support[0].donor_est_suffix, "AAG");
        assert_eq!(support[0].acceptor_est_prefix, "GGCA");
        assert_eq!((support[0].donor_est_start, support[0].donor_est_end), (1, 120));
        assert_eq!(
            (support[1].acceptor_est_start, support[1].acceptor_est_end),
            (61, 90)
        );
    }

    #[test]
    fn unresolvable_support_is_fatal() {
        // EST2 has no acceptor fragment, so only one pair can be resolved.
        let text = ">EST1\n1 120 1 120 A A\n121 200 411 490 G G\n>EST2\n1 120 1 120 A A\n";
        let mut introns = BTreeMap::from([(7, intron(&["EST1", "EST2"], 2))]);
        let err = resolve_support(&mut introns, &factorizations(text), &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, Error::Consistency(_)));
        assert!(err.to_string().contains("intron 7"));
    }

    #[test]
    fn first_qualifying_factorization_wins() {
        // The first EST1 record has two donor fragments and is skipped.
        let text = "\
>EST1
1 120 1 120 AAAT A
1 120 1 120 AAAC A
121 200 411 490 G G
>EST1
9 128 1 120 TTTG A
129 200 411 490 G G
";
        let mut introns = BTreeMap::from([(1, intron(&["EST1"], 1))]);
        resolve_support(&mut introns, &factorizations(text), &mut Diagnostics::new()).unwrap();
        let pair = &introns[&1].support[0];
        assert_eq!(pair.donor_est_start, 9);
        assert_eq!(pair.donor_est_suffix, "TTG");
        assert_eq!(pair.acceptor_est_prefix, "G");
    }

    #[test]
    fn missing_est_counts_as_unresolved() {
        let mut introns = BTreeMap::from([(1, intron(&["NOPE"], 1))]);
        let err = resolve_support(&mut introns, &factorizations(TWO_ESTS), &mut Diagnostics::new())
            .unwrap_err();
        assert!(err.to_string().contains("0 support pairs resolved, 1 declared"));
    }
}
