//! Predicted-intron table (`predicted-introns.txt`): one tab-delimited row per intron.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::Error;
use crate::model::{Intron, IntronClass};

use super::at_line;

/// Number of tab-separated columns written by the upstream intron predictor.
pub const INTRON_COLUMNS: usize = 20;

/// Parse the intron table, numbering introns from 1 in row order.
pub fn parse_introns<R: BufRead>(
    reader: R,
    diagnostics: &mut Diagnostics,
) -> Result<BTreeMap<u32, Intron>, Error> {
    let mut introns = BTreeMap::new();
    let mut index = 1u32;

    for (line_num, line) in reader.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let intron = parse_row(line.trim_end_matches(['\r', '\n']))
            .map_err(|e| at_line(e, line_num, &line))?;
        if intron.bps_position.is_none() {
            diagnostics.debug(Stage::Introns, format!("intron {index}: no branch point"));
        }
        introns.insert(index, intron);
        index += 1;
    }

    diagnostics.info(Stage::Introns, format!("{} predicted introns", introns.len()));
    Ok(introns)
}

fn parse_row(line: &str) -> Result<Intron, Error> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() != INTRON_COLUMNS {
        return Err(Error::Parse(format!(
            "intron row has {} columns, expected {INTRON_COLUMNS}",
            columns.len()
        )));
    }

    let supporting_ests = columns[6]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let bps_position: i64 = field(&columns, 12, "BPS position")?;
    let class_code: i32 = field(&columns, 13, "intron class")?;

    Ok(Intron {
        relative_start: field(&columns, 0, "relative start")?,
        relative_end: field(&columns, 1, "relative end")?,
        chromosome_start: field(&columns, 2, "chromosome start")?,
        chromosome_end: field(&columns, 3, "chromosome end")?,
        length: field(&columns, 4, "length")?,
        supporting_est_count: field(&columns, 5, "supporting EST count")?,
        supporting_ests,
        donor_alignment_error: field(&columns, 7, "donor alignment error")?,
        acceptor_alignment_error: field(&columns, 8, "acceptor alignment error")?,
        donor_score: field(&columns, 9, "donor score")?,
        acceptor_score: field(&columns, 10, "acceptor score")?,
        bps_score: field(&columns, 11, "BPS score")?,
        bps_position: u32::try_from(bps_position).ok(),
        class: IntronClass::from_code(class_code),
        pattern: columns[14].to_string(),
        repeat_sequence: match columns[15] {
            "." | "" => None,
            seq => Some(seq.to_string()),
        },
        donor_suffix: columns[16].to_string(),
        intron_prefix: columns[17].to_string(),
        intron_suffix: columns[18].to_string(),
        acceptor_prefix: columns[19].to_string(),
        support: Vec::new(),
    })
}

fn field<T>(columns: &[&str], i: usize, name: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    columns[i]
        .trim()
        .parse()
        .map_err(|e| Error::Parse(format!("invalid {name} '{}': {e}", columns[i])))
}
