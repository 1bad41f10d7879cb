//! splicefuse: fuses spliced-alignment reports into a gene-structure model and renders it as GTF.

pub mod error;

pub mod cli;
pub mod codon;
pub mod config;
pub mod diagnostics;
pub mod evidence;
pub mod genome;
pub mod gtf;
pub mod model;
pub mod pipeline;
pub mod projection;
pub mod strand;
pub mod tables;

#[cfg(test)]
mod test_fixtures;
