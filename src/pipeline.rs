//! Forward pass: tables → linked evidence → assembled model → projection,
//! plus persistence of the finished model.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use crate::diagnostics::Diagnostics;
use crate::error::Error;
use crate::evidence;
use crate::genome::GenomeReference;
use crate::model::GeneModel;
use crate::model::assembly::{GeneIdentity, assemble};
use crate::projection::project_model;
use crate::tables::factorizations::parse_factorizations;
use crate::tables::geometry::parse_geometry;
use crate::tables::introns::parse_introns;
use crate::tables::open_table;
use crate::tables::variants::parse_variants;

/// Open line streams over the five upstream inputs.
pub struct TableStreams<'a> {
    pub genomic: Box<dyn BufRead + 'a>,
    pub factorizations: Box<dyn BufRead + 'a>,
    pub introns: Box<dyn BufRead + 'a>,
    pub variants: Box<dyn BufRead + 'a>,
    pub geometry: Box<dyn BufRead + 'a>,
}

impl TableStreams<'static> {
    /// Open tables by path; `.gz` inputs are decompressed.
    pub fn open(paths: &TablePaths) -> Result<Self, Error> {
        Ok(Self {
            genomic: open_table(&paths.genomic)?,
            factorizations: open_table(&paths.factorizations)?,
            introns: open_table(&paths.introns)?,
            variants: open_table(&paths.variants)?,
            geometry: open_table(&paths.geometry)?,
        })
    }
}

/// Resolved input paths.
#[derive(Debug, Clone)]
pub struct TablePaths {
    pub genomic: PathBuf,
    pub factorizations: PathBuf,
    pub introns: PathBuf,
    pub variants: PathBuf,
    pub geometry: PathBuf,
}

impl TablePaths {
    /// (name, path) pairs in reading order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Path)> {
        [
            ("genomic", self.genomic.as_path()),
            ("factorizations", self.factorizations.as_path()),
            ("introns", self.introns.as_path()),
            ("variants", self.variants.as_path()),
            ("geometry", self.geometry.as_path()),
        ]
        .into_iter()
    }
}

/// Table contents already held in memory.
#[derive(Debug, Clone, Copy)]
pub struct InputTables<'a> {
    pub genomic: &'a str,
    pub factorizations: &'a str,
    pub introns: &'a str,
    pub variants: &'a str,
    pub geometry: &'a str,
}

impl<'a> From<&InputTables<'a>> for TableStreams<'a> {
    fn from(tables: &InputTables<'a>) -> Self {
        Self {
            genomic: Box::new(Cursor::new(tables.genomic)),
            factorizations: Box::new(Cursor::new(tables.factorizations)),
            introns: Box::new(Cursor::new(tables.introns)),
            variants: Box::new(Cursor::new(tables.variants)),
            geometry: Box::new(Cursor::new(tables.geometry)),
        }
    }
}

/// Run the forward pass over open table streams.
pub fn build_gene_model(
    identity: &GeneIdentity,
    streams: TableStreams<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<GeneModel, Error> {
    let genome = GenomeReference::from_reader(streams.genomic, diagnostics)?;
    let factorizations = parse_factorizations(streams.factorizations, diagnostics)?;
    let mut introns = parse_introns(streams.introns, diagnostics)?;
    let variants = parse_variants(streams.variants, diagnostics)?;
    let geometry = parse_geometry(streams.geometry, diagnostics)?;

    let linked = evidence::link(&mut introns, &factorizations, &geometry, diagnostics)?;
    let mut model = assemble(
        identity,
        genome,
        variants,
        geometry,
        introns,
        &linked,
        diagnostics,
    )?;
    project_model(&mut model, diagnostics)?;
    Ok(model)
}

/// Forward pass over in-memory tables, with organism `unknown`.
pub fn build_from_text(
    gene: &str,
    tables: &InputTables<'_>,
    diagnostics: &mut Diagnostics,
) -> Result<GeneModel, Error> {
    let identity = GeneIdentity {
        gene: gene.to_string(),
        organism: "unknown".to_string(),
    };
    build_gene_model(&identity, TableStreams::from(tables), diagnostics)
}

/// Persist the model as pretty JSON with sorted keys.
///
/// Written to a sibling temporary file and renamed into place, so the
/// destination holds either the complete model or nothing new.
pub fn write_model(model: &GeneModel, path: &Path) -> Result<(), Error> {
    // serde_json::Value keeps object keys in a BTreeMap, which sorts them.
    let value = serde_json::to_value(model)?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let file = File::create(&tmp_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load a persisted model.
pub fn read_model(path: &Path) -> Result<GeneModel, Error> {
    let file = File::open(path).map_err(|source| Error::Table {
        path: path.to_path_buf(),
        source,
    })?;
    let model = serde_json::from_reader(BufReader::new(file))?;
    Ok(model)
}
