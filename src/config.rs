use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::pipeline::TablePaths;

fn unknown() -> String {
    "unknown".to_string()
}

/// Upstream table locations, relative to the work directory unless absolute.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputFiles {
    pub genomic: PathBuf,
    pub factorizations: PathBuf,
    pub introns: PathBuf,
    pub variants: PathBuf,
    pub geometry: PathBuf,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            genomic: "genomic.txt".into(),
            factorizations: "out-after-intron-agree.txt".into(),
            introns: "predicted-introns.txt".into(),
            variants: "VariantGTF.txt".into(),
            geometry: "CCDS_transcripts.txt".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputFiles {
    pub model: PathBuf,
    /// GTF with CDS-annotated isoforms only.
    pub cds_gtf: Option<PathBuf>,
    pub all_isoforms_gtf: Option<PathBuf>,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            model: "gene-model.json".into(),
            cds_gtf: None,
            all_isoforms_gtf: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default = "unknown")]
    pub gene: String,
    #[serde(default = "unknown")]
    pub organism: String,
    /// Defaults to the directory holding the config file.
    pub work_dir: Option<PathBuf>,
    #[serde(default)]
    pub inputs: InputFiles,
    #[serde(default)]
    pub outputs: OutputFiles,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;

        let base = path.parent().unwrap_or(Path::new("."));
        config.work_dir = Some(match config.work_dir.take() {
            Some(dir) if dir.is_relative() => base.join(dir),
            Some(dir) => dir,
            None => base.to_path_buf(),
        });
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        validate_gene(&self.gene)?;
        if self.outputs.model.as_os_str().is_empty() {
            bail!("outputs.model must not be empty");
        }
        Ok(())
    }

    #[must_use]
    pub fn work_dir(&self) -> &Path {
        self.work_dir.as_deref().unwrap_or(Path::new("."))
    }

    /// Resolve a configured path against the work directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.work_dir().join(path)
    }

    /// Input tables resolved against the work directory.
    #[must_use]
    pub fn table_paths(&self) -> TablePaths {
        let inputs = &self.inputs;
        TablePaths {
            genomic: self.resolve(&inputs.genomic),
            factorizations: self.resolve(&inputs.factorizations),
            introns: self.resolve(&inputs.introns),
            variants: self.resolve(&inputs.variants),
            geometry: self.resolve(&inputs.geometry),
        }
    }

    /// Configured GTF outputs as (resolved path, all isoforms?) pairs.
    pub fn gtf_outputs(&self) -> impl Iterator<Item = (PathBuf, bool)> + '_ {
        self.outputs
            .cds_gtf
            .iter()
            .map(|p| (self.resolve(p), false))
            .chain(
                self.outputs
                    .all_isoforms_gtf
                    .iter()
                    .map(|p| (self.resolve(p), true)),
            )
    }
}

/// Gene symbols end up quoted in GTF attributes.
pub fn validate_gene(gene: &str) -> Result<()> {
    if gene.is_empty() {
        bail!("gene symbol must not be empty");
    }
    if gene.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        bail!("invalid gene symbol '{gene}': whitespace and quotes are not allowed");
    }
    Ok(())
}
