//! Structured diagnostic channel shared by parsers, linker, assembler, projector and renderer.
//!
//! Library code never prints. Each stage receives a `&mut Diagnostics` and records
//! what it noticed; binaries decide what to show.

use std::fmt;

/// Severity of a diagnostic. Fatal conditions are errors, not diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
}

/// Component that emitted a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Genome,
    Factorizations,
    Introns,
    Variants,
    Geometry,
    Linker,
    Assembly,
    Projection,
    Rendering,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Genome => "genome",
            Self::Factorizations => "factorizations",
            Self::Introns => "introns",
            Self::Variants => "variants",
            Self::Geometry => "geometry",
            Self::Linker => "linker",
            Self::Assembly => "assembly",
            Self::Projection => "projection",
            Self::Rendering => "rendering",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, severity: Severity, stage: Stage, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity,
            stage,
            message: message.into(),
        });
    }

    pub fn debug(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Severity::Debug, stage, message);
    }

    pub fn info(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Severity::Info, stage, message);
    }

    pub fn warn(&mut self, stage: Stage, message: impl Into<String>) {
        self.push(Severity::Warning, stage, message);
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics at or above `min` severity, in emission order.
    pub fn at_least(&self, min: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.severity >= min)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
