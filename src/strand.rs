//! Strand orientation of the genomic locus.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Strand orientation of the genomic sequence the tables were computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

impl Strand {
    /// Parse the trailing strand token of a genomic header (`+1`, `1`, `+`, `-1`, `-`).
    pub fn from_header_token(token: &str) -> Result<Self, Error> {
        match token.trim() {
            "+1" | "1" | "+" => Ok(Self::Forward),
            "-1" | "-" => Ok(Self::Reverse),
            other => Err(Error::Parse(format!("invalid strand token: '{other}'"))),
        }
    }

    /// Parse GTF column 7.
    pub fn from_gtf(s: &str) -> Result<Self, Error> {
        match s {
            "+" => Ok(Self::Forward),
            "-" => Ok(Self::Reverse),
            other => Err(Error::Parse(format!("invalid GTF strand: '{other}'"))),
        }
    }

    #[must_use]
    pub fn is_reverse(self) -> bool {
        self == Self::Reverse
    }

    /// Direction in which chromosome coordinates move when walking 5'→3' along a transcript.
    #[must_use]
    pub fn sign(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "+"),
            Self::Reverse => write!(f, "-"),
        }
    }
}
