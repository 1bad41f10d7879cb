//! Codon motifs and the standard translation table.

/// The only accepted start codon.
pub const START_CODON: &[u8; 3] = b"ATG";

/// Canonical stop codons.
pub const STOP_CODONS: [&[u8; 3]; 3] = [b"TGA", b"TAG", b"TAA"];

/// Amino acids of NCBI table 1, codons enumerated in A, C, G, T order with
/// the first base varying slowest.
const STANDARD_CODE: &[u8; 64] =
    b"KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF";

const STANDARD: CodonTable = CodonTable {
    code: STANDARD_CODE,
};

#[derive(Debug, Clone, Copy)]
pub struct CodonTable {
    code: &'static [u8; 64],
}

impl CodonTable {
    #[must_use]
    pub fn standard() -> Self {
        STANDARD
    }

    /// Amino acid for one codon; `X` when a base is ambiguous.
    #[must_use]
    pub fn amino_acid(&self, codon: [u8; 3]) -> u8 {
        codon
            .iter()
            .try_fold(0usize, |acc, &b| base_index(b).map(|i| acc * 4 + i))
            .map_or(b'X', |i| self.code[i])
    }
}

fn base_index(b: u8) -> Option<usize> {
    match b.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

/// Translate a CDS; a trailing partial codon becomes `X`.
pub fn translate(cds: &[u8], table: &CodonTable) -> Vec<u8> {
    let codons = cds.chunks_exact(3);
    let partial = !codons.remainder().is_empty();
    let mut protein: Vec<u8> = codons
        .map(|c| table.amino_acid([c[0], c[1], c[2]]))
        .collect();
    if partial {
        protein.push(b'X');
    }
    protein
}

fn three(bases: &[u8]) -> Option<[u8; 3]> {
    bases.try_into().ok()
}

/// Case-insensitive [`START_CODON`]: the only codon the standard code reads as `M`.
#[must_use]
pub fn is_start_codon(bases: &[u8]) -> bool {
    three(bases).is_some_and(|c| STANDARD.amino_acid(c) == b'M')
}

/// Case-insensitive match against [`STOP_CODONS`], the terminators of the standard code.
#[must_use]
pub fn is_stop_codon(bases: &[u8]) -> bool {
    three(bases).is_some_and(|c| STANDARD.amino_acid(c) == b'*')
}
