/// Symbol sets used to encode string features

use serde::{Deserialize, Serialize};

const DNA_SYMBOLS: &[u8] = b"ACGT";
const RNA_SYMBOLS: &[u8] = b"ACGU";
const PROTEIN_SYMBOLS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// An alphabet maps its symbols onto dense 0-based codes so that words can be
/// packed bitwise, `bits_per_symbol` bits per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    /// Valid symbols in code order. Matching is case-insensitive.
    pub fn symbols(&self) -> &'static [u8] {
        match self {
            Alphabet::Dna => DNA_SYMBOLS,
            Alphabet::Rna => RNA_SYMBOLS,
            Alphabet::Protein => PROTEIN_SYMBOLS,
        }
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols().len()
    }

    /// Bits needed to store one symbol code.
    pub fn bits_per_symbol(&self) -> u32 {
        match self {
            Alphabet::Dna | Alphabet::Rna => 2,
            Alphabet::Protein => 5,
        }
    }

    /// Dense code of a symbol, or `None` for bytes outside the alphabet.
    pub fn encode(&self, byte: u8) -> Option<u8> {
        let upper = byte.to_ascii_uppercase();
        self.symbols()
            .iter()
            .position(|&s| s == upper)
            .map(|code| code as u8)
    }

    pub fn is_valid(&self, byte: u8) -> bool {
        self.encode(byte).is_some()
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alphabet::Dna => write!(f, "dna"),
            Alphabet::Rna => write!(f, "rna"),
            Alphabet::Protein => write!(f, "protein"),
        }
    }
}
