use crate::bio::Alphabet;
use crate::{Result, StrandError};

/// A collection of variable-length byte sequences over a shared alphabet.
///
/// Every byte is validated against the alphabet at construction, so later
/// stages can encode without re-checking.
#[derive(Debug, Clone)]
pub struct CharFeatures {
    alphabet: Alphabet,
    sequences: Vec<Vec<u8>>,
}

impl CharFeatures {
    pub fn new(alphabet: Alphabet, sequences: Vec<Vec<u8>>) -> Result<Self> {
        if sequences.is_empty() {
            return Err(StrandError::EmptyFeatures);
        }
        for (index, sequence) in sequences.iter().enumerate() {
            if let Some(position) = sequence.iter().position(|&b| !alphabet.is_valid(b)) {
                return Err(StrandError::InvalidSymbol {
                    index,
                    position,
                    symbol: sequence[position] as char,
                });
            }
        }
        Ok(Self {
            alphabet,
            sequences,
        })
    }

    pub fn from_strings<I, S>(alphabet: Alphabet, strings: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sequences = strings
            .into_iter()
            .map(|s| s.as_ref().as_bytes().to_vec())
            .collect();
        Self::new(alphabet, sequences)
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u8]> {
        self.sequences.get(index).map(|s| s.as_slice())
    }

    pub fn sequences(&self) -> &[Vec<u8>] {
        &self.sequences
    }

    pub fn max_sequence_length(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).max().unwrap_or(0)
    }
}
