/// Fixed-width word encodings derived from char sequences

use crate::bio::Alphabet;
use crate::features::CharFeatures;
use crate::{Result, StrandError};

/// Words are stored as `u16`.
const WORD_BITS: u32 = 16;

/// Word-encoded string features.
///
/// Each vector holds the packed words of one input sequence. Vectors start
/// out unsorted; the sort preprocessor flips `is_sorted`, which the kernel
/// requires before it will accept the features.
#[derive(Debug, Clone)]
pub struct WordFeatures {
    alphabet: Alphabet,
    order: usize,
    num_words: u64,
    vectors: Vec<Vec<u16>>,
    sorted: bool,
}

impl WordFeatures {
    /// Derive word features from char features.
    ///
    /// The word for input position `i` packs `order` symbol codes from a
    /// window of `order + gap` symbols ending at `i`; the `gap` middle
    /// columns of the window are skipped. Forward packing puts the earliest
    /// included symbol in the highest bits, `reversed` packs the window
    /// right-to-left. Window positions before the start of the sequence
    /// contribute code 0, and the first `start + gap` positions are dropped,
    /// so a sequence of length `L` yields `max(L - start - gap, 0)` words.
    pub fn from_char(
        chars: &CharFeatures,
        start: usize,
        order: usize,
        gap: usize,
        reversed: bool,
    ) -> Result<Self> {
        if order == 0 {
            return Err(StrandError::Config("word order must be at least 1".into()));
        }
        let alphabet = chars.alphabet();
        let bits = alphabet.bits_per_symbol();
        let required = bits * order as u32;
        if required > WORD_BITS {
            return Err(StrandError::WordOverflow { order, required });
        }

        let vectors = chars
            .sequences()
            .iter()
            .map(|sequence| translate(sequence, alphabet, start, order, gap, reversed))
            .collect();

        let num_words = if order > 1 {
            1u64 << required
        } else {
            alphabet.num_symbols() as u64
        };

        Ok(Self {
            alphabet,
            order,
            num_words,
            vectors,
            sorted: false,
        })
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct word values the encoding can produce.
    pub fn num_words(&self) -> u64 {
        self.num_words
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&[u16]> {
        self.vectors.get(index).map(|v| v.as_slice())
    }

    pub fn vectors(&self) -> &[Vec<u16>] {
        &self.vectors
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub(crate) fn vectors_mut(&mut self) -> &mut [Vec<u16>] {
        &mut self.vectors
    }

    pub(crate) fn set_sorted(&mut self, sorted: bool) {
        self.sorted = sorted;
    }
}

fn translate(
    sequence: &[u8],
    alphabet: Alphabet,
    start: usize,
    order: usize,
    gap: usize,
    reversed: bool,
) -> Vec<u16> {
    let bits = alphabet.bits_per_symbol();
    let window = order + gap;
    // the gap occupies the middle columns of the window
    let gap_from = order / 2;
    let gap_to = gap_from + gap;

    // bytes were validated when the char features were built
    let codes: Vec<u32> = sequence
        .iter()
        .map(|&b| alphabet.encode(b).unwrap_or(0) as u32)
        .collect();

    let skip = start + gap;
    if sequence.len() <= skip {
        return Vec::new();
    }

    let mut words = Vec::with_capacity(sequence.len() - skip);
    for end in skip..sequence.len() {
        let mut value = 0u32;
        let mut rank = 0u32;
        for offset in 0..window {
            if offset >= gap_from && offset < gap_to {
                continue;
            }
            let code = end
                .checked_sub(offset)
                .map(|j| codes[j])
                .unwrap_or(0);
            let shift = if reversed {
                bits * (order as u32 - 1 - rank)
            } else {
                bits * rank
            };
            value |= code << shift;
            rank += 1;
        }
        words.push(value as u16);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dna(strings: &[&str]) -> CharFeatures {
        CharFeatures::from_strings(Alphabet::Dna, strings).expect("valid DNA")
    }

    #[test]
    fn packs_kmers_big_endian() {
        // AC = 0b0001, CG = 0b0110, GT = 0b1011
        let words = WordFeatures::from_char(&dna(&["ACGT"]), 1, 2, 0, false).unwrap();
        assert_eq!(words.get(0), Some([1u16, 6, 11].as_slice()));
    }

    #[test]
    fn start_zero_pads_the_left_edge() {
        // position 0 sees only 'A' with a zero pad above it
        let words = WordFeatures::from_char(&dna(&["ACGT"]), 0, 2, 0, false).unwrap();
        assert_eq!(words.get(0), Some([0u16, 1, 6, 11].as_slice()));
    }

    #[test]
    fn reversed_packs_right_to_left() {
        // CA = 0b0100, GC = 0b1001, TG = 0b1110
        let words = WordFeatures::from_char(&dna(&["ACGT"]), 1, 2, 0, true).unwrap();
        assert_eq!(words.get(0), Some([4u16, 9, 14].as_slice()));
    }

    #[test]
    fn gap_skips_the_middle_of_the_window() {
        // order 2, gap 1: windows A_G and C_T
        let words = WordFeatures::from_char(&dna(&["ACGT"]), 1, 2, 1, false).unwrap();
        assert_eq!(words.get(0), Some([2u16, 7].as_slice()));
    }

    #[test]
    fn short_sequences_yield_no_words() {
        let words = WordFeatures::from_char(&dna(&["ACG", "AC"]), 2, 3, 0, false).unwrap();
        assert_eq!(words.get(0).map(|v| v.len()), Some(1));
        assert_eq!(words.get(1).map(|v| v.len()), Some(0));
    }

    #[test]
    fn canonical_kmer_call_yields_length_minus_order_plus_one() {
        let order = 7;
        let words = WordFeatures::from_char(&dna(&["ACGTACGTACGT"]), order - 1, order, 0, false)
            .unwrap();
        assert_eq!(words.get(0).map(|v| v.len()), Some(12 - order + 1));
        assert_eq!(words.num_words(), 4u64.pow(order as u32));
    }

    #[test]
    fn rejects_orders_that_overflow_word_storage() {
        let err = WordFeatures::from_char(&dna(&["ACGT"]), 8, 9, 0, false).unwrap_err();
        assert!(matches!(
            err,
            StrandError::WordOverflow { order: 9, required: 18 }
        ));

        // order 8 at 2 bits per symbol is exactly 16 bits and still fits
        assert!(WordFeatures::from_char(&dna(&["ACGTACGTACGT"]), 7, 8, 0, false).is_ok());
    }

    #[test]
    fn protein_orders_overflow_sooner() {
        let chars = CharFeatures::from_strings(Alphabet::Protein, ["ACDEF"]).unwrap();
        let err = WordFeatures::from_char(&chars, 3, 4, 0, false).unwrap_err();
        assert!(matches!(err, StrandError::WordOverflow { .. }));
    }

    #[test]
    fn new_features_are_unsorted() {
        let words = WordFeatures::from_char(&dna(&["ACGT"]), 1, 2, 0, false).unwrap();
        assert!(!words.is_sorted());
    }
}
