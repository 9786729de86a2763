#![forbid(unsafe_code)]

use crate::tokenizer::Tokenizer;
use crate::vocab::{Vocabulary, PAD_INDEX};

/// Encode a single text into vocabulary indices. Unknown words become
/// [`PAD_INDEX`].
pub fn encode_one<T>(text: &str, vocab: &Vocabulary, tokenizer: &T) -> Vec<usize>
where
    T: Tokenizer + ?Sized,
{
    tokenizer
        .tokenize(text)
        .iter()
        .map(|word| vocab.index_of(word).unwrap_or(PAD_INDEX))
        .collect()
}

/// Encode each text into its own index sequence.
pub fn encode<S, T>(texts: &[S], vocab: &Vocabulary, tokenizer: &T) -> Vec<Vec<usize>>
where
    S: AsRef<str>,
    T: Tokenizer + ?Sized,
{
    texts
        .iter()
        .map(|text| encode_one(text.as_ref(), vocab, tokenizer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;
    use crate::vocab::IndexStrategy;

    fn vocab() -> Vocabulary {
        Vocabulary::build(&["hello world", "hello there"], &WordTokenizer, IndexStrategy::FirstSeenPosition)
    }

    #[test]
    fn unknown_words_map_to_zero() {
        let seqs = encode(&["hello unknownword"], &vocab(), &WordTokenizer);
        assert_eq!(seqs, vec![vec![1, 0]]);
    }

    #[test]
    fn encodes_each_text_separately() {
        let seqs = encode(&["there world", "", "hello, hello!"], &vocab(), &WordTokenizer);
        assert_eq!(seqs, vec![vec![4, 2], vec![], vec![1, 1]]);
    }

    #[test]
    fn case_is_significant_by_default() {
        assert_eq!(encode_one("Hello", &vocab(), &WordTokenizer), vec![0]);
    }
}
