#![forbid(unsafe_code)]

use crate::vocab::Vocabulary;

/// Word for a predicted index, or an empty string when no word owns it
/// (index 0 or a gap in the index space).
pub fn decode(index: usize, vocab: &Vocabulary) -> String {
    match vocab.word_at(index) {
        Some(word) => word.to_string(),
        None => {
            log::debug!("decode miss for index {index}");
            String::new()
        }
    }
}

/// Linear-scan form of [`decode`]: first word in insertion order whose index
/// matches. Same result, O(vocabulary) per call.
pub fn decode_scan(index: usize, vocab: &Vocabulary) -> String {
    vocab
        .iter()
        .find(|&(_, i)| i == index)
        .map(|(w, _)| w.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;
    use crate::vocab::IndexStrategy;

    #[test]
    fn decodes_known_and_missing_indices() {
        let vocab = Vocabulary::build(&["a b a c"], &WordTokenizer, IndexStrategy::FirstSeenPosition);
        assert_eq!(decode(1, &vocab), "a");
        assert_eq!(decode(4, &vocab), "c");
        assert_eq!(decode(3, &vocab), "");
        assert_eq!(decode(0, &vocab), "");
        assert_eq!(decode(99, &vocab), "");
    }

    #[test]
    fn scan_agrees_with_reverse_map() {
        let corpus: Vec<String> = (0..50).map(|i| format!("w{} x{} w{}", i % 7, i, i % 3)).collect();
        let vocab = Vocabulary::build(&corpus, &WordTokenizer, IndexStrategy::FirstSeenPosition);
        for index in 0..=vocab.max_index() + 2 {
            assert_eq!(decode(index, &vocab), decode_scan(index, &vocab));
        }
    }
}
