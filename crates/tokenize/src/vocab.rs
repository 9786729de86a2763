#![forbid(unsafe_code)]

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tokenizer::Tokenizer;

/// Index reserved for padding and for words missing from the vocabulary.
pub const PAD_INDEX: usize = 0;

/// How indices are handed out while scanning the corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexStrategy {
    /// Index = position of the word's first occurrence in the flattened
    /// token stream + 1. Leaves gaps whenever a repeated word sits between
    /// two new ones; this is the index space existing models were trained on.
    #[default]
    FirstSeenPosition,
    /// Next free integer per new distinct word, starting at 1.
    Sequential,
}

/// Word → index mapping built once from a corpus and read-only afterwards.
///
/// Keeps the insertion order of words and an index → word map so that
/// decoding does not need to scan.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    word_index: HashMap<String, usize>,
    index_word: HashMap<usize, usize>,
    words: Vec<(String, usize)>,
    max_index: usize,
}

impl Vocabulary {
    /// Build a vocabulary from corpus records.
    ///
    /// Records are tokenized in parallel; assignment then walks the words in
    /// corpus order (record order, then word order within a record), so the
    /// result is identical on every rebuild from the same corpus.
    pub fn build<S, T>(corpus: &[S], tokenizer: &T, strategy: IndexStrategy) -> Self
    where
        S: AsRef<str> + Sync,
        T: Tokenizer + ?Sized,
    {
        let tokenized: Vec<Vec<String>> = corpus
            .par_iter()
            .map(|record| tokenizer.tokenize(record.as_ref()))
            .collect();

        let mut vocab = Vocabulary::default();
        let mut total = 0usize;
        for (position, word) in tokenized.into_iter().flatten().enumerate() {
            total = position + 1;
            if vocab.word_index.contains_key(&word) {
                continue;
            }
            let index = match strategy {
                IndexStrategy::FirstSeenPosition => position + 1,
                IndexStrategy::Sequential => vocab.words.len() + 1,
            };
            vocab.insert(word, index);
        }

        log::info!(
            "vocabulary built: {} words from {} records ({} tokens), max index {}, strategy {:?}",
            vocab.len(),
            corpus.len(),
            total,
            vocab.max_index,
            strategy
        );
        vocab
    }

    fn insert(&mut self, word: String, index: usize) {
        self.index_word.insert(index, self.words.len());
        self.word_index.insert(word.clone(), index);
        self.words.push((word, index));
        self.max_index = self.max_index.max(index);
    }

    /// Index assigned to `word`, if any.
    pub fn index_of(&self, word: &str) -> Option<usize> {
        self.word_index.get(word).copied()
    }

    /// Word assigned to `index`, if any. Index 0 never has a word.
    pub fn word_at(&self, index: usize) -> Option<&str> {
        self.index_word
            .get(&index)
            .and_then(|&slot| self.words.get(slot))
            .map(|(w, _)| w.as_str())
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the corpus contained no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Largest assigned index, 0 for an empty vocabulary.
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Words with their indices in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.words.iter().map(|(w, i)| (w.as_str(), *i))
    }
}
