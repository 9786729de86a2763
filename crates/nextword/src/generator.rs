#![forbid(unsafe_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tokenize::{decode, encode_one, normalize_one, Tokenizer, Vocabulary};

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::scorer::Scorer;

/// Greedy autoregressive word generator.
///
/// Borrows everything it needs; building one per request is cheap. The text
/// fed back into the encoder and the text returned are the same string.
pub struct Generator<'a> {
    vocab: &'a Vocabulary,
    tokenizer: &'a dyn Tokenizer,
    scorer: &'a dyn Scorer,
    config: GenerationConfig,
    cancel: Option<&'a AtomicBool>,
    deadline: Option<Instant>,
}

impl<'a> Generator<'a> {
    /// New generator over a vocabulary, tokenizer and scorer.
    pub fn new(
        vocab: &'a Vocabulary,
        tokenizer: &'a dyn Tokenizer,
        scorer: &'a dyn Scorer,
        config: GenerationConfig,
    ) -> Self {
        Self { vocab, tokenizer, scorer, config, cancel: None, deadline: None }
    }

    /// Abort between steps once `flag` is set.
    pub fn with_cancel(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Abort between steps once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Index the scorer ranks highest for the word after `text`.
    pub fn predict_index(&self, text: &str) -> Result<usize, GenerationError> {
        let tokens = encode_one(text, self.vocab, self.tokenizer);
        let window = normalize_one(&tokens, self.config.window_size, self.config.padding);
        let scores = self.scorer.score(&window)?;

        let needed = self.vocab.max_index() + 1;
        if scores.len() < needed {
            return Err(GenerationError::MalformedScores(format!(
                "{} scores for a vocabulary whose largest index is {}",
                scores.len(),
                self.vocab.max_index()
            )));
        }
        sampler::argmax(&scores)
            .ok_or_else(|| GenerationError::MalformedScores("no comparable score".into()))
    }

    /// Word predicted to follow `text`; empty when the top index has no word.
    pub fn next_word(&self, text: &str) -> Result<String, GenerationError> {
        let index = self.predict_index(text)?;
        let word = decode(index, self.vocab);
        log::debug!("predicted index {index} -> {word:?}");
        Ok(word)
    }

    fn check_interrupt(&self) -> Result<(), GenerationError> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(GenerationError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(GenerationError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Append `steps` predicted words to `seed`, each preceded by a space.
    ///
    /// A word that fails to decode still gets its space unless
    /// `skip_empty_words` is set. Any error discards the partial text.
    pub fn generate(&self, seed: &str, steps: usize) -> Result<String, GenerationError> {
        let mut text = seed.to_string();
        for step in 0..steps {
            self.check_interrupt()?;
            let word = self.next_word(&text)?;
            if word.is_empty() && self.config.skip_empty_words {
                log::debug!("step {step}: skipped empty word");
                continue;
            }
            text.push(' ');
            text.push_str(&word);
        }
        Ok(text)
    }
}

/// Generate `steps` words after `seed` with default padding and the given
/// window size.
pub fn generate(
    seed: &str,
    steps: usize,
    vocab: &Vocabulary,
    tokenizer: &dyn Tokenizer,
    scorer: &dyn Scorer,
    window_size: usize,
) -> Result<String, GenerationError> {
    let config = GenerationConfig { window_size, ..GenerationConfig::default() };
    Generator::new(vocab, tokenizer, scorer, config).generate(seed, steps)
}
