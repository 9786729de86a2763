#![forbid(unsafe_code)]

use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer, Serialize};
use tokenize::{Tokenizer, Vocabulary};

use crate::config::{GenerationConfig, ServiceConfig};
use crate::corpus::{CorpusSource, CsvCorpus};
use crate::error::{GenerationError, InitError};
use crate::generator::Generator;
use crate::scorer::{DenseDims, DenseScorer, Scorer};

fn default_next_words() -> usize {
    1
}

// `null` counts as absent
fn next_words_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Ok(Option::<usize>::deserialize(d)?.unwrap_or_else(default_next_words))
}

/// Body of a prediction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// text to continue
    pub seed_text: String,
    /// number of words to append; absent or `null` means 1
    #[serde(default = "default_next_words", deserialize_with = "next_words_or_default")]
    pub next_words: usize,
}

/// Body of a successful prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// seed followed by the generated words
    pub predicted_text: String,
}

/// Everything a request needs, built once at startup and never mutated.
///
/// Share it between request threads behind an `Arc`.
pub struct PredictionContext {
    vocab: Vocabulary,
    tokenizer: Box<dyn Tokenizer>,
    scorer: Box<dyn Scorer>,
    generation: GenerationConfig,
    max_next_words: usize,
    timeout: Option<Duration>,
}

impl PredictionContext {
    /// Assemble a context from already built parts. No request limits.
    pub fn new(
        vocab: Vocabulary,
        tokenizer: Box<dyn Tokenizer>,
        scorer: Box<dyn Scorer>,
        generation: GenerationConfig,
    ) -> Self {
        Self { vocab, tokenizer, scorer, generation, max_next_words: usize::MAX, timeout: None }
    }

    /// Cap `next_words` per request and set a per-request deadline.
    pub fn with_limits(mut self, max_next_words: usize, timeout: Option<Duration>) -> Self {
        self.max_next_words = max_next_words;
        self.timeout = timeout;
        self
    }

    /// Blocking startup: corpus → vocabulary → model, as configured.
    pub fn load(config: &ServiceConfig) -> Result<Self, InitError> {
        let corpus = CsvCorpus::new(&config.corpus_path, &config.text_field);
        Self::load_with(config, &corpus, |dims| DenseScorer::load(&config.weights_path, dims))
    }

    /// Startup with an explicit corpus and a model factory receiving the
    /// dense shape implied by the vocabulary.
    pub fn load_with<C, F, S>(config: &ServiceConfig, corpus: &C, model: F) -> Result<Self, InitError>
    where
        C: CorpusSource + ?Sized,
        F: FnOnce(DenseDims) -> Result<S, InitError>,
        S: Scorer + 'static,
    {
        config.validate()?;
        let tokenizer = config.tokenizer.build(config.case, config.token_pattern.as_deref())?;
        let records = corpus.records()?;
        let vocab = Vocabulary::build(&records, &tokenizer, config.index_strategy);
        let dims = DenseDims {
            window: config.window_size(),
            embed: config.embed_dim,
            hidden: config.hidden_dim,
            outputs: vocab.max_index() + 1,
        };
        let scorer = model(dims)?;
        log::info!(
            "prediction context ready: {} words, window {}, padding {:?}",
            vocab.len(),
            config.window_size(),
            config.padding
        );
        Ok(Self::new(vocab, tokenizer, Box::new(scorer), config.generation())
            .with_limits(config.max_next_words, config.request_timeout()))
    }

    /// Shared vocabulary.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Generator borrowing this context, with the deadline applied.
    pub fn generator(&self) -> Generator<'_> {
        let gen = Generator::new(&self.vocab, &*self.tokenizer, &*self.scorer, self.generation);
        match self.timeout {
            Some(t) => gen.with_deadline(Instant::now() + t),
            None => gen,
        }
    }

    /// Serve one prediction request.
    pub fn predict(&self, req: &PredictRequest) -> Result<PredictResponse, GenerationError> {
        if req.next_words > self.max_next_words {
            return Err(GenerationError::TooManyWords {
                requested: req.next_words,
                limit: self.max_next_words,
            });
        }
        let predicted_text = self.generator().generate(&req.seed_text, req.next_words)?;
        Ok(PredictResponse { predicted_text })
    }
}
