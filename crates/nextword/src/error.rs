#![forbid(unsafe_code)]

use tokenize::TokenizerError;

/// Startup failures. Any of these stops the process before it serves.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// Corpus file could not be read
    #[error("cannot read corpus {path}: {source}")]
    Corpus {
        /// path that was opened
        path: String,
        /// underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Configured text column is absent from the corpus header
    #[error("corpus has no column named {0:?}")]
    MissingField(String),
    /// Corpus CSV could not be parsed
    #[error("malformed csv at line {line}: {reason}")]
    MalformedCsv {
        /// 1-based line where parsing stopped
        line: usize,
        /// what went wrong
        reason: String,
    },
    /// Model weights missing or not matching the expected shape
    #[error("model unavailable: {0}")]
    Model(String),
    /// Configuration file unreadable or values out of range
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Tokenizer could not be built from configuration
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
}

/// Failure reported by a scorer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// Input window has the wrong number of tokens
    #[error("window has {actual} tokens, model expects {expected}")]
    WindowLength {
        /// length the model was built for
        expected: usize,
        /// length received
        actual: usize,
    },
    /// Any other model-side failure
    #[error("model error: {0}")]
    Model(String),
}

/// Per-request failure. Never affects other requests or the shared context.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// The scorer failed
    #[error("scoring failed: {0}")]
    Score(#[from] ScoreError),
    /// The scorer returned a distribution that cannot be decoded
    #[error("malformed score distribution: {0}")]
    MalformedScores(String),
    /// Request body or seed text is not usable
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// More words requested than the service allows
    #[error("next_words {requested} exceeds limit {limit}")]
    TooManyWords {
        /// requested word count
        requested: usize,
        /// configured maximum
        limit: usize,
    },
    /// Cancellation flag was raised between steps
    #[error("generation cancelled")]
    Cancelled,
    /// Request deadline passed between steps
    #[error("generation deadline exceeded")]
    DeadlineExceeded,
}
