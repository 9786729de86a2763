#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
#![deny(missing_docs, unused_must_use)]

//! Next-word prediction service.
//!
//! A seed phrase is continued one word at a time: the current text is
//! encoded against a corpus vocabulary, fitted to the model window, scored,
//! and the best index is decoded back into a word and appended. The
//! vocabulary, tokenizer and model live in an immutable
//! [`PredictionContext`] built once at startup and shared by every request.
//!
//! Layout (important files):
//! - `config.rs` — `ServiceConfig` (JSON file + CLI flags)
//! - `corpus.rs` — corpus sources, CSV column reader
//! - `scorer.rs` — `Scorer` trait and the local `DenseScorer`
//! - `linear.rs` / `loader.rs` — dense layer and f32 weight loading
//! - `generator.rs` — the autoregressive loop
//! - `context.rs` — startup and the request entry point
//! - `http.rs` — routing on top of `tiny_http`
//! - `bin/server.rs` — HTTP server, `bin/predict.rs` — one-shot CLI / REPL

/// Service configuration.
pub mod config;
/// Corpus sources.
pub mod corpus;
/// Error types.
pub mod error;
/// Dense layer helper.
pub mod linear;
/// Weight loader (file helpers).
pub mod loader;
/// Model interface and the dense model.
pub mod scorer;
/// Autoregressive generation.
pub mod generator;
/// Shared prediction context.
pub mod context;
/// HTTP routing.
pub mod http;

pub use config::{ConfigArgs, GenerationConfig, ServiceConfig};
pub use context::{PredictRequest, PredictResponse, PredictionContext};
pub use error::{GenerationError, InitError, ScoreError};
pub use generator::{generate, Generator};
pub use scorer::{DenseDims, DenseScorer, Scorer};
