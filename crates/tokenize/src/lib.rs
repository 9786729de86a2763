#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
#![deny(missing_docs, unused_must_use)]

//! Text → index pipeline for next-word prediction.
//!
//! A corpus is scanned once into a [`Vocabulary`]; after that every text is
//! turned into vocabulary indices ([`encode`]), fitted to the model window
//! ([`normalize`]) and predicted indices are turned back into words
//! ([`decode`]). All functions here are pure and the vocabulary is read-only
//! after [`Vocabulary::build`], so it can be shared between threads freely.
//!
//! Layout:
//! - `tokenizer.rs` — pluggable word splitting and case rules
//! - `vocab.rs` — vocabulary construction and lookups
//! - `encode.rs` — text → index sequences
//! - `normalize.rs` — truncation / padding to a fixed window
//! - `decode.rs` — index → word

/// Word splitting policies.
pub mod tokenizer;
/// Vocabulary built from a corpus.
pub mod vocab;
/// Text to index sequences.
pub mod encode;
/// Fixed-window truncation and padding.
pub mod normalize;
/// Index to word.
pub mod decode;

pub use decode::{decode, decode_scan};
pub use encode::{encode, encode_one};
pub use normalize::{normalize, normalize_one, Padding};
pub use tokenizer::{
    Case, CaseFold, PatternTokenizer, PunctuationTokenizer, Tokenizer, TokenizerError, TokenizerKind,
    WordTokenizer,
};
pub use vocab::{IndexStrategy, Vocabulary, PAD_INDEX};
