#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::indexing_slicing)]
#![deny(missing_docs, unused_must_use)]

//! Token selection over score distributions.
//!
//! Only deterministic strategies live here: identical scores in, identical
//! index out.

/// Greedy (argmax) selection.
pub mod greedy;
/// Softmax normalisation of raw logits.
pub mod softmax;

pub use greedy::argmax;
pub use softmax::softmax;
