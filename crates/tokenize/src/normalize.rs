#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::vocab::PAD_INDEX;

/// Which side of a short sequence receives the padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Padding {
    /// Pad in front, real tokens end up at the tail of the window
    #[default]
    Pre,
    /// Pad after the real tokens
    Post,
}

/// Fit one sequence to exactly `window` tokens.
///
/// Over-long input keeps its last `window` tokens whatever the padding side;
/// short input is filled with [`PAD_INDEX`] on the `side` given.
pub fn normalize_one(seq: &[usize], window: usize, side: Padding) -> Vec<usize> {
    if seq.len() >= window {
        return seq.iter().skip(seq.len() - window).copied().collect();
    }
    let pad = std::iter::repeat(PAD_INDEX).take(window - seq.len());
    match side {
        Padding::Pre => pad.chain(seq.iter().copied()).collect(),
        Padding::Post => seq.iter().copied().chain(pad).collect(),
    }
}

/// Fit every sequence to exactly `window` tokens, see [`normalize_one`].
pub fn normalize<S: AsRef<[usize]>>(sequences: &[S], window: usize, side: Padding) -> Vec<Vec<usize>> {
    sequences
        .iter()
        .map(|seq| normalize_one(seq.as_ref(), window, side))
        .collect()
}
