#![forbid(unsafe_code)]

use std::path::Path;

use crate::error::{InitError, ScoreError};
use crate::linear::Linear;
use crate::loader;

/// The sequence model as seen by the generator: a fixed-length window of
/// vocabulary indices in, one score per index (0 included) out.
///
/// Implementations must be safe to call from many request threads at once.
pub trait Scorer: Send + Sync {
    /// Score every index for the token following `window`.
    fn score(&self, window: &[usize]) -> Result<Vec<f32>, ScoreError>;
}

impl<F> Scorer for F
where
    F: Fn(&[usize]) -> Result<Vec<f32>, ScoreError> + Send + Sync,
{
    fn score(&self, window: &[usize]) -> Result<Vec<f32>, ScoreError> {
        self(window)
    }
}

/// Shape of a [`DenseScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenseDims {
    /// tokens per input window
    pub window: usize,
    /// embedding width per token
    pub embed: usize,
    /// hidden layer width
    pub hidden: usize,
    /// number of scored indices (largest vocabulary index + 1)
    pub outputs: usize,
}

impl DenseDims {
    /// Floats in a weight file for this shape: embedding table, hidden
    /// layer, output layer.
    pub fn param_count(&self) -> usize {
        self.outputs * self.embed
            + Linear::param_count(self.window * self.embed, self.hidden)
            + Linear::param_count(self.hidden, self.outputs)
    }
}

/// Small embedding + two-layer dense network.
///
/// Each window token is looked up in an `outputs x embed` table, the rows
/// are concatenated, passed through `tanh(W1 x + b1)` and projected to one
/// logit per index, then softmaxed. Indices outside the table use row 0.
pub struct DenseScorer {
    dims: DenseDims,
    embedding: Vec<f32>,
    hidden: Linear,
    output: Linear,
}

impl DenseScorer {
    /// Carve a flat weight buffer laid out as `E, W1, b1, W2, b2`.
    pub fn from_weights(data: &[f32], dims: DenseDims) -> Result<Self, InitError> {
        if data.len() != dims.param_count() {
            return Err(InitError::Model(format!(
                "expected {} weights for {:?}, found {}",
                dims.param_count(),
                dims,
                data.len()
            )));
        }
        let (embedding, rest) = data.split_at(dims.outputs * dims.embed);
        let (l1, l2) = rest.split_at(Linear::param_count(dims.window * dims.embed, dims.hidden));
        let hidden = Linear::from_raw(dims.window * dims.embed, dims.hidden, l1)
            .ok_or_else(|| InitError::Model("hidden layer shape mismatch".into()))?;
        let output = Linear::from_raw(dims.hidden, dims.outputs, l2)
            .ok_or_else(|| InitError::Model("output layer shape mismatch".into()))?;
        Ok(Self { dims, embedding: embedding.to_vec(), hidden, output })
    }

    /// Load weights from a little-endian f32 file.
    pub fn load(path: &Path, dims: DenseDims) -> Result<Self, InitError> {
        let data = loader::load_f32_file(path)
            .map_err(|e| InitError::Model(format!("{}: {e}", path.display())))?;
        let scorer = Self::from_weights(&data, dims)?;
        log::info!("loaded dense model from {}: {:?}", path.display(), dims);
        Ok(scorer)
    }

    /// Model shape.
    pub fn dims(&self) -> DenseDims {
        self.dims
    }

    fn embed_row(&self, index: usize) -> &[f32] {
        let mut rows = self.embedding.chunks_exact(self.dims.embed);
        let fallback = self.embedding.chunks_exact(self.dims.embed).next().unwrap_or(&[]);
        rows.nth(index).unwrap_or(fallback)
    }
}

impl Scorer for DenseScorer {
    fn score(&self, window: &[usize]) -> Result<Vec<f32>, ScoreError> {
        if window.len() != self.dims.window {
            return Err(ScoreError::WindowLength { expected: self.dims.window, actual: window.len() });
        }
        if self.dims.embed == 0 {
            return Err(ScoreError::Model("embedding width is zero".into()));
        }
        let mut input = Vec::with_capacity(self.dims.window * self.dims.embed);
        for &token in window {
            input.extend_from_slice(self.embed_row(token));
        }
        let h: Vec<f32> = self.hidden.forward(&input).into_iter().map(f32::tanh).collect();
        let mut logits = self.output.forward(&h);
        sampler::softmax(&mut logits);
        Ok(logits)
    }
}
