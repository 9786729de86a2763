#![forbid(unsafe_code)]

/// Dense layer: out = W * in + b
pub struct Linear {
    /// input dimension
    pub in_dim: usize,
    /// output dimension
    pub out_dim: usize,
    /// weights in row-major order: out_dim x in_dim
    weights: Vec<f32>,
    /// bias vector of length out_dim
    bias: Vec<f32>,
}

impl Linear {
    /// Build a layer from a weight block followed by a bias block. Returns
    /// `None` when `raw` is not exactly `out_dim * in_dim + out_dim` long.
    pub fn from_raw(in_dim: usize, out_dim: usize, raw: &[f32]) -> Option<Self> {
        let expected = out_dim * in_dim;
        if raw.len() != expected + out_dim {
            return None;
        }
        let (weights, bias) = raw.split_at(expected);
        Some(Self { in_dim, out_dim, weights: weights.to_vec(), bias: bias.to_vec() })
    }

    /// Number of floats `from_raw` consumes for these dimensions.
    pub fn param_count(in_dim: usize, out_dim: usize) -> usize {
        in_dim * out_dim + out_dim
    }

    /// Forward pass for a single input vector of length `in_dim`.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        if self.in_dim == 0 {
            return self.bias.clone();
        }
        self.weights
            .chunks_exact(self.in_dim)
            .zip(self.bias.iter())
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_applies_weights_and_bias() {
        // rows [1,2] and [0,-1], bias [0.5, 1]
        let lin = Linear::from_raw(2, 2, &[1.0, 2.0, 0.0, -1.0, 0.5, 1.0]).unwrap();
        assert_eq!(lin.forward(&[3.0, 4.0]), vec![11.5, -3.0]);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(Linear::from_raw(2, 2, &[1.0; 5]).is_none());
        assert_eq!(Linear::param_count(2, 2), 6);
    }

    #[test]
    fn zero_input_returns_bias() {
        let lin = Linear::from_raw(0, 3, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(lin.forward(&[]), vec![1.0, 2.0, 3.0]);
    }
}
