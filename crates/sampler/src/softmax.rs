#![forbid(unsafe_code)]

/// In-place softmax over a logits slice. Leaves the slice untouched when it
/// is empty or the exponent sum underflows to zero.
pub fn softmax(logits: &mut [f32]) {
    if logits.is_empty() {
        return;
    }
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0_f32;
    for v in logits.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum == 0.0 {
        return;
    }
    for v in logits.iter_mut() {
        *v /= sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argmax;

    #[test]
    fn sums_to_one_and_keeps_order() {
        let mut v = vec![1.0, 3.0, 2.0];
        softmax(&mut v);
        let total: f32 = v.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert_eq!(argmax(&v), Some(1));
    }

    #[test]
    fn empty_is_noop() {
        let mut v: Vec<f32> = vec![];
        softmax(&mut v);
        assert!(v.is_empty());
    }
}
