#![forbid(unsafe_code)]

/// Index of the highest score.
///
/// Ties resolve to the lowest index, i.e. the first maximum met while
/// iterating. NaN never wins. Returns `None` when `scores` is empty or holds
/// only NaN.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    #[test]
    fn picks_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
    }

    #[test]
    fn ties_go_to_first_index() {
        assert_eq!(argmax(&[0.2, 0.4, 0.4, 0.1]), Some(1));
        assert_eq!(argmax(&[1.0, 1.0]), Some(0));
    }

    #[test]
    fn nan_is_skipped() {
        assert_eq!(argmax(&[f32::NAN, 0.3, f32::NAN, 0.5]), Some(3));
        assert_eq!(argmax(&[f32::NAN, f32::NAN]), None);
    }

    #[test]
    fn empty_has_no_argmax() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn negative_infinity_still_selectable() {
        assert_eq!(argmax(&[f32::NEG_INFINITY, f32::NEG_INFINITY]), Some(0));
    }

    quickcheck! {
        fn selected_score_is_not_below_any_other(scores: Vec<f32>) -> bool {
            match argmax(&scores) {
                None => scores.iter().all(|s| s.is_nan()),
                Some(i) => scores
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| !s.is_nan())
                    .all(|(j, &s)| s < scores[i] || (s == scores[i] && j >= i)),
            }
        }
    }
}
