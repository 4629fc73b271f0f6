//! Distance to similarity mapping.

use wayfinder_core::constants::MAX_COSINE_DISTANCE;

/// `1 - min(distance / 2, 1)`: 0 maps to 1.0, 2 and beyond map to 0.0.
pub fn distance_to_similarity(distance: f64) -> f64 {
    if distance.is_nan() {
        return 0.0;
    }
    1.0 - (distance.max(0.0) / MAX_COSINE_DISTANCE).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn anchor_points() {
        assert_eq!(distance_to_similarity(0.0), 1.0);
        assert_eq!(distance_to_similarity(1.0), 0.5);
        assert_eq!(distance_to_similarity(2.0), 0.0);
        assert_eq!(distance_to_similarity(4.0), 0.0);
    }

    #[test]
    fn nan_scores_zero() {
        assert_eq!(distance_to_similarity(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn always_in_unit_range(d in -10.0f64..10.0) {
            let s = distance_to_similarity(d);
            prop_assert!((0.0..=1.0).contains(&s));
        }

        #[test]
        fn monotonically_non_increasing(a in 0.0f64..3.0, b in 0.0f64..3.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(distance_to_similarity(lo) >= distance_to_similarity(hi));
        }
    }
}
