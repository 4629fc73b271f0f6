//! Dimension fitting.
//!
//! Providers may return more or fewer components than a class is configured
//! for. Vectors are truncated or zero-padded to the class dimensionality and
//! rejected outright if any component is not finite, so nothing of the wrong
//! shape reaches the store or the index.

use wayfinder_core::errors::{EmbeddingError, WayfinderResult};

/// Truncate or zero-pad `embedding` to exactly `dims` components.
///
/// # Errors
/// `InvalidVector` if the input is empty or holds a NaN/infinite component.
pub fn fit_dimensions(mut embedding: Vec<f32>, dims: usize) -> WayfinderResult<Vec<f32>> {
    if embedding.is_empty() {
        return Err(EmbeddingError::InvalidVector {
            reason: "provider returned an empty vector".to_string(),
        }
        .into());
    }
    if let Some(pos) = embedding.iter().position(|x| !x.is_finite()) {
        return Err(EmbeddingError::InvalidVector {
            reason: format!("non-finite component at index {pos}"),
        }
        .into());
    }
    if embedding.len() != dims {
        tracing::debug!(from = embedding.len(), to = dims, "fitting embedding dimensions");
        embedding.resize(dims, 0.0);
    }
    Ok(embedding)
}

/// Validate that an embedding has the expected dimensions.
///
/// # Errors
/// Returns `DimensionMismatch` if dimensions don't match.
pub fn validate_dimensions(embedding: &[f32], expected: usize) -> WayfinderResult<()> {
    if embedding.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_vectors() {
        assert_eq!(fit_dimensions(vec![1.0, 2.0, 3.0], 2).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn pads_short_vectors() {
        assert_eq!(fit_dimensions(vec![1.0], 3).unwrap(), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn exact_length_unchanged() {
        assert_eq!(fit_dimensions(vec![0.5, 0.5], 2).unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn rejects_non_finite_and_empty() {
        assert!(fit_dimensions(vec![f32::INFINITY, 0.0], 2).is_err());
        assert!(fit_dimensions(vec![0.0, f32::NAN], 2).is_err());
        assert!(fit_dimensions(vec![], 2).is_err());
    }

    proptest::proptest! {
        #[test]
        fn fitted_length_always_matches(
            v in proptest::collection::vec(-10.0f32..10.0, 1..64),
            dims in 1usize..96,
        ) {
            let fitted = fit_dimensions(v.clone(), dims).unwrap();
            proptest::prop_assert_eq!(fitted.len(), dims);
            let shared = v.len().min(dims);
            proptest::prop_assert_eq!(&fitted[..shared], &v[..shared]);
        }
    }

    #[test]
    fn validate_reports_mismatch() {
        assert!(validate_dimensions(&[1.0, 2.0], 2).is_ok());
        assert!(validate_dimensions(&[1.0], 2).is_err());
    }
}
