use crate::core::error::{MatrixProfileError, Result};
use crate::core::matrix_profile::MatrixProfile;

const DEFAULT_ANNOTATION: [f64; 1] = [1.0];

/// Reweight a matrix profile with an annotation vector.
///
/// Returns the elementwise product of `mp.profile` and `av`. With no vector the
/// single weight `[1.0]` is used, which only fits a length-1 profile.
pub fn apply_annotation_vector(mp: &MatrixProfile, av: Option<&[f64]>) -> Result<Vec<f64>> {
    let av = av.unwrap_or(&DEFAULT_ANNOTATION);
    if av.len() != mp.len() {
        return Err(MatrixProfileError::LengthMismatch {
            expected: mp.len(),
            actual: av.len(),
        });
    }
    Ok(mp.profile.iter().zip(av).map(|(d, w)| d * w).collect())
}
