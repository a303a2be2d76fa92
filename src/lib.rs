pub mod algorithms;
pub mod core;

pub use crate::algorithms::annotation::apply_annotation_vector;
pub use crate::algorithms::discords::{extract_discords, NO_DISCORD};
pub use crate::algorithms::distance_profile::{
    mass_distance_profile, naive_distance_profile, MassProvider, NaiveProvider, StompProvider,
};
pub use crate::algorithms::engine::{
    compute_matrix_profile, compute_matrix_profile_with, Algorithm, MatrixProfileEngine,
};
pub use crate::algorithms::mass::mass;
pub use crate::algorithms::stampi::{update_streaming, StreamingProfile};
pub use crate::core::distance_profile::{
    DistanceProfile, DistanceProfileProvider, StatelessProvider,
};
pub use crate::core::error::{MatrixProfileError, Result};
pub use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig, RollingStats};
pub use crate::core::order::{OrderStrategy, Sequential, Shuffled};

/// High-level facade for matrix profile computation with a fixed configuration.
///
/// # Examples
///
/// ```
/// use matrix_profile_rs::{Algorithm, MatrixProfileConfig, MatrixProfiler};
///
/// let ts = vec![0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];
/// let profiler = MatrixProfiler::new(MatrixProfileConfig::new(4));
/// let mp = profiler.compute(&ts, Algorithm::Stomp).unwrap();
/// assert_eq!(mp.profile.len(), ts.len() - 4 + 1);
/// assert!(mp.profile[0] < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct MatrixProfiler {
    config: MatrixProfileConfig,
}

impl MatrixProfiler {
    /// Create a new profiler with the given configuration.
    pub fn new(config: MatrixProfileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatrixProfileConfig {
        &self.config
    }

    /// Compute the self-join matrix profile of a time series.
    pub fn compute(&self, ts: &[f64], algorithm: Algorithm) -> Result<MatrixProfile> {
        compute_matrix_profile_with(ts, None, algorithm, &self.config)
    }

    /// Compute the AB-join: for each window of `ts_b`, its nearest window in `ts_a`.
    ///
    /// No trivial-match exclusion is applied.
    pub fn ab_join(
        &self,
        ts_a: &[f64],
        ts_b: &[f64],
        algorithm: Algorithm,
    ) -> Result<MatrixProfile> {
        compute_matrix_profile_with(ts_a, Some(ts_b), algorithm, &self.config)
    }

    /// Create a streaming matrix profile from an initial time series.
    pub fn streaming(&self, initial_ts: &[f64]) -> Result<StreamingProfile> {
        StreamingProfile::new(initial_ts, self.config.clone())
    }

    /// Top-`k` discords of a profile, suppressing the configured exclusion zone
    /// around each one.
    pub fn discords(&self, mp: &MatrixProfile, k: usize) -> Vec<usize> {
        extract_discords(&mp.profile, self.config.exclusion_zone(), k)
    }

    /// Top-`k` discords after reweighting the profile with an annotation vector.
    pub fn annotated_discords(
        &self,
        mp: &MatrixProfile,
        av: &[f64],
        k: usize,
    ) -> Result<Vec<usize>> {
        let weighted = apply_annotation_vector(mp, Some(av))?;
        Ok(extract_discords(&weighted, self.config.exclusion_zone(), k))
    }
}
