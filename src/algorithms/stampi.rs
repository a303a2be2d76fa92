use tracing::trace;

use crate::algorithms::distance_profile::MassProvider;
use crate::algorithms::engine::{compute_matrix_profile_with, Algorithm};
use crate::core::distance_profile::StatelessProvider;
use crate::core::error::{check_window, MatrixProfileError, Result};
use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig};

/// Streaming self-join matrix profile (STAMPI).
///
/// Owns a growing copy of the time series. Each new point extends the profile
/// by one entry and lowers existing entries the new subsequence is closer to.
pub struct StreamingProfile {
    /// The growing time series.
    ts: Vec<f64>,
    /// Current matrix profile.
    mp: MatrixProfile,
    config: MatrixProfileConfig,
}

impl StreamingProfile {
    /// Create a streaming profile from an initial batch, computed with STOMP.
    pub fn new(initial_ts: &[f64], config: MatrixProfileConfig) -> Result<Self> {
        let mp = compute_matrix_profile_with(initial_ts, None, Algorithm::Stomp, &config)?;
        Ok(Self {
            ts: initial_ts.to_vec(),
            mp,
            config,
        })
    }

    /// Resume streaming from a previously computed profile of `ts`.
    pub fn from_parts(ts: Vec<f64>, mp: MatrixProfile, config: MatrixProfileConfig) -> Result<Self> {
        check_profile_len(&ts, config.m, &mp)?;
        Ok(Self { ts, mp, config })
    }

    /// Append a new point and update the matrix profile.
    pub fn update(&mut self, new_val: f64) -> Result<()> {
        append_sample(&mut self.ts, &mut self.mp, new_val, &self.config)
    }

    /// Get a reference to the current matrix profile.
    pub fn profile(&self) -> &MatrixProfile {
        &self.mp
    }

    /// Get a reference to the current time series.
    pub fn time_series(&self) -> &[f64] {
        &self.ts
    }

    pub fn into_parts(self) -> (Vec<f64>, MatrixProfile) {
        (self.ts, self.mp)
    }
}

/// Update a self-join matrix profile of `ts_a` for one newly arrived sample.
///
/// `mp` must cover `ts_a` (length `|ts_a| - m + 1`) and have been computed
/// with window `m`. The returned profile is one entry longer: existing entries
/// never increase, and the last entry holds the nearest neighbor of the newest
/// subsequence.
///
/// There is no AB-join variant. Against a fixed `ts_b` the new query's
/// distance profile has `|ts_b| - m + 1` entries, one fewer than the grown
/// profile, so the two cannot be merged position by position.
pub fn update_streaming(
    ts_a: &[f64],
    m: usize,
    mut mp: MatrixProfile,
    new_sample: f64,
) -> Result<MatrixProfile> {
    check_profile_len(ts_a, m, &mp)?;
    let mut ts = Vec::with_capacity(ts_a.len() + 1);
    ts.extend_from_slice(ts_a);
    append_sample(&mut ts, &mut mp, new_sample, &MatrixProfileConfig::new(m))?;
    Ok(mp)
}

fn check_profile_len(ts: &[f64], m: usize, mp: &MatrixProfile) -> Result<()> {
    let n_subs = check_window(ts.len(), m)?;
    if mp.m != m {
        return Err(MatrixProfileError::LengthMismatch {
            expected: m,
            actual: mp.m,
        });
    }
    if mp.len() != n_subs || mp.profile_index.len() != n_subs {
        return Err(MatrixProfileError::LengthMismatch {
            expected: n_subs,
            actual: mp.len(),
        });
    }
    Ok(())
}

/// Grow `ts` by one sample and fold the newest subsequence into `mp`.
fn append_sample(
    ts: &mut Vec<f64>,
    mp: &mut MatrixProfile,
    new_val: f64,
    config: &MatrixProfileConfig,
) -> Result<()> {
    ts.push(new_val);
    let new_idx = ts.len() - config.m;

    let dp = match MassProvider::new(ts, None, config).and_then(|p| p.compute(new_idx)) {
        Ok(dp) => dp,
        Err(err) => {
            ts.pop();
            return Err(err);
        }
    };

    mp.push_unset();
    mp.apply(&dp);

    // The newest subsequence also needs its own best match
    if let Some((neighbor, distance)) = dp.min_finite() {
        mp.profile[new_idx] = distance;
        mp.profile_index[new_idx] = Some(neighbor);
    }

    trace!(
        new_idx,
        nearest = mp.profile[new_idx],
        "streaming matrix profile extended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::engine::compute_matrix_profile;

    fn series(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (i as f64 * 0.5).sin() + 0.2 * (i as f64 * 1.7).cos())
            .collect()
    }

    #[test]
    fn test_stampi_grow_matches_batch() {
        let full_ts = series(60);
        let m = 6;
        let config = MatrixProfileConfig::new(m);

        let mut stampi = StreamingProfile::new(&full_ts[..20], config).unwrap();
        for &val in &full_ts[20..] {
            stampi.update(val).unwrap();
        }

        let batch = compute_matrix_profile(&full_ts, m, Algorithm::Stomp, None).unwrap();
        assert_eq!(stampi.profile().len(), batch.len());
        for i in 0..batch.len() {
            assert!(
                (stampi.profile().profile[i] - batch.profile[i]).abs() < 1e-6,
                "Mismatch at index {i}: streaming={}, batch={}",
                stampi.profile().profile[i],
                batch.profile[i]
            );
        }
        assert_eq!(stampi.time_series(), &full_ts[..]);
    }

    #[test]
    fn test_update_streaming_monotone() {
        let ts = series(40);
        let m = 5;
        let before = compute_matrix_profile(&ts, m, Algorithm::Stmp, None).unwrap();
        let after = update_streaming(&ts, m, before.clone(), 0.75).unwrap();

        assert_eq!(after.len(), before.len() + 1);
        for (old, new) in before.profile.iter().zip(&after.profile) {
            assert!(new <= old, "profile increased: {old} -> {new}");
        }
        let last = after.len() - 1;
        assert!(after.profile[last].is_finite());
        let neighbor = after.profile_index[last].unwrap();
        assert!(neighbor.abs_diff(last) > MatrixProfileConfig::new(m).exclusion_zone());
    }

    #[test]
    fn test_update_streaming_no_valid_neighbor() {
        // n_subs grows from 1 to 2: both subsequences overlap, nothing to compare
        let ts = vec![0.0, 1.0, 3.0, 2.0];
        let mp = compute_matrix_profile(&ts, 4, Algorithm::Stmp, None).unwrap();
        let after = update_streaming(&ts, 4, mp, 5.0).unwrap();
        assert_eq!(after.len(), 2);
        assert!(after.profile.iter().all(|d| d.is_infinite()));
        assert!(after.profile_index.iter().all(Option::is_none));
    }

    #[test]
    fn test_update_streaming_length_mismatch() {
        let ts = series(30);
        let mp = MatrixProfile::new(10, 5);
        assert_eq!(
            update_streaming(&ts, 5, mp, 1.0).unwrap_err(),
            MatrixProfileError::LengthMismatch {
                expected: 26,
                actual: 10
            }
        );
    }

    #[test]
    fn test_window_mismatch_rejected() {
        let ts = series(30);
        let mp = compute_matrix_profile(&ts, 5, Algorithm::Stomp, None).unwrap();
        let err = MatrixProfileError::LengthMismatch {
            expected: 4,
            actual: 5,
        };
        assert_eq!(
            StreamingProfile::from_parts(ts.clone(), mp.clone(), MatrixProfileConfig::new(4))
                .err(),
            Some(err.clone())
        );

        // Same length with a different window: 30 - 5 + 1 == 29 - 4 + 1
        assert_eq!(update_streaming(&ts[..29], 4, mp, 1.0).unwrap_err(), err);
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let ts = series(30);
        let config = MatrixProfileConfig::new(4);
        let mp = compute_matrix_profile(&ts, 4, Algorithm::Stomp, None).unwrap();
        let mut stream = StreamingProfile::from_parts(ts.clone(), mp, config).unwrap();
        stream.update(0.1).unwrap();
        let (grown, mp) = stream.into_parts();
        assert_eq!(grown.len(), 31);
        assert_eq!(mp.len(), 28);
    }
}
