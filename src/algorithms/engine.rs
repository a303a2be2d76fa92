use tracing::debug;

use crate::algorithms::distance_profile::{MassProvider, NaiveProvider, StompProvider};
use crate::core::distance_profile::DistanceProfileProvider;
#[cfg(feature = "parallel")]
use crate::core::distance_profile::StatelessProvider;
use crate::core::error::{MatrixProfileError, Result};
use crate::core::matrix_profile::{MatrixProfile, MatrixProfileConfig};
use crate::core::order::{OrderStrategy, Sequential, Shuffled};

/// Minimum number of query rows before dispatching to the parallel driver.
/// Below this, thread-dispatch overhead exceeds parallelism gains.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_SUBS: usize = 256;

/// Matrix profile algorithm: a traversal order paired with a distance kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    /// Sequential order, naive z-normalized distances. Reference only.
    Naive,
    /// Sequential order, MASS per query.
    Stmp,
    /// Seeded random order, MASS per query, stopping after
    /// `ceil(sampling_ratio * N)` queries. Exact when the ratio is 1.
    Stamp { sampling_ratio: f64, seed: u64 },
    /// Sequential order, STOMP dot-product recurrence.
    Stomp,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Stmp => "stmp",
            Algorithm::Stamp { .. } => "stamp",
            Algorithm::Stomp => "stomp",
        }
    }
}

/// Number of queries a sampled run may consume.
pub fn sample_budget(n_queries: usize, sampling_ratio: f64) -> Result<usize> {
    if !(sampling_ratio > 0.0 && sampling_ratio <= 1.0) {
        return Err(MatrixProfileError::InvalidSamplingRatio(sampling_ratio));
    }
    Ok(((sampling_ratio * n_queries as f64).ceil() as usize).min(n_queries))
}

/// Drives an order strategy and a distance profile provider.
///
/// Each step pulls the next query index, computes its distance profile and
/// keeps the element-wise minimum. A position only changes on a strictly
/// smaller distance, so on ties the first query visited wins.
pub struct MatrixProfileEngine<O, P> {
    order: O,
    provider: P,
    max_iterations: Option<usize>,
}

impl<O: OrderStrategy, P: DistanceProfileProvider> MatrixProfileEngine<O, P> {
    /// Exhaustive run over every index the order yields.
    pub fn new(order: O, provider: P) -> Self {
        Self {
            order,
            provider,
            max_iterations: None,
        }
    }

    /// Anytime run that stops after `ceil(sampling_ratio * N)` queries.
    pub fn sampled(order: O, provider: P, sampling_ratio: f64) -> Result<Self> {
        let budget = sample_budget(order.len(), sampling_ratio)?;
        Ok(Self {
            order,
            provider,
            max_iterations: Some(budget),
        })
    }

    pub fn run(mut self) -> Result<MatrixProfile> {
        let mut mp = MatrixProfile::new(self.provider.profile_len(), self.provider.window());
        let mut iterations = 0usize;

        while self.max_iterations.map_or(true, |max| iterations < max) {
            let Some(idx) = self.order.next_index() else {
                break;
            };
            let dp = self.provider.distance_profile(idx)?;
            mp.apply(&dp);
            iterations += 1;
        }

        debug!(
            iterations,
            n_queries = self.order.len(),
            profile_len = mp.len(),
            "matrix profile pass complete"
        );
        Ok(mp)
    }
}

/// Parallel exhaustive run for providers whose rows are independent.
///
/// Each worker folds a contiguous block of queries into a private profile;
/// blocks are merged with ties going to the smaller query index, which
/// reproduces the sequential result exactly.
#[cfg(feature = "parallel")]
pub fn run_parallel<P: StatelessProvider>(provider: &P) -> Result<MatrixProfile> {
    use rayon::prelude::*;

    let (len, m) = (provider.profile_len(), provider.window());
    let mp = (0..provider.n_queries())
        .into_par_iter()
        .try_fold(
            || MatrixProfile::new(len, m),
            |mut local, idx| {
                local.apply(&provider.compute(idx)?);
                Ok::<_, MatrixProfileError>(local)
            },
        )
        .try_reduce(
            || MatrixProfile::new(len, m),
            |mut a, b| {
                a.merge(&b);
                Ok(a)
            },
        )?;

    debug!(
        n_queries = provider.n_queries(),
        profile_len = mp.len(),
        threads = rayon::current_num_threads(),
        "parallel matrix profile pass complete"
    );
    Ok(mp)
}

/// Compute a matrix profile with an explicit configuration.
///
/// `ts_b = None` computes the self-join of `ts_a`; otherwise the profile has
/// one entry per window of `ts_b` and records the best matching query of `ts_a`.
pub fn compute_matrix_profile_with(
    ts_a: &[f64],
    ts_b: Option<&[f64]>,
    algorithm: Algorithm,
    config: &MatrixProfileConfig,
) -> Result<MatrixProfile> {
    debug!(
        algorithm = algorithm.name(),
        m = config.m,
        len_a = ts_a.len(),
        len_b = ts_b.map(<[f64]>::len),
        "computing matrix profile"
    );

    match algorithm {
        Algorithm::Naive => {
            let provider = NaiveProvider::new(ts_a, ts_b, config)?;
            #[cfg(feature = "parallel")]
            if provider.n_queries() >= MIN_PARALLEL_SUBS {
                return run_parallel(&provider);
            }
            MatrixProfileEngine::new(Sequential::new(provider.n_queries()), provider).run()
        }
        Algorithm::Stmp => {
            let provider = MassProvider::new(ts_a, ts_b, config)?;
            #[cfg(feature = "parallel")]
            if provider.n_queries() >= MIN_PARALLEL_SUBS {
                return run_parallel(&provider);
            }
            MatrixProfileEngine::new(Sequential::new(provider.n_queries()), provider).run()
        }
        Algorithm::Stamp {
            sampling_ratio,
            seed,
        } => {
            let provider = MassProvider::new(ts_a, ts_b, config)?;
            let order = Shuffled::new(provider.n_queries(), seed);
            MatrixProfileEngine::sampled(order, provider, sampling_ratio)?.run()
        }
        Algorithm::Stomp => {
            let provider = StompProvider::new(ts_a, ts_b, config)?;
            MatrixProfileEngine::new(Sequential::new(provider.n_queries()), provider).run()
        }
    }
}

/// Compute the matrix profile of `ts_a` (self-join) or of `ts_b` against `ts_a`.
pub fn compute_matrix_profile(
    ts_a: &[f64],
    m: usize,
    algorithm: Algorithm,
    ts_b: Option<&[f64]>,
) -> Result<MatrixProfile> {
    compute_matrix_profile_with(ts_a, ts_b, algorithm, &MatrixProfileConfig::new(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance_profile::DistanceProfile;

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (i as f64 * 0.3).sin() + 0.5 * (i as f64 * 0.11).cos())
            .collect()
    }

    fn assert_profiles_close(a: &MatrixProfile, b: &MatrixProfile, eps: f64) {
        assert_eq!(a.len(), b.len());
        for (i, (x, y)) in a.profile.iter().zip(&b.profile).enumerate() {
            if x.is_infinite() || y.is_infinite() {
                assert_eq!(x, y, "infinite mismatch at {i}");
            } else {
                assert!((x - y).abs() < eps, "profile mismatch at {i}: {x} vs {y}");
            }
        }
    }

    #[test]
    fn test_all_exact_algorithms_agree() {
        let ts = wave(150);
        let naive = compute_matrix_profile(&ts, 10, Algorithm::Naive, None).unwrap();
        let stmp = compute_matrix_profile(&ts, 10, Algorithm::Stmp, None).unwrap();
        let stomp = compute_matrix_profile(&ts, 10, Algorithm::Stomp, None).unwrap();
        let stamp = compute_matrix_profile(
            &ts,
            10,
            Algorithm::Stamp {
                sampling_ratio: 1.0,
                seed: 3,
            },
            None,
        )
        .unwrap();

        assert_eq!(naive.len(), 141);
        assert_profiles_close(&naive, &stmp, 1e-3);
        assert_profiles_close(&stmp, &stomp, 1e-3);
        assert_profiles_close(&stmp, &stamp, 1e-3);
    }

    #[test]
    fn test_profile_index_points_outside_trivial_zone() {
        let ts = wave(100);
        for m in [7, 8] {
            let config = MatrixProfileConfig::new(m);
            let mp = compute_matrix_profile_with(&ts, None, Algorithm::Stomp, &config).unwrap();
            let (before, after) = config.trivial_match_zone();
            for (j, (&d, &idx)) in mp.profile.iter().zip(&mp.profile_index).enumerate() {
                let idx = idx.expect("every position has a neighbor");
                assert!(d.is_finite());
                assert!(
                    j + before < idx || j >= idx + after,
                    "m={m}: position {j} matched trivial neighbor {idx}"
                );
            }
        }
    }

    #[test]
    fn test_ab_join_profile_length() {
        let a = wave(40);
        let b = wave(90);
        let mp = compute_matrix_profile(&a, 6, Algorithm::Stomp, Some(&b)).unwrap();
        assert_eq!(mp.len(), 85);
        assert!(mp.profile_index.iter().all(|i| i.map_or(false, |i| i < 35)));

        let stmp = compute_matrix_profile(&a, 6, Algorithm::Stmp, Some(&b)).unwrap();
        assert_profiles_close(&mp, &stmp, 1e-3);
    }

    #[test]
    fn test_stamp_sampled_is_upper_bound() {
        let ts = wave(200);
        let exact = compute_matrix_profile(&ts, 12, Algorithm::Stomp, None).unwrap();
        let sampled = compute_matrix_profile(
            &ts,
            12,
            Algorithm::Stamp {
                sampling_ratio: 0.2,
                seed: 42,
            },
            None,
        )
        .unwrap();

        for (e, s) in exact.profile.iter().zip(&sampled.profile) {
            assert!(*s >= *e - 1e-3, "sampled {s} below exact {e}");
        }
        // Only sampled queries appear in the index
        let used: std::collections::HashSet<usize> =
            sampled.profile_index.iter().flatten().copied().collect();
        assert!(used.len() <= sample_budget(189, 0.2).unwrap());
    }

    #[test]
    fn test_stamp_reproducible_with_seed() {
        let ts = wave(120);
        let algo = Algorithm::Stamp {
            sampling_ratio: 0.3,
            seed: 9,
        };
        let a = compute_matrix_profile(&ts, 8, algo, None).unwrap();
        let b = compute_matrix_profile(&ts, 8, algo, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_budget() {
        assert_eq!(sample_budget(10, 0.2), Ok(2));
        assert_eq!(sample_budget(11, 0.2), Ok(3));
        assert_eq!(sample_budget(10, 1.0), Ok(10));
        assert_eq!(
            sample_budget(10, 0.0),
            Err(MatrixProfileError::InvalidSamplingRatio(0.0))
        );
        assert!(sample_budget(10, 1.5).is_err());
        assert!(sample_budget(10, f64::NAN).is_err());
    }

    #[test]
    fn test_errors_propagate() {
        let ts = wave(20);
        assert_eq!(
            compute_matrix_profile(&ts, 1, Algorithm::Stomp, None).unwrap_err(),
            MatrixProfileError::InvalidWindowLength { m: 1 }
        );
        assert_eq!(
            compute_matrix_profile(&ts, 30, Algorithm::Stmp, None).unwrap_err(),
            MatrixProfileError::SeriesTooShort { len: 20, m: 30 }
        );
        let flat = vec![1.0; 20];
        assert_eq!(
            compute_matrix_profile(&flat, 4, Algorithm::Naive, None).unwrap_err(),
            MatrixProfileError::ConstantSequence
        );
    }

    /// Provider yielding the same fixed row for every query.
    struct FixedRows {
        rows: Vec<Vec<f64>>,
    }

    impl DistanceProfileProvider for FixedRows {
        fn distance_profile(&mut self, idx: usize) -> Result<DistanceProfile> {
            Ok(DistanceProfile {
                distances: self.rows[idx].clone(),
                query_index: idx,
            })
        }

        fn n_queries(&self) -> usize {
            self.rows.len()
        }

        fn profile_len(&self) -> usize {
            self.rows[0].len()
        }

        fn window(&self) -> usize {
            2
        }
    }

    #[test]
    fn test_ties_keep_first_visited() {
        let rows = vec![vec![1.0, 2.0, f64::INFINITY], vec![1.0, 1.5, f64::INFINITY]];
        let mp = MatrixProfileEngine::new(Sequential::new(2), FixedRows { rows }).run().unwrap();
        assert_eq!(mp.profile_index, vec![Some(0), Some(1), None]);
        assert_eq!(mp.profile[1], 1.5);
        assert!(mp.profile[2].is_infinite());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let ts = wave(700);
        let config = MatrixProfileConfig::new(16);
        let provider = MassProvider::new(&ts, None, &config).unwrap();
        let parallel = run_parallel(&provider).unwrap();
        let serial = MatrixProfileEngine::new(Sequential::new(provider.n_queries()), provider)
            .run()
            .unwrap();
        assert_eq!(parallel, serial);
    }
}
