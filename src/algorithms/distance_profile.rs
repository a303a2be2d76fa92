use tracing::trace;

use crate::algorithms::common::{apply_exclusion_zone, z_normalize, CrossCorrelator};
use crate::algorithms::mass::{mass_from_dot, mass_squared_with, squared_to_distance};
use crate::algorithms::stomp::{stomp_dot_product_in_place, DotProductCache};
use crate::core::distance_profile::{DistanceProfile, DistanceProfileProvider, StatelessProvider};
use crate::core::error::{check_window, MatrixProfileError, Result};
use crate::core::matrix_profile::{MatrixProfileConfig, RollingStats};

/// Query series, target series and window shared by every provider.
///
/// `ts_b = None` selects a self-join: the target is `ts_a` and trivial
/// matches around each query are masked.
#[derive(Debug, Clone, Copy)]
pub struct JoinInputs<'a> {
    pub ts_a: &'a [f64],
    pub ts_b: &'a [f64],
    pub m: usize,
    pub self_join: bool,
    /// `(before, after)` trivial-match zone; `(0, 0)` for AB-joins.
    pub trivial_zone: (usize, usize),
    pub n_queries: usize,
    pub profile_len: usize,
}

impl<'a> JoinInputs<'a> {
    pub fn new(
        ts_a: &'a [f64],
        ts_b: Option<&'a [f64]>,
        config: &MatrixProfileConfig,
    ) -> Result<Self> {
        let m = config.m;
        let n_queries = check_window(ts_a.len(), m)?;
        let (ts_b, self_join) = match ts_b {
            Some(b) => (b, false),
            None => (ts_a, true),
        };
        let profile_len = check_window(ts_b.len(), m)?;
        Ok(Self {
            ts_a,
            ts_b,
            m,
            self_join,
            trivial_zone: if self_join { config.trivial_match_zone() } else { (0, 0) },
            n_queries,
            profile_len,
        })
    }

    /// Query window starting at `idx`.
    pub fn query(&self, idx: usize) -> Result<&'a [f64]> {
        if idx >= self.n_queries {
            return Err(MatrixProfileError::QueryOutOfRange {
                idx,
                n_subs: self.n_queries,
            });
        }
        Ok(&self.ts_a[idx..idx + self.m])
    }

    /// Mask trivial matches (self-join only) and wrap the row.
    fn finish(&self, idx: usize, mut distances: Vec<f64>) -> DistanceProfile {
        let (before, after) = self.trivial_zone;
        if self.self_join && after > 0 {
            apply_exclusion_zone(&mut distances, idx, before, after);
        }
        DistanceProfile {
            distances,
            query_index: idx,
        }
    }
}

/// Reference provider: z-normalizes every window and takes the direct
/// Euclidean distance. O(n*m) per query.
///
/// Fails with `ConstantSequence` if the query or any window has zero variance.
#[derive(Debug, Clone)]
pub struct NaiveProvider<'a> {
    join: JoinInputs<'a>,
}

impl<'a> NaiveProvider<'a> {
    pub fn new(
        ts_a: &'a [f64],
        ts_b: Option<&'a [f64]>,
        config: &MatrixProfileConfig,
    ) -> Result<Self> {
        Ok(Self {
            join: JoinInputs::new(ts_a, ts_b, config)?,
        })
    }
}

impl StatelessProvider for NaiveProvider<'_> {
    fn compute(&self, idx: usize) -> Result<DistanceProfile> {
        let JoinInputs { ts_b, m, profile_len, .. } = self.join;
        let zq = z_normalize(self.join.query(idx)?)?;

        let mut distances = Vec::with_capacity(profile_len);
        for k in 0..profile_len {
            let zw = z_normalize(&ts_b[k..k + m])?;
            let d2: f64 = zq.iter().zip(&zw).map(|(a, b)| (a - b) * (a - b)).sum();
            distances.push(d2.sqrt());
        }
        Ok(self.join.finish(idx, distances))
    }
}

/// FFT-accelerated provider: recomputes the sliding dot product for every
/// query. O(n log n) per query.
pub struct MassProvider<'a> {
    join: JoinInputs<'a>,
    correlator: CrossCorrelator,
    stats_b: RollingStats,
}

impl<'a> MassProvider<'a> {
    pub fn new(
        ts_a: &'a [f64],
        ts_b: Option<&'a [f64]>,
        config: &MatrixProfileConfig,
    ) -> Result<Self> {
        let join = JoinInputs::new(ts_a, ts_b, config)?;
        Ok(Self {
            correlator: CrossCorrelator::new(join.ts_b, join.m)?,
            stats_b: RollingStats::compute(join.ts_b, join.m)?,
            join,
        })
    }
}

impl StatelessProvider for MassProvider<'_> {
    fn compute(&self, idx: usize) -> Result<DistanceProfile> {
        let query = self.join.query(idx)?;
        let distances = mass_squared_with(query, &self.correlator, &self.stats_b)?
            .into_iter()
            .map(squared_to_distance)
            .collect();
        Ok(self.join.finish(idx, distances))
    }
}

/// Incremental provider: derives each row's dot products from the previous
/// row in O(n) via the STOMP recurrence.
///
/// Rows must be requested in increasing consecutive order to benefit; any
/// other request falls back to a full FFT correlation for that row.
pub struct StompProvider<'a> {
    join: JoinInputs<'a>,
    correlator: CrossCorrelator,
    stats_a: RollingStats,
    stats_b: RollingStats,
    cache: DotProductCache,
}

impl<'a> StompProvider<'a> {
    pub fn new(
        ts_a: &'a [f64],
        ts_b: Option<&'a [f64]>,
        config: &MatrixProfileConfig,
    ) -> Result<Self> {
        let join = JoinInputs::new(ts_a, ts_b, config)?;
        let m = join.m;
        let correlator = CrossCorrelator::new(join.ts_b, m)?;
        let stats_b = RollingStats::compute(join.ts_b, m)?;

        // QT between every query window and the first target window. For a
        // self-join this is also row 0.
        let (stats_a, dot_first) = if join.self_join {
            (stats_b.clone(), correlator.correlate(&join.ts_b[..m])?)
        } else {
            (
                RollingStats::compute(join.ts_a, m)?,
                CrossCorrelator::new(join.ts_a, m)?.correlate(&join.ts_b[..m])?,
            )
        };

        Ok(Self {
            join,
            correlator,
            stats_a,
            stats_b,
            cache: DotProductCache::new(dot_first),
        })
    }

    /// Dot products of the most recently computed row.
    pub fn cache(&self) -> &DotProductCache {
        &self.cache
    }
}

impl DistanceProfileProvider for StompProvider<'_> {
    fn distance_profile(&mut self, idx: usize) -> Result<DistanceProfile> {
        let query = self.join.query(idx)?;
        let JoinInputs { ts_a, ts_b, m, .. } = self.join;
        let cache = &mut self.cache;

        match cache.prev_idx {
            Some(prev) if idx == prev + 1 => {
                stomp_dot_product_in_place(
                    ts_a,
                    ts_b,
                    m,
                    idx,
                    &cache.dot_first,
                    &mut cache.dot_prev,
                );
            }
            _ if idx == 0 && self.join.self_join => {
                cache.dot_prev = cache.dot_first.clone();
            }
            _ => {
                if idx > 0 {
                    trace!(idx, prev = ?cache.prev_idx, "non-consecutive STOMP row, using FFT");
                }
                cache.dot_prev = self.correlator.correlate(query)?;
            }
        }
        cache.prev_idx = Some(idx);

        let distances = mass_from_dot(
            &cache.dot_prev,
            m,
            self.stats_a.mean[idx],
            self.stats_a.std[idx],
            &self.stats_b.mean,
            &self.stats_b.std,
        )
        .into_iter()
        .map(squared_to_distance)
        .collect();
        Ok(self.join.finish(idx, distances))
    }

    fn n_queries(&self) -> usize {
        self.join.n_queries
    }

    fn profile_len(&self) -> usize {
        self.join.profile_len
    }

    fn window(&self) -> usize {
        self.join.m
    }
}

macro_rules! stateless_provider {
    ($($ty:ident),*) => {$(
        impl DistanceProfileProvider for $ty<'_> {
            fn distance_profile(&mut self, idx: usize) -> Result<DistanceProfile> {
                self.compute(idx)
            }

            fn n_queries(&self) -> usize {
                self.join.n_queries
            }

            fn profile_len(&self) -> usize {
                self.join.profile_len
            }

            fn window(&self) -> usize {
                self.join.m
            }
        }
    )*};
}

stateless_provider!(NaiveProvider, MassProvider);

/// Naive distance profile of query `idx` of `ts_a` against `ts_b` (or `ts_a`).
pub fn naive_distance_profile(
    ts_a: &[f64],
    idx: usize,
    m: usize,
    ts_b: Option<&[f64]>,
) -> Result<DistanceProfile> {
    NaiveProvider::new(ts_a, ts_b, &MatrixProfileConfig::new(m))?.compute(idx)
}

/// MASS distance profile of query `idx` of `ts_a` against `ts_b` (or `ts_a`).
pub fn mass_distance_profile(
    ts_a: &[f64],
    idx: usize,
    m: usize,
    ts_b: Option<&[f64]>,
) -> Result<DistanceProfile> {
    MassProvider::new(ts_a, ts_b, &MatrixProfileConfig::new(m))?.compute(idx)
}
