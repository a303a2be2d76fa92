use crate::core::distance_profile::DistanceProfile;
use crate::core::error::{check_window, Result};

/// Standard deviations below this are treated as zero (constant subsequence).
pub const CONSTANT_STD_EPSILON: f64 = 1e-15;

/// Configuration for matrix profile computation.
#[derive(Debug, Clone)]
pub struct MatrixProfileConfig {
    /// Subsequence length.
    pub m: usize,
    /// Whether to mask trivial matches around the query in a self-join.
    pub ignore_trivial: bool,
    /// Exclusion zone denominator: the trivial-match zone is sized from
    /// `m / exclusion_zone_denom` (default 2).
    pub exclusion_zone_denom: usize,
}

impl MatrixProfileConfig {
    pub fn new(m: usize) -> Self {
        Self {
            m,
            ignore_trivial: true,
            exclusion_zone_denom: 2,
        }
    }

    /// Trivial-match zone as `(before, after)`: a self-join query at `idx`
    /// masks starts in `[idx - before, idx + after)`.
    ///
    /// With `r = m / exclusion_zone_denom`, `before = round(r)` and
    /// `after = round(r + 1)`, both rounding half to even. For odd `m` the
    /// zone is therefore not symmetric around the query.
    pub fn trivial_match_zone(&self) -> (usize, usize) {
        if !self.ignore_trivial {
            return (0, 0);
        }
        let r = self.m as f64 / self.exclusion_zone_denom.max(1) as f64;
        (r.round_ties_even() as usize, (r + 1.0).round_ties_even() as usize)
    }

    /// Half-width of the trivial-match zone before the query.
    pub fn exclusion_zone(&self) -> usize {
        self.trivial_match_zone().0
    }
}

/// The matrix profile result.
///
/// `profile[j]` is the smallest distance observed for target position `j`;
/// `profile_index[j]` is the query start that produced it (`None` while unset).
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixProfile {
    /// Nearest-neighbor distances for each subsequence.
    pub profile: Vec<f64>,
    /// Index of the query subsequence that produced each distance.
    pub profile_index: Vec<Option<usize>>,
    /// Subsequence length used.
    pub m: usize,
}

impl MatrixProfile {
    /// Create a new matrix profile initialized to infinity distances.
    pub fn new(n_subs: usize, m: usize) -> Self {
        Self {
            profile: vec![f64::INFINITY; n_subs],
            profile_index: vec![None; n_subs],
            m,
        }
    }

    pub fn len(&self) -> usize {
        self.profile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profile.is_empty()
    }

    /// Update the profile at `pos` if `distance` is strictly smaller than the
    /// current value. Ties keep the earlier writer.
    #[inline]
    pub fn update(&mut self, pos: usize, distance: f64, query_idx: usize) {
        if distance < self.profile[pos] {
            self.profile[pos] = distance;
            self.profile_index[pos] = Some(query_idx);
        }
    }

    /// Fold one distance profile into the running minimum.
    pub fn apply(&mut self, dp: &DistanceProfile) {
        debug_assert_eq!(self.profile.len(), dp.distances.len());
        for (pos, &d) in dp.distances.iter().enumerate() {
            self.update(pos, d, dp.query_index);
        }
    }

    /// Append one unset slot (streaming growth).
    pub(crate) fn push_unset(&mut self) {
        self.profile.push(f64::INFINITY);
        self.profile_index.push(None);
    }

    /// Merge another matrix profile into this one, taking element-wise minimums.
    ///
    /// On an exact tie the smaller query index wins, which makes merges of
    /// partial profiles independent of the order they complete in.
    pub fn merge(&mut self, other: &MatrixProfile) {
        debug_assert_eq!(self.profile.len(), other.profile.len());
        for i in 0..self.profile.len() {
            let (d, idx) = (other.profile[i], other.profile_index[i]);
            let take = d < self.profile[i]
                || (d == self.profile[i]
                    && idx.is_some()
                    && (self.profile_index[i].is_none() || idx < self.profile_index[i]));
            if take {
                self.profile[i] = d;
                self.profile_index[i] = idx;
            }
        }
    }
}

/// Rolling mean and standard deviation for all subsequences of length `m`.
///
/// Computed via a single pass over cumulative sums and sums-of-squares.
#[derive(Debug, Clone)]
pub struct RollingStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    /// Whether any subsequence is constant (has sigma == 0).
    pub has_constant: bool,
}

impl RollingStats {
    /// Compute rolling statistics for subsequences of length `m`.
    pub fn compute(ts: &[f64], m: usize) -> Result<Self> {
        let n_subs = check_window(ts.len(), m)?;
        let n = ts.len();

        let mut cumsum = vec![0.0; n + 1];
        let mut cumsum_sq = vec![0.0; n + 1];
        for i in 0..n {
            cumsum[i + 1] = cumsum[i] + ts[i];
            cumsum_sq[i + 1] = cumsum_sq[i] + ts[i] * ts[i];
        }

        let mut mean = vec![0.0; n_subs];
        let mut std = vec![0.0; n_subs];
        let mut has_constant = false;

        let m_f = m as f64;
        for i in 0..n_subs {
            let sum = cumsum[i + m] - cumsum[i];
            let sum_sq = cumsum_sq[i + m] - cumsum_sq[i];
            let mu = sum / m_f;
            // Round-off can push E[X^2] - E[X]^2 slightly below zero
            let var = (sum_sq / m_f - mu * mu).max(0.0);
            let sigma = var.sqrt();
            mean[i] = mu;
            std[i] = sigma;
            if sigma < CONSTANT_STD_EPSILON {
                has_constant = true;
            }
        }

        Ok(Self {
            mean,
            std,
            has_constant,
        })
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}
