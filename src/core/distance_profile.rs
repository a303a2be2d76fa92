use crate::core::error::Result;

/// Distances from one query subsequence to every candidate window of the target.
///
/// `distances[k]` is the z-normalized Euclidean distance between
/// `ts_a[query_index..query_index+m]` and `ts_b[k..k+m]`. Masked trivial
/// matches are `+inf`. Every entry is attributed to `query_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceProfile {
    pub distances: Vec<f64>,
    pub query_index: usize,
}

impl DistanceProfile {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Smallest distance and its first position, or `None` if nothing is finite.
    pub fn min_finite(&self) -> Option<(usize, f64)> {
        self.distances
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .fold(None, |best, (i, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((i, d)),
            })
    }
}

/// Strategy that produces the distance profile for a query start.
///
/// Implementations are bound to a fixed `(ts_a, ts_b, m)` at construction.
/// Self-joins mask the trivial-match zone around the query before returning.
pub trait DistanceProfileProvider {
    /// Distance profile of query `idx` of `ts_a` against every window of `ts_b`.
    fn distance_profile(&mut self, idx: usize) -> Result<DistanceProfile>;

    /// Number of query starts available in `ts_a`.
    fn n_queries(&self) -> usize;

    /// Length of each produced profile (`|ts_b| - m + 1`).
    fn profile_len(&self) -> usize;

    /// Subsequence length.
    fn window(&self) -> usize;
}

/// Provider whose rows do not depend on previously computed rows.
///
/// Such rows may be computed in any order, or concurrently, from a shared
/// reference.
pub trait StatelessProvider: DistanceProfileProvider + Sync {
    fn compute(&self, idx: usize) -> Result<DistanceProfile>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_finite_first_wins() {
        let dp = DistanceProfile {
            distances: vec![f64::INFINITY, 2.0, 1.0, 1.0, f64::INFINITY],
            query_index: 0,
        };
        assert_eq!(dp.min_finite(), Some((2, 1.0)));
    }

    #[test]
    fn test_min_finite_all_masked() {
        let dp = DistanceProfile {
            distances: vec![f64::INFINITY; 3],
            query_index: 1,
        };
        assert_eq!(dp.min_finite(), None);
    }
}
