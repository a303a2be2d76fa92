use crate::algorithms::common::{mean_std, CrossCorrelator};
use crate::core::error::Result;
use crate::core::matrix_profile::{RollingStats, CONSTANT_STD_EPSILON};

/// Convert sliding dot products into squared z-normalized Euclidean distances.
///
/// For each window `k`:
/// `d²(k) = 2m * (1 - (QT[k] - m*mu_q*mu[k]) / (m*sigma_q*sigma[k]))`
///
/// Edge cases:
/// - Query and window both constant → 0
/// - Exactly one of them constant → `2m`
/// - The correlation is clamped to `[-1, 1]`, so results lie in `[0, 4m]`
pub fn mass_from_dot(
    dot: &[f64],
    m: usize,
    q_mean: f64,
    q_std: f64,
    mean: &[f64],
    std: &[f64],
) -> Vec<f64> {
    debug_assert_eq!(dot.len(), mean.len());
    debug_assert_eq!(dot.len(), std.len());
    let m_f = m as f64;
    let q_constant = q_std < CONSTANT_STD_EPSILON;

    dot.iter()
        .zip(mean.iter().zip(std))
        .map(|(&qt, (&mu, &sigma))| {
            let w_constant = sigma < CONSTANT_STD_EPSILON;
            match (q_constant, w_constant) {
                (true, true) => 0.0,
                (true, false) | (false, true) => 2.0 * m_f,
                (false, false) => {
                    let r = (qt - m_f * mu * q_mean) / (m_f * sigma * q_std);
                    2.0 * m_f * (1.0 - r.clamp(-1.0, 1.0))
                }
            }
        })
        .collect()
}

/// Square root of a squared distance, clamping round-off negatives to zero.
#[inline]
pub fn squared_to_distance(d2: f64) -> f64 {
    d2.max(0.0).sqrt()
}

/// Squared MASS distance profile using a planned correlator and precomputed stats.
pub fn mass_squared_with(
    query: &[f64],
    correlator: &CrossCorrelator,
    stats: &RollingStats,
) -> Result<Vec<f64>> {
    let dot = correlator.correlate(query)?;
    let (q_mean, q_std) = mean_std(query);
    Ok(mass_from_dot(
        &dot,
        query.len(),
        q_mean,
        q_std,
        &stats.mean,
        &stats.std,
    ))
}

/// Squared z-normalized distance profile of `query` against `ts` (MASS).
///
/// Returns `ts.len() - query.len() + 1` squared distances.
pub fn mass_squared(query: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    let m = query.len();
    let stats = RollingStats::compute(ts, m)?;
    let correlator = CrossCorrelator::new(ts, m)?;
    mass_squared_with(query, &correlator, &stats)
}

/// Z-normalized distance profile of `query` against `ts` (MASS).
///
/// Implements Mueen's Algorithm for Similarity Search:
/// 1. Compute rolling statistics (mean, std) for the time series
/// 2. Compute the sliding dot product between query and time series via FFT
/// 3. Convert QT values to z-normalized Euclidean distances
pub fn mass(query: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    Ok(mass_squared(query, ts)?
        .into_iter()
        .map(squared_to_distance)
        .collect())
}
