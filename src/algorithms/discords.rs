use tracing::debug;

/// Index recorded for discord slots that could not be filled.
pub const NO_DISCORD: usize = usize::MAX;

/// Find the top-k discords (most anomalous subsequences) in a matrix profile.
///
/// Uses greedy extraction with exclusion zone elimination: find the largest
/// finite distance, record it, then suppress `[idx - e, idx + e)` before the
/// next search. At least `idx` itself is suppressed, so `e = 0` still makes
/// progress.
///
/// # Arguments
/// * `profile` - Matrix profile distances
/// * `exclusion_zone` - Half-width `e` of the suppressed interval
/// * `k` - Number of discords to find, clamped to the profile length
///
/// # Returns
/// Exactly `min(k, len)` indices sorted by distance (descending). Slots left
/// over once no finite distance remains hold [`NO_DISCORD`].
pub fn extract_discords(profile: &[f64], exclusion_zone: usize, k: usize) -> Vec<usize> {
    let k = k.min(profile.len());
    let mut working = profile.to_vec();
    let mut discords = Vec::with_capacity(k);

    for _ in 0..k {
        // Find the index with the largest finite distance
        let worst = working
            .iter()
            .enumerate()
            .filter(|(_, d)| d.is_finite())
            .fold(None, |best: Option<(usize, f64)>, (i, &d)| match best {
                Some((_, best_d)) if best_d >= d => best,
                _ => Some((i, d)),
            });

        let Some((worst_idx, _)) = worst else {
            break;
        };
        discords.push(worst_idx);

        let start = worst_idx.saturating_sub(exclusion_zone);
        let end = worst_idx
            .saturating_add(exclusion_zone)
            .max(worst_idx + 1)
            .min(working.len());
        working[start..end].fill(f64::INFINITY);
    }

    let found = discords.len();
    discords.resize(k, NO_DISCORD);
    debug!(requested = k, found, exclusion_zone, "extracted discords");
    discords
}
