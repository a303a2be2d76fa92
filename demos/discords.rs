//! Batch matrix profile of a noisy sine wave with two injected anomalies.
//!
//! Run with `RUST_LOG=debug cargo run --example discords` to see engine logs.

use matrix_profile_rs::{Algorithm, MatrixProfileConfig, MatrixProfiler, Result, NO_DISCORD};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut rng = StdRng::seed_from_u64(42);
    let mut ts: Vec<f64> = (0..2_000)
        .map(|i| (i as f64 * 0.05).sin() + rng.gen_range(-0.05..0.05))
        .collect();
    ts[600..610].iter_mut().for_each(|v| *v += 1.5);
    ts[1_400] -= 3.0;

    let profiler = MatrixProfiler::new(MatrixProfileConfig::new(50));
    for algorithm in [
        Algorithm::Stomp,
        Algorithm::Stamp {
            sampling_ratio: 0.25,
            seed: 7,
        },
    ] {
        let mp = profiler.compute(&ts, algorithm)?;
        let discords = profiler.discords(&mp, 3);
        info!(algorithm = algorithm.name(), profile_len = mp.len(), "profile computed");
        for (rank, idx) in discords.into_iter().enumerate() {
            if idx == NO_DISCORD {
                info!(rank, "no further discord");
                continue;
            }
            info!(
                rank,
                idx,
                distance = mp.profile[idx],
                neighbor = ?mp.profile_index[idx],
                "discord"
            );
        }
    }
    Ok(())
}
