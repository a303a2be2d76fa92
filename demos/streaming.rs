//! Grow a matrix profile one sample at a time and report when a new
//! subsequence has no close match in the history.

use matrix_profile_rs::{MatrixProfileConfig, MatrixProfiler, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const ALERT_DISTANCE: f64 = 3.0;

fn signal(i: usize) -> f64 {
    let base = (i as f64 * 0.2).sin();
    if (700..720).contains(&i) {
        base + (i as f64 * 1.3).cos()
    } else {
        base
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let m = 32;
    let initial: Vec<f64> = (0..500).map(signal).collect();
    let profiler = MatrixProfiler::new(MatrixProfileConfig::new(m));
    let mut stream = profiler.streaming(&initial)?;
    info!(len = stream.time_series().len(), "initial profile ready");

    for i in 500..1_000 {
        stream.update(signal(i))?;
        let mp = stream.profile();
        let newest = mp.len() - 1;
        if mp.profile[newest] > ALERT_DISTANCE {
            warn!(
                start = newest,
                distance = mp.profile[newest],
                "subsequence unlike anything seen so far"
            );
        }
    }

    let mp = stream.profile();
    info!(
        len = stream.time_series().len(),
        discords = ?profiler.discords(mp, 2),
        "stream finished"
    );
    Ok(())
}
