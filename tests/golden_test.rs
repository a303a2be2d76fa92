use matrix_profile_rs::algorithms::common::z_normalized_euclidean;
use matrix_profile_rs::{
    Algorithm, MatrixProfile, MatrixProfileConfig, MatrixProfiler, StreamingProfile,
};
use serde::Deserialize;
use std::fs;

#[derive(Deserialize)]
struct GoldenData {
    ts_a: Vec<f64>,
    ts_b: Option<Vec<f64>>,
    m: usize,
    profile: Vec<f64>,
    #[allow(dead_code)]
    profile_index: Vec<i64>,
}

const EPSILON: f64 = 1e-6;

const GOLDEN_FILES: [&str; 4] = [
    "self_join_m8.json",
    "self_join_m7.json",
    "self_join_m13.json",
    "ab_join_m10.json",
];

fn load_golden(filename: &str) -> GoldenData {
    let path = format!("tests/golden_data/{filename}");
    let data = fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!("Golden data file not found: {path}. Run: python scripts/generate_golden_data.py")
    });
    serde_json::from_str(&data).unwrap()
}

/// Treat values > 1e300 as infinity (JSON uses 1e308 sentinel for inf).
fn is_sentinel_inf(v: f64) -> bool {
    v.is_infinite() || v > 1e300
}

fn assert_profile_match(name: &str, rust_profile: &[f64], golden_profile: &[f64], epsilon: f64) {
    assert_eq!(
        rust_profile.len(),
        golden_profile.len(),
        "{name}: profile length mismatch: rust={} vs golden={}",
        rust_profile.len(),
        golden_profile.len()
    );

    let mut max_diff = 0.0_f64;
    let mut max_diff_idx = 0;

    for (i, (r, g)) in rust_profile.iter().zip(golden_profile).enumerate() {
        if is_sentinel_inf(*r) && is_sentinel_inf(*g) {
            continue;
        }
        let diff = (r - g).abs();
        if diff > max_diff {
            max_diff = diff;
            max_diff_idx = i;
        }
    }

    assert!(
        max_diff < epsilon,
        "{name}: max diff = {max_diff:.2e} at index {max_diff_idx} \
         (rust={}, golden={}), epsilon={epsilon:.0e}",
        rust_profile[max_diff_idx],
        golden_profile[max_diff_idx],
    );

    eprintln!("  {name}: max_diff = {max_diff:.2e} (epsilon = {epsilon:.0e})");
}

/// Every recorded neighbor must actually sit at the recorded distance.
fn assert_index_consistent(name: &str, golden: &GoldenData, mp: &MatrixProfile) {
    let m = golden.m;
    let target = golden.ts_b.as_deref().unwrap_or(&golden.ts_a);
    for (j, (&d, idx)) in mp.profile.iter().zip(&mp.profile_index).enumerate() {
        match idx {
            Some(i) => {
                let direct =
                    z_normalized_euclidean(&golden.ts_a[*i..*i + m], &target[j..j + m]).unwrap();
                assert!(
                    (direct - d).abs() < EPSILON,
                    "{name}: index {i} at {j} gives {direct}, profile holds {d}"
                );
            }
            None => assert!(d.is_infinite(), "{name}: finite distance without index at {j}"),
        }
    }
}

fn run_golden_test(filename: &str, algorithm: Algorithm) {
    let golden = load_golden(filename);
    eprintln!(
        "Testing {filename} with {}: n={}, m={}",
        algorithm.name(),
        golden.ts_a.len(),
        golden.m
    );

    let profiler = MatrixProfiler::new(MatrixProfileConfig::new(golden.m));
    let mp = match &golden.ts_b {
        Some(ts_b) => profiler.ab_join(&golden.ts_a, ts_b, algorithm),
        None => profiler.compute(&golden.ts_a, algorithm),
    }
    .unwrap();

    let name = format!("{filename}/{}", algorithm.name());
    assert_profile_match(&name, &mp.profile, &golden.profile, EPSILON);
    assert_index_consistent(&name, &golden, &mp);
}

#[test]
fn golden_naive() {
    for file in GOLDEN_FILES {
        run_golden_test(file, Algorithm::Naive);
    }
}

#[test]
fn golden_stmp() {
    for file in GOLDEN_FILES {
        run_golden_test(file, Algorithm::Stmp);
    }
}

#[test]
fn golden_stamp_full_ratio() {
    for file in GOLDEN_FILES {
        run_golden_test(
            file,
            Algorithm::Stamp {
                sampling_ratio: 1.0,
                seed: 42,
            },
        );
    }
}

#[test]
fn golden_stomp() {
    for file in GOLDEN_FILES {
        run_golden_test(file, Algorithm::Stomp);
    }
}

#[test]
fn golden_streaming_reconstructs_batch() {
    // Odd windows have a lopsided trivial-match zone, so the newest slot's
    // row minimum is not the batch column minimum
    for file in ["self_join_m8.json"] {
        let golden = load_golden(file);
        let split = golden.ts_a.len() / 2;
        let mut stream =
            StreamingProfile::new(&golden.ts_a[..split], MatrixProfileConfig::new(golden.m))
                .unwrap();
        for &val in &golden.ts_a[split..] {
            stream.update(val).unwrap();
        }
        assert_profile_match(
            &format!("{file}/streaming"),
            &stream.profile().profile,
            &golden.profile,
            EPSILON,
        );
    }
}
