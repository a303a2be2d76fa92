use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};

use crate::core::error::{check_window, MatrixProfileError, Result};
use crate::core::matrix_profile::CONSTANT_STD_EPSILON;

fn fft_error(err: realfft::FftError) -> MatrixProfileError {
    MatrixProfileError::Fft(err.to_string())
}

/// FFT-based sliding cross-correlation against a fixed series.
///
/// The transform is planned and the series spectrum computed once, so each
/// query costs one forward and one inverse real FFT of length
/// `(n + m - 1).next_power_of_two()`.
pub struct CrossCorrelator {
    m: usize,
    n_subs: usize,
    fft_len: usize,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
    series_spectrum: Vec<Complex<f64>>,
}

impl CrossCorrelator {
    /// Plan transforms for correlating length-`m` queries against `ts`.
    pub fn new(ts: &[f64], m: usize) -> Result<Self> {
        let n_subs = check_window(ts.len(), m)?;
        let fft_len = (ts.len() + m - 1).next_power_of_two();

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);

        // Zero-pad time series
        let mut ts_padded = forward.make_input_vec();
        ts_padded[..ts.len()].copy_from_slice(ts);
        let mut series_spectrum = forward.make_output_vec();
        forward
            .process(&mut ts_padded, &mut series_spectrum)
            .map_err(fft_error)?;

        Ok(Self {
            m,
            n_subs,
            fft_len,
            forward,
            inverse,
            series_spectrum,
        })
    }

    pub fn window(&self) -> usize {
        self.m
    }

    /// Dot product of `query` with every window of the series.
    ///
    /// Returns `n - m + 1` values; element `i` is `dot(query, ts[i..i+m])`.
    pub fn correlate(&self, query: &[f64]) -> Result<Vec<f64>> {
        if query.len() != self.m {
            return Err(MatrixProfileError::LengthMismatch {
                expected: self.m,
                actual: query.len(),
            });
        }

        // Reverse query into zero-padded buffer
        let mut q_padded = self.forward.make_input_vec();
        for (slot, &v) in q_padded.iter_mut().zip(query.iter().rev()) {
            *slot = v;
        }

        let mut spectrum = self.forward.make_output_vec();
        self.forward
            .process(&mut q_padded, &mut spectrum)
            .map_err(fft_error)?;

        for (q_val, ts_val) in spectrum.iter_mut().zip(self.series_spectrum.iter()) {
            *q_val *= ts_val;
        }
        // DC and Nyquist bins of a real signal are purely real
        spectrum[0].im = 0.0;
        if let Some(last) = spectrum.last_mut() {
            last.im = 0.0;
        }

        let mut result = self.inverse.make_output_vec();
        self.inverse
            .process(&mut spectrum, &mut result)
            .map_err(fft_error)?;

        // realfft inverse is unnormalized
        let norm = 1.0 / self.fft_len as f64;

        // Leading m-1 samples are partial overlaps
        let start = self.m - 1;
        Ok(result[start..start + self.n_subs]
            .iter()
            .map(|&x| x * norm)
            .collect())
    }
}

/// Sliding dot product between `q` and every window of `ts`, via FFT.
pub fn sliding_dot_product(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    CrossCorrelator::new(ts, q.len())?.correlate(q)
}

/// Naive O(n*m) sliding dot product.
pub fn sliding_dot_product_naive(q: &[f64], ts: &[f64]) -> Result<Vec<f64>> {
    let m = q.len();
    let n_subs = check_window(ts.len(), m)?;

    Ok((0..n_subs)
        .map(|i| q.iter().zip(&ts[i..i + m]).map(|(a, b)| a * b).sum())
        .collect())
}

/// Apply an exclusion zone around index `idx`, setting entries within the zone to infinity.
///
/// The zone covers indices `[idx - before, idx + after)` (clamped to bounds).
#[inline]
pub fn apply_exclusion_zone(profile: &mut [f64], idx: usize, before: usize, after: usize) {
    let start = idx.saturating_sub(before).min(profile.len());
    let end = idx.saturating_add(after).min(profile.len()).max(start);
    for val in &mut profile[start..end] {
        *val = f64::INFINITY;
    }
}

/// Mean and population standard deviation of a slice.
pub fn mean_std(x: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mu = x.iter().sum::<f64>() / n;
    let var = x.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>() / n;
    (mu, var.sqrt())
}

/// Z-normalized copy of `ts` (zero mean, unit population std).
///
/// The input is never modified.
pub fn z_normalize(ts: &[f64]) -> Result<Vec<f64>> {
    let (mu, sigma) = mean_std(ts);
    if sigma.is_nan() || sigma < CONSTANT_STD_EPSILON {
        return Err(MatrixProfileError::ConstantSequence);
    }
    Ok(ts.iter().map(|v| (v - mu) / sigma).collect())
}

/// Euclidean distance between the z-normalized forms of `a` and `b`.
pub fn z_normalized_euclidean(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(MatrixProfileError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let za = z_normalize(a)?;
    let zb = z_normalize(b)?;
    Ok(za
        .iter()
        .zip(&zb)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}
