/// Cached dot products threaded through consecutive STOMP rows.
#[derive(Debug, Clone)]
pub struct DotProductCache {
    /// `QT[i][0]`: dot product of every query window with the first target
    /// window. In a self-join this equals row 0.
    pub dot_first: Vec<f64>,
    /// Dot products of the most recently computed row.
    pub dot_prev: Vec<f64>,
    /// Query index `dot_prev` belongs to.
    pub prev_idx: Option<usize>,
}

impl DotProductCache {
    pub fn new(dot_first: Vec<f64>) -> Self {
        Self {
            dot_first,
            dot_prev: Vec::new(),
            prev_idx: None,
        }
    }
}

/// Advance `dot` from row `idx - 1` to row `idx` in place.
///
/// STOMP exploits the relationship between consecutive dot products:
/// `QT[i][j] = QT[i-1][j-1] - A[i-1]*B[j-1] + A[i+m-1]*B[j+m-1]`
///
/// Column 0 has no predecessor and is read from `dot_first[idx]`. This makes
/// each row O(n) instead of the O(n log n) of an FFT correlation.
///
/// `idx` must be at least 1 and `dot` must hold row `idx - 1`.
pub fn stomp_dot_product_in_place(
    ts_a: &[f64],
    ts_b: &[f64],
    m: usize,
    idx: usize,
    dot_first: &[f64],
    dot: &mut [f64],
) {
    debug_assert!(idx >= 1);
    debug_assert_eq!(dot.len() + m - 1, ts_b.len());
    let leaving = ts_a[idx - 1];
    let entering = ts_a[idx + m - 1];

    // Walk backwards so dot[j-1] still holds the previous row
    for j in (1..dot.len()).rev() {
        dot[j] = dot[j - 1] - leaving * ts_b[j - 1] + entering * ts_b[j + m - 1];
    }
    if let Some(first) = dot.first_mut() {
        *first = dot_first[idx];
    }
}

/// Self-join dot products of row `idx` from row `idx - 1`, leaving inputs untouched.
pub fn stomp_dot_product(
    ts: &[f64],
    m: usize,
    dot_first: &[f64],
    dot_prev: &[f64],
    idx: usize,
) -> Vec<f64> {
    let mut dot = dot_prev.to_vec();
    stomp_dot_product_in_place(ts, ts, m, idx, dot_first, &mut dot);
    dot
}
