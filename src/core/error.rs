use thiserror::Error;

/// Result type alias using `MatrixProfileError`.
pub type Result<T> = std::result::Result<T, MatrixProfileError>;

/// Errors raised by the distance kernels and matrix profile drivers.
///
/// Every variant is a contract violation by the caller; nothing is retried
/// internally and no partial result is returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixProfileError {
    /// Subsequence length must be greater than one.
    #[error("Invalid window length {m}: subsequence length must be > 1")]
    InvalidWindowLength {
        /// Rejected window length.
        m: usize,
    },

    /// Z-normalization of a sequence with zero standard deviation.
    #[error("Cannot z-normalize a constant sequence (standard deviation is zero)")]
    ConstantSequence,

    /// Two sequences that must have equal length do not.
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// Series too short to contain a single subsequence.
    #[error("Time series of length {len} is shorter than window length {m}")]
    SeriesTooShort {
        /// Series length.
        len: usize,
        /// Window length.
        m: usize,
    },

    /// Sampling ratio outside `(0, 1]`.
    #[error("Sampling ratio must be in (0, 1], got {0}")]
    InvalidSamplingRatio(f64),

    /// Query start index without a full window in the series.
    #[error("Query index {idx} out of range for {n_subs} subsequences")]
    QueryOutOfRange {
        /// Requested query start.
        idx: usize,
        /// Number of subsequences available.
        n_subs: usize,
    },

    /// FFT backend rejected a buffer.
    #[error("FFT processing failed: {0}")]
    Fft(String),
}

/// Validate a window length against a series length.
pub(crate) fn check_window(len: usize, m: usize) -> Result<usize> {
    if m <= 1 {
        return Err(MatrixProfileError::InvalidWindowLength { m });
    }
    if len < m {
        return Err(MatrixProfileError::SeriesTooShort { len, m });
    }
    Ok(len - m + 1)
}
