//! Error types for kernel and export operations.

/// Crate result type.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Errors raised by the harness, kernels and exporters.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// The kernel taps sum to zero, so normalization would divide by zero.
    #[error("kernel taps sum to zero; cannot normalize convolution output")]
    ZeroKernelSum,

    /// A buffer handed to a kernel does not have the expected length.
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A profiling request asked for no iterations.
    #[error("profiling needs at least one iteration")]
    NoIterations,

    /// Writing a WAV file failed.
    #[error("wav export failed: {0}")]
    Wav(#[from] hound::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert!(KernelError::ZeroKernelSum.to_string().contains("sum to zero"));
        let err = KernelError::LengthMismatch {
            expected: 1024,
            actual: 3,
        };
        assert_eq!(err.to_string(), "buffer length mismatch: expected 1024, got 3");
    }
}
