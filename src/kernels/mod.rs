//! Truncation and convolution kernels.
//!
//! Two implementations of [`SignalKernel`] exist: [`ScalarKernels`], the
//! element-by-element reference, and [`VectorizedKernels`], which processes
//! `TRANSFER_SIZE` lanes per step. Both must produce identical output for the
//! same input.

// IMPORTANT: Kernels run inside the timed region. No invariant logging, no
// tracing, no allocation in this module tree.

mod scalar;
mod vectorized;

pub use scalar::ScalarKernels;
pub use vectorized::{LaneSet, VectorizedKernels};

use crate::config::{SIGNAL_LENGTH, THRESHOLD};
use crate::error::{KernelError, Result};
use crate::signal::{Kernel, SignalFrame};

/// A truncation/convolution pair.
pub trait SignalKernel: Send + Sync {
    /// Short backend identifier ("scalar", "neon", "sse4.1").
    fn name(&self) -> &'static str;

    /// `output[i] = min(input[i], THRESHOLD)`.
    ///
    /// Panics if the slices differ in length.
    fn truncate(&self, input: &[i8], output: &mut [i8]);

    /// Normalized convolution of the framed signal with `kernel`.
    ///
    /// `output` must hold `SIGNAL_LENGTH` samples.
    fn convolve(&self, frame: &SignalFrame, kernel: &Kernel, output: &mut [i8]) -> Result<()>;
}

/// Sum of a run of lane values, widened to `i32`.
///
/// Used for the kernel normalization divisor and for reducing stored lane
/// products.
#[inline]
pub fn lane_sum<T: Copy + Into<i32>>(values: &[T]) -> i32 {
    values.iter().fold(0i32, |acc, &v| acc + v.into())
}

/// Divide by the kernel sum (truncating toward zero) and narrow through `u8`.
#[inline]
pub(crate) fn normalize(window_sum: i32, kernel_sum: i32) -> i8 {
    (window_sum / kernel_sum) as u8 as i8
}

pub(crate) fn checked_kernel_sum(kernel: &Kernel) -> Result<i32> {
    match kernel.sum() {
        0 => Err(KernelError::ZeroKernelSum),
        sum => Ok(sum),
    }
}

pub(crate) fn check_signal_len(buffer: &[i8]) -> Result<()> {
    if buffer.len() != SIGNAL_LENGTH {
        return Err(KernelError::LengthMismatch {
            expected: SIGNAL_LENGTH,
            actual: buffer.len(),
        });
    }
    Ok(())
}

/// Scalar tail shared by the vectorized truncation loops.
#[cfg_attr(not(feature = "simd"), allow(dead_code))]
#[inline]
pub(crate) fn truncate_tail(input: &[i8], output: &mut [i8]) {
    for (o, &x) in output.iter_mut().zip(input) {
        *o = x.min(THRESHOLD);
    }
}
