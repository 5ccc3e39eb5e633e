//! SIMD kernels on `TRANSFER_SIZE`-lane vectors of `i8`.
//!
//! aarch64 uses NEON (baseline on that target); x86_64 uses SSE4.1, probed at
//! run time. Nothing here is compiled without the `simd` feature, and
//! [`VectorizedKernels::detect`] then always returns `None`.

use super::{check_signal_len, checked_kernel_sum, SignalKernel};
use crate::config::{KERNEL_LENGTH, TRANSFER_SIZE};
use crate::error::Result;
use crate::signal::{Kernel, SignalFrame};

/// Instruction set backing a [`VectorizedKernels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneSet {
    #[cfg(all(feature = "simd", target_arch = "aarch64"))]
    Neon,
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    Sse41,
}

impl LaneSet {
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(all(feature = "simd", target_arch = "aarch64"))]
            LaneSet::Neon => "neon",
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            LaneSet::Sse41 => "sse4.1",
        }
    }
}

/// Vectorized kernel pair. Only obtainable through [`VectorizedKernels::detect`],
/// so holding one proves the CPU supports its lane set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorizedKernels {
    lanes: LaneSet,
}

impl VectorizedKernels {
    /// Probe the CPU. `None` when the `simd` feature is off or no supported
    /// instruction set is present.
    pub fn detect() -> Option<Self> {
        #[cfg(all(feature = "simd", target_arch = "aarch64"))]
        {
            if std::arch::is_aarch64_feature_detected!("neon") {
                return Some(Self {
                    lanes: LaneSet::Neon,
                });
            }
        }
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        {
            if std::arch::is_x86_feature_detected!("sse4.1") {
                return Some(Self {
                    lanes: LaneSet::Sse41,
                });
            }
        }
        None
    }

    pub fn lanes(&self) -> LaneSet {
        self.lanes
    }
}

/// Kernel taps zero-padded to a full vector.
fn padded_taps(kernel: &Kernel) -> [i8; TRANSFER_SIZE] {
    let mut taps = [0i8; TRANSFER_SIZE];
    taps[..KERNEL_LENGTH].copy_from_slice(kernel.taps());
    taps
}

impl SignalKernel for VectorizedKernels {
    fn name(&self) -> &'static str {
        self.lanes.name()
    }

    #[allow(unused_variables)]
    fn truncate(&self, input: &[i8], output: &mut [i8]) {
        assert_eq!(input.len(), output.len());
        match self.lanes {
            // SAFETY: `lanes` is only set by `detect` after the feature probe.
            #[cfg(all(feature = "simd", target_arch = "aarch64"))]
            LaneSet::Neon => unsafe { neon::truncate(input, output) },
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            LaneSet::Sse41 => unsafe { sse41::truncate(input, output) },
        }
    }

    #[allow(unused_variables, unreachable_code)]
    fn convolve(&self, frame: &SignalFrame, kernel: &Kernel, output: &mut [i8]) -> Result<()> {
        let kernel_sum = checked_kernel_sum(kernel)?;
        check_signal_len(output)?;
        let taps = padded_taps(kernel);
        match self.lanes {
            // SAFETY: as in `truncate`; every window is TRANSFER_SIZE bytes.
            #[cfg(all(feature = "simd", target_arch = "aarch64"))]
            LaneSet::Neon => unsafe { neon::convolve(frame, &taps, kernel_sum, output) },
            #[cfg(all(feature = "simd", target_arch = "x86_64"))]
            LaneSet::Sse41 => unsafe { sse41::convolve(frame, &taps, kernel_sum, output) },
        }
        Ok(())
    }
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
mod neon {
    use crate::config::{THRESHOLD, TRANSFER_SIZE};
    use crate::kernels::{normalize, truncate_tail};
    use crate::signal::SignalFrame;
    use std::arch::aarch64::*;

    #[target_feature(enable = "neon")]
    pub(super) unsafe fn truncate(input: &[i8], output: &mut [i8]) {
        let threshold = vdupq_n_s8(THRESHOLD);
        let mut src = input.chunks_exact(TRANSFER_SIZE);
        let mut dst = output.chunks_exact_mut(TRANSFER_SIZE);
        for (s, d) in (&mut src).zip(&mut dst) {
            let v = vld1q_s8(s.as_ptr());
            vst1q_s8(d.as_mut_ptr(), vminq_s8(v, threshold));
        }
        truncate_tail(src.remainder(), dst.into_remainder());
    }

    /// Widening multiply into two `int16x8` halves, reduced with `vaddlvq_s16`.
    #[target_feature(enable = "neon")]
    pub(super) unsafe fn convolve(
        frame: &SignalFrame,
        taps: &[i8; TRANSFER_SIZE],
        kernel_sum: i32,
        output: &mut [i8],
    ) {
        let k = vld1q_s8(taps.as_ptr());
        let k_lo = vget_low_s8(k);
        for (i, out) in output.iter_mut().enumerate() {
            let window = frame.window(i, TRANSFER_SIZE);
            let x = vld1q_s8(window.as_ptr());
            let lo = vmull_s8(vget_low_s8(x), k_lo);
            let hi = vmull_high_s8(x, k);
            let window_sum = vaddlvq_s16(lo) + vaddlvq_s16(hi);
            *out = normalize(window_sum, kernel_sum);
        }
    }
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
mod sse41 {
    use crate::config::{THRESHOLD, TRANSFER_SIZE};
    use crate::kernels::{lane_sum, normalize, truncate_tail};
    use crate::signal::SignalFrame;
    use std::arch::x86_64::*;

    #[target_feature(enable = "sse4.1")]
    pub(super) unsafe fn truncate(input: &[i8], output: &mut [i8]) {
        let threshold = _mm_set1_epi8(THRESHOLD);
        let mut src = input.chunks_exact(TRANSFER_SIZE);
        let mut dst = output.chunks_exact_mut(TRANSFER_SIZE);
        for (s, d) in (&mut src).zip(&mut dst) {
            let v = _mm_loadu_si128(s.as_ptr() as *const __m128i);
            _mm_storeu_si128(d.as_mut_ptr() as *mut __m128i, _mm_min_epi8(v, threshold));
        }
        truncate_tail(src.remainder(), dst.into_remainder());
    }

    /// Sign-extend each half to `i16`, multiply-add pairs into four `i32`
    /// lanes, store them to a stack array and sum.
    #[target_feature(enable = "sse4.1")]
    pub(super) unsafe fn convolve(
        frame: &SignalFrame,
        taps: &[i8; TRANSFER_SIZE],
        kernel_sum: i32,
        output: &mut [i8],
    ) {
        let k = _mm_loadu_si128(taps.as_ptr() as *const __m128i);
        let k_lo = _mm_cvtepi8_epi16(k);
        let k_hi = _mm_cvtepi8_epi16(_mm_srli_si128::<8>(k));
        let mut lanes = [0i32; 4];
        for (i, out) in output.iter_mut().enumerate() {
            let window = frame.window(i, TRANSFER_SIZE);
            let x = _mm_loadu_si128(window.as_ptr() as *const __m128i);
            let lo = _mm_madd_epi16(_mm_cvtepi8_epi16(x), k_lo);
            let hi = _mm_madd_epi16(_mm_cvtepi8_epi16(_mm_srli_si128::<8>(x)), k_hi);
            _mm_storeu_si128(lanes.as_mut_ptr() as *mut __m128i, _mm_add_epi32(lo, hi));
            *out = normalize(lane_sum(&lanes), kernel_sum);
        }
    }
}
