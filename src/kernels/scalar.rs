//! Element-by-element reference kernels.

use super::{check_signal_len, checked_kernel_sum, normalize, SignalKernel};
use crate::config::{KERNEL_LENGTH, THRESHOLD};
use crate::error::Result;
use crate::signal::{Kernel, SignalFrame};

/// Reference implementation; always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScalarKernels;

impl SignalKernel for ScalarKernels {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn truncate(&self, input: &[i8], output: &mut [i8]) {
        assert_eq!(input.len(), output.len());
        for (o, &x) in output.iter_mut().zip(input) {
            *o = x.min(THRESHOLD);
        }
    }

    fn convolve(&self, frame: &SignalFrame, kernel: &Kernel, output: &mut [i8]) -> Result<()> {
        let kernel_sum = checked_kernel_sum(kernel)?;
        check_signal_len(output)?;
        for (i, out) in output.iter_mut().enumerate() {
            let window = frame.window(i, KERNEL_LENGTH);
            let mut window_sum = 0i32;
            for (&tap, &x) in kernel.taps().iter().zip(window) {
                window_sum += tap as i32 * x as i32;
            }
            *out = normalize(window_sum, kernel_sum);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EdgePolicy, SIGNAL_LENGTH, WINDOW_LEAD};
    use crate::error::KernelError;

    fn frame_of(signal: &[i8; SIGNAL_LENGTH], policy: EdgePolicy) -> SignalFrame {
        let mut frame = SignalFrame::new();
        frame.load(signal);
        frame.fill_edges(policy, &Kernel::default(), &[]);
        frame
    }

    #[test]
    fn truncate_clamps_above_threshold_only() {
        let input: Vec<i8> = vec![-128, -1, 0, 49, 50, 51, 127];
        let mut out = vec![0; input.len()];
        ScalarKernels.truncate(&input, &mut out);
        assert_eq!(out, vec![-128, -1, 0, 49, 50, 50, 50]);
    }

    #[test]
    #[should_panic]
    fn truncate_rejects_mismatched_lengths() {
        let mut out = [0i8; 3];
        ScalarKernels.truncate(&[1, 2], &mut out);
    }

    #[test]
    fn flat_signal_averages_to_itself() {
        let frame = frame_of(&[10; SIGNAL_LENGTH], EdgePolicy::Periodic);
        let mut out = [0i8; SIGNAL_LENGTH];
        ScalarKernels
            .convolve(&frame, &Kernel::default(), &mut out)
            .unwrap();
        assert!(out.iter().all(|&s| s == 10));
    }

    #[test]
    fn zero_padding_attenuates_edges() {
        let frame = frame_of(&[16; SIGNAL_LENGTH], EdgePolicy::ZeroPad);
        let mut out = [0i8; SIGNAL_LENGTH];
        ScalarKernels
            .convolve(&frame, &Kernel::default(), &mut out)
            .unwrap();
        // Window at 0 covers 8 halo zeros and 8 samples of 16.
        assert_eq!(out[0], 8);
        assert_eq!(out[WINDOW_LEAD], 16);
        // Last window reaches 7 samples into the trailing halo.
        assert_eq!(out[SIGNAL_LENGTH - 1], 9);
    }

    #[test]
    fn impulse_recovers_kernel_shape() {
        let mut taps = [0i8; KERNEL_LENGTH];
        taps[WINDOW_LEAD] = 2;
        let mut signal = [0i8; SIGNAL_LENGTH];
        signal[100] = 40;
        let frame = frame_of(&signal, EdgePolicy::ZeroPad);
        let mut out = [0i8; SIGNAL_LENGTH];
        ScalarKernels
            .convolve(&frame, &Kernel::from_taps(taps), &mut out)
            .unwrap();
        assert_eq!(out[100], 40);
        assert_eq!(out.iter().filter(|&&s| s != 0).count(), 1);
    }

    #[test]
    fn zero_sum_kernel_is_an_error() {
        let mut taps = [1i8; KERNEL_LENGTH];
        taps[..8].fill(-1);
        let frame = frame_of(&[1; SIGNAL_LENGTH], EdgePolicy::ZeroPad);
        let mut out = [0i8; SIGNAL_LENGTH];
        let err = ScalarKernels
            .convolve(&frame, &Kernel::from_taps(taps), &mut out)
            .unwrap_err();
        assert!(matches!(err, KernelError::ZeroKernelSum));
    }

    #[test]
    fn short_output_is_an_error() {
        let frame = frame_of(&[1; SIGNAL_LENGTH], EdgePolicy::ZeroPad);
        let mut out = [0i8; 8];
        assert!(ScalarKernels
            .convolve(&frame, &Kernel::default(), &mut out)
            .is_err());
    }
}
