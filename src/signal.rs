//! Signal buffers, the convolution kernel, and the noisy-sine generator.

use crate::config::{
    EdgePolicy, EDGE_HALO, KERNEL_LENGTH, NOISE_AMPLITUDE, SIGNAL_AMPLITUDE, SIGNAL_LENGTH,
    WINDOW_LEAD,
};
use rand::Rng;
use std::f64::consts::PI;

/// A fixed-length 8-bit signal.
pub type Signal = [i8; SIGNAL_LENGTH];

const FRAME_LENGTH: usize = EDGE_HALO + SIGNAL_LENGTH + EDGE_HALO;

/// Convolution taps. The sum is the normalization divisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    taps: [i8; KERNEL_LENGTH],
}

impl Kernel {
    /// Kernel with arbitrary taps. A zero sum is accepted here and rejected
    /// when the kernel is used for convolution.
    pub fn from_taps(taps: [i8; KERNEL_LENGTH]) -> Self {
        Self { taps }
    }

    pub fn taps(&self) -> &[i8; KERNEL_LENGTH] {
        &self.taps
    }

    /// Normalization divisor.
    pub fn sum(&self) -> i32 {
        crate::kernels::lane_sum(&self.taps)
    }
}

impl Default for Kernel {
    /// Moving-average kernel: every tap is 1.
    fn default() -> Self {
        Self {
            taps: [1; KERNEL_LENGTH],
        }
    }
}

/// The input signal surrounded by an `EDGE_HALO`-byte halo on each side.
///
/// Convolution windows centred near either end of the signal read into the
/// halo instead of past the end of a buffer. What the halo holds is decided by
/// [`EdgePolicy`] through [`SignalFrame::fill_edges`].
#[derive(Debug, Clone)]
pub struct SignalFrame {
    data: [i8; FRAME_LENGTH],
}

impl SignalFrame {
    pub fn new() -> Self {
        Self {
            data: [0; FRAME_LENGTH],
        }
    }

    /// The `SIGNAL_LENGTH` samples, without halo.
    pub fn samples(&self) -> &[i8] {
        &self.data[EDGE_HALO..EDGE_HALO + SIGNAL_LENGTH]
    }

    pub fn samples_mut(&mut self) -> &mut [i8] {
        &mut self.data[EDGE_HALO..EDGE_HALO + SIGNAL_LENGTH]
    }

    pub fn load(&mut self, signal: &Signal) {
        self.samples_mut().copy_from_slice(signal);
    }

    /// Copy of the samples as a fixed-size signal.
    pub fn to_signal(&self) -> Signal {
        let mut out = [0; SIGNAL_LENGTH];
        out.copy_from_slice(self.samples());
        out
    }

    /// `len` samples starting at `centre - KERNEL_LENGTH / 2`.
    ///
    /// Panics if `centre >= SIGNAL_LENGTH` or `len > TRANSFER_SIZE`; the halo
    /// widths are checked at compile time against both limits.
    #[inline]
    pub fn window(&self, centre: usize, len: usize) -> &[i8] {
        let start = EDGE_HALO + centre - WINDOW_LEAD;
        &self.data[start..start + len]
    }

    pub fn leading_halo(&self) -> &[i8] {
        &self.data[..EDGE_HALO]
    }

    pub fn trailing_halo(&self) -> &[i8] {
        &self.data[EDGE_HALO + SIGNAL_LENGTH..]
    }

    /// Rewrite both halos according to `policy`.
    ///
    /// `kernel` and `following` only matter for [`EdgePolicy::Adjacent`]: the
    /// kernel taps end where the signal starts, and `following` (the truncated
    /// signal) starts where the signal ends.
    pub fn fill_edges(&mut self, policy: EdgePolicy, kernel: &Kernel, following: &[i8]) {
        let (lead, rest) = self.data.split_at_mut(EDGE_HALO);
        let (body, trail) = rest.split_at_mut(SIGNAL_LENGTH);
        match policy {
            EdgePolicy::ZeroPad => {
                lead.fill(0);
                trail.fill(0);
            }
            EdgePolicy::Periodic => {
                lead.copy_from_slice(&body[SIGNAL_LENGTH - EDGE_HALO..]);
                trail.copy_from_slice(&body[..EDGE_HALO]);
            }
            EdgePolicy::Adjacent => {
                let taps = kernel.taps();
                let n = taps.len().min(EDGE_HALO);
                lead.fill(0);
                lead[EDGE_HALO - n..].copy_from_slice(&taps[taps.len() - n..]);
                trail.fill(0);
                let m = following.len().min(EDGE_HALO);
                trail[..m].copy_from_slice(&following[..m]);
            }
        }
    }
}

impl Default for SignalFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Narrow a generated sample: truncate toward zero, then keep the low 8 bits.
#[inline]
pub fn narrow_sample(value: f64) -> i8 {
    value as i32 as i8
}

/// Fill `out` with `SIGNAL_AMPLITUDE * sin(phase) + noise` from the thread RNG.
pub fn generate_signal(out: &mut Signal) {
    generate_signal_with(&mut rand::rng(), out);
}

/// Same as [`generate_signal`] with a caller-provided noise source.
pub fn generate_signal_with<R: Rng + ?Sized>(rng: &mut R, out: &mut Signal) {
    let phase_step = 2.0 * PI / SIGNAL_LENGTH as f64;
    for (i, sample) in out.iter_mut().enumerate() {
        let phase = i as f64 * phase_step;
        let noise = rng.random_range(0..NOISE_AMPLITUDE);
        *sample = narrow_sample(SIGNAL_AMPLITUDE as f64 * phase.sin() + noise as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_kernel_is_moving_average() {
        let kernel = Kernel::default();
        assert!(kernel.taps().iter().all(|&t| t == 1));
        assert_eq!(kernel.sum(), 16);
    }

    #[test]
    fn kernel_sum_handles_negative_taps() {
        let mut taps = [1; KERNEL_LENGTH];
        taps[..8].fill(-1);
        assert_eq!(Kernel::from_taps(taps).sum(), 0);
    }

    #[test]
    fn narrowing_wraps_and_truncates() {
        assert_eq!(narrow_sample(12.9), 12);
        assert_eq!(narrow_sample(-12.9), -12);
        assert_eq!(narrow_sample(130.0), -126);
        assert_eq!(narrow_sample(-129.0), 127);
    }

    #[test]
    fn generated_signal_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut signal = [0; SIGNAL_LENGTH];
        generate_signal_with(&mut rng, &mut signal);
        for &s in signal.iter() {
            let s = s as i32;
            assert!(s >= -SIGNAL_AMPLITUDE && s < SIGNAL_AMPLITUDE + NOISE_AMPLITUDE);
        }
        // First sample is pure noise on sin(0).
        assert!((0..NOISE_AMPLITUDE).contains(&(signal[0] as i32)));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let mut a = [0; SIGNAL_LENGTH];
        let mut b = [0; SIGNAL_LENGTH];
        generate_signal_with(&mut StdRng::seed_from_u64(42), &mut a);
        generate_signal_with(&mut StdRng::seed_from_u64(42), &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn window_reaches_into_halo() {
        let mut frame = SignalFrame::new();
        frame.load(&[5; SIGNAL_LENGTH]);
        frame.fill_edges(EdgePolicy::ZeroPad, &Kernel::default(), &[]);
        let w = frame.window(0, KERNEL_LENGTH);
        assert_eq!(&w[..WINDOW_LEAD], &[0; WINDOW_LEAD]);
        assert!(w[WINDOW_LEAD..].iter().all(|&s| s == 5));
    }

    #[test]
    fn periodic_halo_wraps() {
        let mut signal = [0i8; SIGNAL_LENGTH];
        for (i, s) in signal.iter_mut().enumerate() {
            *s = (i % 100) as i8;
        }
        let mut frame = SignalFrame::new();
        frame.load(&signal);
        frame.fill_edges(EdgePolicy::Periodic, &Kernel::default(), &[]);
        assert_eq!(frame.leading_halo(), &signal[SIGNAL_LENGTH - EDGE_HALO..]);
        assert_eq!(frame.trailing_halo(), &signal[..EDGE_HALO]);
    }

    #[test]
    fn adjacent_halo_mirrors_reference_layout() {
        let mut taps = [0i8; KERNEL_LENGTH];
        for (i, t) in taps.iter_mut().enumerate() {
            *t = i as i8 + 1;
        }
        let following = [-3i8; SIGNAL_LENGTH];
        let mut frame = SignalFrame::new();
        frame.fill_edges(EdgePolicy::Adjacent, &Kernel::from_taps(taps), &following);
        assert_eq!(&frame.leading_halo()[EDGE_HALO - KERNEL_LENGTH..], &taps[..]);
        assert!(frame.trailing_halo().iter().all(|&s| s == -3));
    }

    #[test]
    fn to_signal_copies_samples_only() {
        let mut frame = SignalFrame::new();
        frame.load(&[9; SIGNAL_LENGTH]);
        frame.fill_edges(EdgePolicy::Adjacent, &Kernel::default(), &[1; SIGNAL_LENGTH]);
        assert_eq!(frame.to_signal(), [9; SIGNAL_LENGTH]);
    }
}
