//! Compile-time constants and run-time harness configuration.

use crate::signal::Kernel;

/// Number of samples in every signal buffer.
pub const SIGNAL_LENGTH: usize = 1024;

/// Peak amplitude of the generated sinusoid.
pub const SIGNAL_AMPLITUDE: i32 = 100;

/// Exclusive upper bound of the uniform noise added to each sample.
pub const NOISE_AMPLITUDE: i32 = 25;

/// Number of taps in the convolution kernel.
pub const KERNEL_LENGTH: usize = 16;

/// Lanes processed per vector step (one 128-bit register of `i8`).
pub const TRANSFER_SIZE: usize = 16;

/// Truncation ceiling.
pub const THRESHOLD: i8 = 50;

/// Samples before the window centre: `-KERNEL_LENGTH / 2` as a positive count.
pub const WINDOW_LEAD: usize = KERNEL_LENGTH / 2;

/// Halo bytes kept on each side of the signal in a [`SignalFrame`](crate::signal::SignalFrame).
pub const EDGE_HALO: usize = TRANSFER_SIZE;

/// Sample rate written into exported WAV headers.
pub const EXPORT_SAMPLE_RATE: u32 = 8_000;

const _: () = assert!(KERNEL_LENGTH <= TRANSFER_SIZE);
const _: () = assert!(SIGNAL_LENGTH % TRANSFER_SIZE == 0);
const _: () = assert!(EDGE_HALO >= WINDOW_LEAD);
const _: () = assert!(EDGE_HALO >= TRANSFER_SIZE - WINDOW_LEAD);
const _: () = assert!(SIGNAL_LENGTH >= EDGE_HALO);
const _: () = assert!(SIGNAL_AMPLITUDE + NOISE_AMPLITUDE <= i8::MAX as i32 + 1);

/// What the convolution window sees outside `[0, SIGNAL_LENGTH)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// Reproduces the reference memory layout: the kernel taps precede the
    /// signal and the truncated signal follows it. Inherited behaviour, not a
    /// correct convolution near the edges.
    #[default]
    Adjacent,
    /// Samples outside the signal read as zero.
    ZeroPad,
    /// The signal wraps around.
    Periodic,
}

impl EdgePolicy {
    pub fn name(self) -> &'static str {
        match self {
            EdgePolicy::Adjacent => "adjacent",
            EdgePolicy::ZeroPad => "zero-pad",
            EdgePolicy::Periodic => "periodic",
        }
    }
}

/// Run-time settings for a [`BenchHarness`](crate::harness::BenchHarness).
#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    pub edge_policy: EdgePolicy,
    pub kernel: Kernel,
}

impl HarnessConfig {
    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn with_kernel(mut self, kernel: Kernel) -> Self {
        self.kernel = kernel;
        self
    }
}
