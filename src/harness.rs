//! Bench Harness: owns the buffers, dispatches kernels, and times each run.

use crate::config::{EdgePolicy, HarnessConfig, EDGE_HALO, SIGNAL_LENGTH, TRANSFER_SIZE};
use crate::error::{KernelError, Result};
use crate::invariant_ppt::{
    assert_invariant, BACKEND_RESOLVED, EDGE_POLICY_APPLIED, KERNEL_SUM_NONZERO,
    LANE_ALIGNED_STRIDE, TIMING_FINITE,
};
use crate::kernels::{ScalarKernels, SignalKernel, VectorizedKernels};
use crate::signal::{generate_signal, generate_signal_with, Kernel, Signal, SignalFrame};
use rand::Rng;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

/// Which kernel a timed run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Truncate,
    Convolve,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Truncate => "truncate",
            Operation::Convolve => "convolve",
        }
    }
}

/// Aggregate of repeated timed runs, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    pub iterations: usize,
    pub min_us: f64,
    pub mean_us: f64,
    pub max_us: f64,
}

/// Run `invocation` between two monotonic timestamps.
///
/// Returns its result and the elapsed time in microseconds.
pub fn timed<R>(invocation: impl FnOnce() -> R) -> (R, f64) {
    let start = Instant::now();
    let result = invocation();
    let elapsed = start.elapsed();
    (result, elapsed.as_nanos() as f64 / 1_000.0)
}

/// Harness for one benchmark session: input signal, result buffers, and the
/// most recent processing time.
pub struct BenchHarness {
    config: HarnessConfig,
    scalar: ScalarKernels,
    vectorized: Option<VectorizedKernels>,
    input: SignalFrame,
    truncated: Signal,
    convolved: Signal,
    processing_time_us: f64,
}

fn pick<'a>(
    scalar: &'a ScalarKernels,
    vectorized: Option<&'a VectorizedKernels>,
    use_vectorized: bool,
) -> &'a dyn SignalKernel {
    match vectorized {
        Some(v) if use_vectorized => v as &dyn SignalKernel,
        _ => scalar,
    }
}

impl BenchHarness {
    /// Create a harness and resolve the vectorized backend for this CPU.
    pub fn new(config: HarnessConfig) -> Self {
        let vectorized = VectorizedKernels::detect();
        assert_invariant(
            BACKEND_RESOLVED,
            vectorized.is_none() || cfg!(feature = "simd"),
            "vectorized backend resolved without the simd feature",
            None,
        );
        assert_invariant(
            LANE_ALIGNED_STRIDE,
            SIGNAL_LENGTH % TRANSFER_SIZE == 0,
            "signal length is not a whole number of lane steps",
            None,
        );
        match &vectorized {
            Some(v) => info!(
                backend = v.name(),
                edge_policy = config.edge_policy.name(),
                "vectorized kernels available"
            ),
            None => info!(
                edge_policy = config.edge_policy.name(),
                "no vectorized kernels; all runs use scalar"
            ),
        }
        Self {
            config,
            scalar: ScalarKernels,
            vectorized,
            input: SignalFrame::new(),
            truncated: [0; SIGNAL_LENGTH],
            convolved: [0; SIGNAL_LENGTH],
            processing_time_us: 0.0,
        }
    }

    /// Drop the vectorized backend so every request runs scalar.
    pub fn without_vectorized(mut self) -> Self {
        self.vectorized = None;
        self
    }

    pub const fn signal_length() -> usize {
        SIGNAL_LENGTH
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn set_kernel(&mut self, kernel: Kernel) {
        self.config.kernel = kernel;
    }

    pub fn set_edge_policy(&mut self, edge_policy: EdgePolicy) {
        self.config.edge_policy = edge_policy;
    }

    pub fn vectorized_available(&self) -> bool {
        self.vectorized.is_some()
    }

    /// Name of the backend a request with this flag actually runs.
    pub fn backend_name(&self, use_vectorized: bool) -> &'static str {
        pick(&self.scalar, self.vectorized.as_ref(), use_vectorized).name()
    }

    /// Overwrite the input with a fresh noisy sine.
    pub fn generate(&mut self) -> &[i8] {
        let mut signal = [0; SIGNAL_LENGTH];
        generate_signal(&mut signal);
        self.input.load(&signal);
        self.input.samples()
    }

    /// [`generate`](Self::generate) with a caller-provided noise source.
    pub fn generate_with<R: Rng>(&mut self, rng: &mut R) -> &[i8] {
        let mut signal = [0; SIGNAL_LENGTH];
        generate_signal_with(rng, &mut signal);
        self.input.load(&signal);
        self.input.samples()
    }

    /// Replace the input with known samples.
    pub fn load_input(&mut self, signal: &Signal) {
        self.input.load(signal);
    }

    pub fn input(&self) -> &[i8] {
        self.input.samples()
    }

    pub fn truncated(&self) -> &[i8] {
        &self.truncated
    }

    pub fn convolved(&self) -> &[i8] {
        &self.convolved
    }

    /// Microseconds taken by the most recent truncate or convolve call.
    pub fn processing_time(&self) -> f64 {
        self.processing_time_us
    }

    /// Timed truncation of the input into the truncated buffer.
    pub fn truncate(&mut self, use_vectorized: bool) -> &[i8] {
        self.note_fallback(use_vectorized);
        let backend = pick(&self.scalar, self.vectorized.as_ref(), use_vectorized);
        let name = backend.name();
        let input = self.input.samples();
        let output = &mut self.truncated;
        let ((), elapsed) = timed(|| backend.truncate(input, output));
        self.record(Operation::Truncate, name, elapsed);
        &self.truncated
    }

    /// Timed convolution of the input with the configured kernel.
    ///
    /// Fails without touching any buffer if the kernel sums to zero.
    pub fn convolve(&mut self, use_vectorized: bool) -> Result<&[i8]> {
        let kernel_sum = self.config.kernel.sum();
        if kernel_sum == 0 {
            warn!("convolution refused: kernel taps sum to zero");
            return Err(KernelError::ZeroKernelSum);
        }
        assert_invariant(KERNEL_SUM_NONZERO, kernel_sum != 0, "kernel sum", None);

        let policy = self.config.edge_policy;
        self.input.fill_edges(policy, &self.config.kernel, &self.truncated);
        assert_invariant(
            EDGE_POLICY_APPLIED,
            halo_matches(&self.input, policy, &self.config.kernel, &self.truncated),
            "halo does not reflect the edge policy",
            Some(policy.name()),
        );

        self.note_fallback(use_vectorized);
        let backend = pick(&self.scalar, self.vectorized.as_ref(), use_vectorized);
        let name = backend.name();
        let frame = &self.input;
        let kernel = &self.config.kernel;
        let output = &mut self.convolved;
        let (result, elapsed) = timed(|| backend.convolve(frame, kernel, output));
        result?;
        self.record(Operation::Convolve, name, elapsed);
        Ok(&self.convolved)
    }

    /// Run `op` `iterations` times and summarize the timings.
    ///
    /// `processing_time` afterwards holds the last run only.
    pub fn profile(
        &mut self,
        op: Operation,
        use_vectorized: bool,
        iterations: usize,
    ) -> Result<TimingSummary> {
        if iterations == 0 {
            return Err(KernelError::NoIterations);
        }
        let mut min_us = f64::INFINITY;
        let mut max_us = 0.0f64;
        let mut total_us = 0.0;
        for _ in 0..iterations {
            match op {
                Operation::Truncate => {
                    self.truncate(use_vectorized);
                }
                Operation::Convolve => {
                    self.convolve(use_vectorized)?;
                }
            }
            let t = self.processing_time_us;
            min_us = min_us.min(t);
            max_us = max_us.max(t);
            total_us += t;
        }
        let summary = TimingSummary {
            iterations,
            min_us,
            mean_us: total_us / iterations as f64,
            max_us,
        };
        debug!(
            op = op.name(),
            backend = self.backend_name(use_vectorized),
            iterations,
            mean_us = summary.mean_us,
            "profile finished"
        );
        Ok(summary)
    }

    fn note_fallback(&self, use_vectorized: bool) {
        if use_vectorized && self.vectorized.is_none() {
            debug!("vectorized path requested but unavailable; running scalar");
        }
    }

    fn record(&mut self, op: Operation, backend: &'static str, elapsed_us: f64) {
        assert_invariant(
            TIMING_FINITE,
            elapsed_us.is_finite() && elapsed_us >= 0.0,
            "elapsed time must be finite and non-negative",
            Some(op.name()),
        );
        self.processing_time_us = elapsed_us;
        trace!(op = op.name(), backend, elapsed_us, "timed run");
    }
}

impl Default for BenchHarness {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

fn halo_matches(frame: &SignalFrame, policy: EdgePolicy, kernel: &Kernel, following: &[i8]) -> bool {
    let lead = frame.leading_halo();
    let trail = frame.trailing_halo();
    match policy {
        EdgePolicy::ZeroPad => lead.iter().chain(trail).all(|&s| s == 0),
        EdgePolicy::Periodic => {
            let samples = frame.samples();
            lead == &samples[SIGNAL_LENGTH - EDGE_HALO..] && trail == &samples[..EDGE_HALO]
        }
        EdgePolicy::Adjacent => {
            let taps = kernel.taps();
            let n = taps.len().min(EDGE_HALO);
            let m = following.len().min(EDGE_HALO);
            lead[EDGE_HALO - n..] == taps[taps.len() - n..] && trail[..m] == following[..m]
        }
    }
}
