//! Scalar vs SIMD micro-benchmark harness for 8-bit signal truncation and
//! convolution.
//!
//! A [`BenchHarness`] owns every buffer: generate an input signal, run either
//! kernel on the scalar or vectorized path, then read back the result and the
//! elapsed time.
//!
//! ```no_run
//! use lanebench::BenchHarness;
//!
//! let mut harness = BenchHarness::default();
//! harness.generate();
//! let truncated = harness.truncate(true).to_vec();
//! println!("{} samples in {:.2} us", truncated.len(), harness.processing_time());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod harness;
#[doc(hidden)]
pub mod invariant_ppt;
pub mod kernels;
pub mod signal;

pub use config::{EdgePolicy, HarnessConfig};
pub use error::{KernelError, Result};
pub use harness::{timed, BenchHarness, Operation, TimingSummary};
pub use kernels::{ScalarKernels, SignalKernel, VectorizedKernels};
pub use signal::{Kernel, Signal, SignalFrame};
