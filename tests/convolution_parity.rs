use lanebench::config::{EdgePolicy, KERNEL_LENGTH, SIGNAL_LENGTH, WINDOW_LEAD};
use lanebench::{
    BenchHarness, HarnessConfig, Kernel, ScalarKernels, SignalFrame, SignalKernel,
    VectorizedKernels,
};
use proptest::prelude::*;

/// Indices whose window lies entirely inside the signal.
fn in_bounds() -> std::ops::Range<usize> {
    WINDOW_LEAD..SIGNAL_LENGTH - (KERNEL_LENGTH - WINDOW_LEAD) + 1
}

#[test]
fn unit_kernel_on_flat_ten_is_ten() {
    let mut harness = BenchHarness::default();
    harness.load_input(&[10; SIGNAL_LENGTH]);
    for use_vectorized in [false, true] {
        let out = harness.convolve(use_vectorized).unwrap();
        for i in in_bounds() {
            assert_eq!(out[i], 10, "index {} on vectorized={}", i, use_vectorized);
        }
    }
}

#[test]
fn generated_signal_matches_on_every_policy() {
    for policy in [EdgePolicy::Adjacent, EdgePolicy::ZeroPad, EdgePolicy::Periodic] {
        let mut harness = BenchHarness::new(HarnessConfig::default().with_edge_policy(policy));
        harness.generate();
        harness.truncate(false);
        let scalar = harness.convolve(false).unwrap().to_vec();
        let vectorized = harness.convolve(true).unwrap().to_vec();
        // Both paths read the same halo, so even the edges agree.
        assert_eq!(scalar, vectorized, "policy {}", policy.name());
    }
}

#[test]
fn moving_average_of_ramp() {
    let mut signal = [0i8; SIGNAL_LENGTH];
    for (i, s) in signal.iter_mut().enumerate() {
        *s = (i % 64) as i8;
    }
    let mut harness = BenchHarness::default();
    harness.load_input(&signal);
    let out = harness.convolve(false).unwrap();
    // Window [92, 108) holds ramp values 28..=43.
    let expected: i32 = (92..108).map(|i| (i % 64) as i32).sum::<i32>() / 16;
    assert_eq!(out[100] as i32, expected);
}

proptest! {
    #[test]
    fn scalar_and_vectorized_agree_in_bounds(
        samples in proptest::collection::vec(any::<i8>(), SIGNAL_LENGTH),
        taps in proptest::array::uniform16(any::<i8>()),
    ) {
        let kernel = Kernel::from_taps(taps);
        prop_assume!(kernel.sum() != 0);
        let Some(v) = VectorizedKernels::detect() else {
            return Ok(());
        };
        let mut signal = [0i8; SIGNAL_LENGTH];
        signal.copy_from_slice(&samples);
        let mut frame = SignalFrame::new();
        frame.load(&signal);
        frame.fill_edges(EdgePolicy::ZeroPad, &kernel, &[]);

        let mut scalar = [0i8; SIGNAL_LENGTH];
        let mut vectorized = [0i8; SIGNAL_LENGTH];
        ScalarKernels.convolve(&frame, &kernel, &mut scalar).unwrap();
        v.convolve(&frame, &kernel, &mut vectorized).unwrap();
        for i in in_bounds() {
            prop_assert_eq!(scalar[i], vectorized[i], "index {}", i);
        }
    }
}
