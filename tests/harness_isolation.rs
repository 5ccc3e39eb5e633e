use lanebench::config::SIGNAL_LENGTH;
use lanebench::{BenchHarness, Kernel};
use std::thread;

#[test]
fn harnesses_do_not_share_buffers() {
    let mut a = BenchHarness::default();
    let mut b = BenchHarness::default();
    a.load_input(&[70; SIGNAL_LENGTH]);
    b.load_input(&[-5; SIGNAL_LENGTH]);
    a.truncate(false);
    b.truncate(false);
    assert!(a.truncated().iter().all(|&s| s == 50));
    assert!(b.truncated().iter().all(|&s| s == -5));

    b.set_kernel(Kernel::from_taps([2; 16]));
    a.convolve(false).unwrap();
    b.convolve(false).unwrap();
    assert_eq!(a.config().kernel, Kernel::default());
    assert_ne!(a.convolved(), b.convolved());
}

#[test]
fn parallel_harnesses_produce_identical_results() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let mut harness = BenchHarness::default();
                harness.load_input(&[12; SIGNAL_LENGTH]);
                harness.truncate(true);
                harness.convolve(true).unwrap().to_vec()
            })
        })
        .collect();
    let results: Vec<Vec<i8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for r in &results[1..] {
        assert_eq!(r, &results[0]);
    }
}
