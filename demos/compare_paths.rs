// demos/compare_paths.rs
use lanebench::{BenchHarness, Operation};

fn main() {
    let mut harness = BenchHarness::default();
    harness.generate();
    if !harness.vectorized_available() {
        println!("No vectorized kernels on this CPU; both columns run scalar.");
    }

    for op in [Operation::Truncate, Operation::Convolve] {
        let scalar = harness.profile(op, false, 200).expect("scalar profile");
        let vectorized = harness.profile(op, true, 200).expect("vectorized profile");
        println!(
            "{:<9} scalar {:>8.2} us   {} {:>8.2} us   speedup {:.1}x",
            op.name(),
            scalar.mean_us,
            harness.backend_name(true),
            vectorized.mean_us,
            scalar.mean_us / vectorized.mean_us.max(f64::EPSILON)
        );
    }
}
