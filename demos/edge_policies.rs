// demos/edge_policies.rs
use lanebench::config::SIGNAL_LENGTH;
use lanebench::{BenchHarness, EdgePolicy, HarnessConfig};

fn main() {
    let mut signal = [0i8; SIGNAL_LENGTH];
    for (i, s) in signal.iter_mut().enumerate() {
        *s = if i < SIGNAL_LENGTH / 2 { 40 } else { -40 };
    }

    for policy in [EdgePolicy::Adjacent, EdgePolicy::ZeroPad, EdgePolicy::Periodic] {
        let mut harness = BenchHarness::new(HarnessConfig::default().with_edge_policy(policy));
        harness.load_input(&signal);
        harness.truncate(false);
        let out = harness.convolve(false).expect("default kernel sums to 16");
        println!(
            "{:<9} head {:?}  tail {:?}",
            policy.name(),
            &out[..4],
            &out[SIGNAL_LENGTH - 4..]
        );
    }
}
