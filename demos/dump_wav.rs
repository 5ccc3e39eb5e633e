// demos/dump_wav.rs
use lanebench::export::write_wav;
use lanebench::BenchHarness;

fn main() {
    let mut harness = BenchHarness::default();
    harness.generate();
    write_wav("input.wav", harness.input()).unwrap();

    let truncated = harness.truncate(true).to_vec();
    write_wav("truncate.wav", &truncated).unwrap();

    let convolved = harness.convolve(true).unwrap().to_vec();
    write_wav("convolve.wav", &convolved).unwrap();

    println!("Wrote input.wav, truncate.wav and convolve.wav (8-bit mono)");
}
