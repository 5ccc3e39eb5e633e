// demos/basic_run.rs
use lanebench::BenchHarness;

fn main() {
    let mut harness = BenchHarness::default();
    let input = harness.generate().to_vec();
    println!("Generated {} samples, first {:?}", input.len(), &input[..8]);

    let truncated = harness.truncate(true).to_vec();
    println!(
        "Truncate ({}): first {:?}, Processing time = {:.2} us",
        harness.backend_name(true),
        &truncated[..8],
        harness.processing_time()
    );

    match harness.convolve(true) {
        Ok(out) => println!("Convolve: first {:?}", &out[..8]),
        Err(e) => eprintln!("Convolve failed: {}", e),
    }
    println!("Processing time = {:.2} us", harness.processing_time());
}
