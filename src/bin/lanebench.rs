//! Command-line host for the benchmark harness.
//!
//! Generates a signal, runs the requested kernels on the requested paths and
//! prints the processing time of each run.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lanebench::{export, BenchHarness, EdgePolicy, HarnessConfig, Operation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Scalar vs SIMD truncation and convolution benchmark
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Kernel to run
    #[arg(long, value_enum, default_value_t = OpArg::All)]
    op: OpArg,
    /// Code path to run
    #[arg(long, value_enum, default_value_t = PathArg::Both)]
    path: PathArg,
    /// What the convolution window reads past either end of the signal
    #[arg(long, value_enum, env = "LANEBENCH_EDGE", default_value_t = EdgeArg::Adjacent)]
    edge: EdgeArg,
    /// Timed repetitions per kernel and path (1 prints a single run)
    #[arg(short = 'n', long, env = "LANEBENCH_ITERATIONS", default_value_t = 1)]
    iterations: usize,
    /// Seed for the noise source (unseeded when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Directory to write input/truncate/convolve buffers as WAV files
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OpArg {
    Truncate,
    Convolve,
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PathArg {
    Scalar,
    Vectorized,
    Both,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EdgeArg {
    Adjacent,
    ZeroPad,
    Periodic,
}

impl From<EdgeArg> for EdgePolicy {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::Adjacent => EdgePolicy::Adjacent,
            EdgeArg::ZeroPad => EdgePolicy::ZeroPad,
            EdgeArg::Periodic => EdgePolicy::Periodic,
        }
    }
}

impl OpArg {
    fn operations(self) -> &'static [Operation] {
        match self {
            OpArg::Truncate => &[Operation::Truncate],
            OpArg::Convolve => &[Operation::Convolve],
            OpArg::All => &[Operation::Truncate, Operation::Convolve],
        }
    }
}

impl PathArg {
    fn flags(self) -> &'static [bool] {
        match self {
            PathArg::Scalar => &[false],
            PathArg::Vectorized => &[true],
            PathArg::Both => &[false, true],
        }
    }
}

fn run_once(harness: &mut BenchHarness, op: Operation, use_vectorized: bool) -> anyhow::Result<Vec<i8>> {
    let out = match op {
        Operation::Truncate => harness.truncate(use_vectorized).to_vec(),
        Operation::Convolve => harness
            .convolve(use_vectorized)
            .context("convolution failed")?
            .to_vec(),
    };
    Ok(out)
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lanebench=info")))
        .init();

    let config = HarnessConfig::default().with_edge_policy(args.edge.into());
    let mut harness = BenchHarness::new(config);
    info!(
        signal_length = BenchHarness::signal_length(),
        vectorized = harness.vectorized_available(),
        "harness ready"
    );

    match args.seed {
        Some(seed) => harness.generate_with(&mut StdRng::seed_from_u64(seed)),
        None => harness.generate(),
    };

    if let Some(dir) = &args.dump_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        export::write_wav(dir.join("input.wav"), harness.input())?;
    }

    for &op in args.op.operations() {
        let mut outputs = Vec::new();
        for &use_vectorized in args.path.flags() {
            let backend = harness.backend_name(use_vectorized);
            if args.iterations > 1 {
                let summary = harness.profile(op, use_vectorized, args.iterations)?;
                println!(
                    "{:<9} {:<7} min {:>9.2} us  mean {:>9.2} us  max {:>9.2} us  ({} runs)",
                    op.name(),
                    backend,
                    summary.min_us,
                    summary.mean_us,
                    summary.max_us,
                    summary.iterations
                );
                outputs.push(match op {
                    Operation::Truncate => harness.truncated().to_vec(),
                    Operation::Convolve => harness.convolved().to_vec(),
                });
            } else {
                outputs.push(run_once(&mut harness, op, use_vectorized)?);
                println!(
                    "{:<9} {:<7} Processing time = {:.2} us",
                    op.name(),
                    backend,
                    harness.processing_time()
                );
            }
        }

        if let [scalar, vectorized] = outputs.as_slice() {
            let mismatches = scalar.iter().zip(vectorized).filter(|(a, b)| a != b).count();
            println!("{:<9} parity  {} of {} samples differ", op.name(), mismatches, scalar.len());
        }

        if let (Some(dir), Some(last)) = (&args.dump_dir, outputs.last()) {
            export::write_wav(dir.join(format!("{}.wav", op.name())), last)?;
        }
    }

    Ok(())
}
