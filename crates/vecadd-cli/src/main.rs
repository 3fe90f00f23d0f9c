//! vecadd-bench
//!
//! Benchmarks every vector-add kernel the CPU supports on one thread per
//! core, cross-checks each result against the scalar kernel, and prints the
//! mean run time per element.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use vecadd_cli::exit::{code_for, EXIT_FATAL};
use vecadd_cli::signal::install_interrupt_handler;
use vecadd_harness::{Harness, HarnessConfig, RunState};
use vecadd_kernels::KernelSet;

/// Multi-core vector-add kernel benchmark
#[derive(Parser)]
#[command(name = "vecadd-bench")]
#[command(about = "Benchmark and cross-check vector-add kernels on every core")]
#[command(long_about = r#"
Runs every available vector-add kernel on one thread per core over fresh
random inputs, checks each result against the scalar kernel, and prints the
mean run time per element for each kernel.

Examples:
  # Run until interrupted (Ctrl+C once to stop and print the summary)
  vecadd-bench

  # Stop each thread after iteration 5 (i=0..=5)
  vecadd-bench 5

Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostic logging on stderr.
"#)]
#[command(version)]
struct Cli {
    /// Outer iterations per thread; zero, negative or absent runs until interrupted
    #[arg(value_name = "ITERATIONS", allow_negative_numbers = true)]
    iterations: Option<i64>,

    /// Number of worker threads (default: one per core)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,

    /// Seed input generation for reproducible data
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    setup_logging();

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("Benchmark failed: {}", e);
            for cause in e.chain().skip(1) {
                error!("  Caused by: {}", cause);
            }
            EXIT_FATAL
        }
    };

    println!("exitCode={code}");
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = build_config(cli)?;
    info!(?config, "configuration");

    let kernels = KernelSet::detect();
    info!(kernels = ?kernels.names(), "kernels detected");

    let state = Arc::new(RunState::new());
    install_interrupt_handler(Arc::clone(&state))?;

    let summary = Harness::new(config, kernels)
        .run(state)
        .context("Benchmark run aborted")?;
    print!("{summary}");

    Ok(code_for(&summary))
}

fn build_config(cli: &Cli) -> Result<HarnessConfig> {
    let mut builder = HarnessConfig::builder().iteration_limit(cli.iterations.unwrap_or(0));
    if let Some(threads) = cli.threads {
        builder = builder.workers(threads);
    }
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    builder.build().context("Invalid configuration")
}

/// Logs go to stderr so stdout carries only the benchmark report.
fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
