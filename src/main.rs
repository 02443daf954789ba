use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
    thread,
};

use anyhow::{Context, Result};
use clap::Parser;
use mtklog::{
    avec::decode_file,
    sans::check::{AcceptAll, Checksum, StarXor},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mtklog", about = "Decode an MTK GPS logger binary log into a text report")]
struct Cli {
    /// Path to the binary log.
    input: PathBuf,
    /// Path to the text report.
    #[arg(default_value = "LOG.TXT")]
    output: PathBuf,
    /// Number of sectors decoded in parallel (defaults to available cores).
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Skip data records whose `*` and XOR checksum trailer does not verify.
    #[arg(long)]
    verify: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run() {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    File::open(&cli.input)
        .with_context(|| format!("failed to open input file {}", cli.input.display()))?;

    let out = File::create(&cli.output)
        .with_context(|| format!("failed to open output file {}", cli.output.display()))?;
    let mut out = BufWriter::new(out);

    let jobs = cli
        .jobs
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, |n| n.get()));

    let check: &(dyn Checksum + Sync) = if cli.verify { &StarXor } else { &AcceptAll };

    let outcomes = decode_file(&cli.input, jobs, check)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    for outcome in outcomes {
        out.write_all(outcome.report.as_bytes())?;

        match outcome.result {
            Ok(_) => println!("Parsing sector #{:<3}.......OK", outcome.index),
            Err(err) => println!("Parsing sector #{:<3}.......SKIPPED ({err})", outcome.index),
        }
    }

    out.flush()
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    Ok(())
}
