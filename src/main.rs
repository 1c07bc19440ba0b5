//! Case-file test driver CLI
//!
//! Runs one or more case files against the core and prints per-case
//! results plus per-file and total summaries. Exit status is zero iff
//! every checked assertion passed.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use emu86::runner::{Report, Runner};

/// Run 8086 instruction test cases against the emulator core.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Case files (plain text, or gzip-compressed with a .gz suffix)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Only print failures and the summaries
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    let mut runner = Runner::new();
    let mut total = Report::new("Total");
    total.quiet = args.quiet;
    let mut reports = Vec::new();

    for path in &args.files {
        let mut report = Report::new(&path.display().to_string());
        report.quiet = args.quiet;
        runner
            .run_file(path, &mut report)
            .with_context(|| format!("running {}", path.display()))?;
        total.aggregate(&report);
        reports.push(report);
    }

    println!();
    for report in reports.iter().filter(|r| r.has_failures()) {
        report.print_summary();
    }
    total.print_summary();

    Ok(!total.has_failures())
}
