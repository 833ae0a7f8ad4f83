//! # pagescan-watch
//!
//! Polling wrapper around `pagescan`: re-scans a process at a fixed
//! interval, writing pass N to `pagestat<N>.<pid>` in the current
//! directory, until the target process exits.
//!
//! Each pass is an independent invocation of the scanner; a failed pass
//! is reported and the loop keeps going.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "pagescan-watch",
    about = "Periodically dump VPN:PFN mappings of a process"
)]
struct Cli {
    /// Target process id
    pid: i32,
    /// Seconds to sleep between scan passes
    delay_seconds: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let scanner = scanner_path()?;
    let proc_dir = PathBuf::from(format!("/proc/{}", cli.pid));

    println!(
        "=== Watching pid {} (every {}s) ===",
        cli.pid, cli.delay_seconds
    );

    let mut seq: u64 = 1;
    loop {
        if !proc_dir.exists() {
            println!("pid {} exited, stopping after {} passes", cli.pid, seq - 1);
            return Ok(());
        }

        if let Err(err) = run_pass(&scanner, cli.pid, seq) {
            eprintln!("pass {seq} failed: {err:#}");
        }
        seq += 1;

        thread::sleep(Duration::from_secs(cli.delay_seconds));
    }
}

/// One wrapper tick: scan `pid` into `pagestat<seq>.<pid>`.
fn run_pass(scanner: &Path, pid: i32, seq: u64) -> Result<()> {
    let out_name = output_name(seq, pid);
    let out_file = File::create(&out_name).with_context(|| format!("creating {out_name}"))?;

    let status = Command::new(scanner)
        .arg(pid.to_string())
        .stdout(Stdio::from(out_file))
        .status()
        .with_context(|| format!("spawning {}", scanner.display()))?;

    if !status.success() {
        bail!("{} exited with {status}", scanner.display());
    }
    Ok(())
}

fn output_name(seq: u64, pid: i32) -> String {
    format!("pagestat{seq}.{pid}")
}

/// The core scanner lives next to this binary.
fn scanner_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating pagescan-watch")?;
    Ok(exe.with_file_name("pagescan"))
}
