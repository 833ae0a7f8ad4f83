//! # pagescan
//!
//! Dump the virtual-to-physical page mappings of a running process.
//!
//! ## Usage
//!
//! ```bash
//! pagescan <pid>                 # One scan pass, report on stdout
//! pagescan-watch <pid> <delay>   # Re-scan every <delay> seconds
//! ```
//!
//! Needs read access to `/proc/<pid>/maps` and `/proc/<pid>/pagemap`;
//! recent kernels only expose frame numbers to CAP_SYS_ADMIN readers.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "pagescan", about = "Dump VPN:PFN mappings of a process")]
struct Cli {
    /// Target process id
    pid: i32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    pagemap::scan_process(cli.pid, &mut out)
        .with_context(|| format!("scanning pid {}", cli.pid))?;
    out.flush()?;
    Ok(())
}
