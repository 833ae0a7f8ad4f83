//! One scan pass: read ranges, resolve each range, emit the report.

use std::io::Write;

use crate::error::ScanError;
use crate::maps::MapRanges;
use crate::report;
use crate::resolve::Pagemap;

/// Fallback when sysconf cannot answer.
const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Platform page size in bytes.
pub fn page_size() -> u64 {
    let n = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if n > 0 {
        n as u64
    } else {
        DEFAULT_PAGE_SIZE
    }
}

/// Run one full scan pass for `pid`, writing the report to `out`.
///
/// Fatal I/O errors propagate to the caller; malformed maps lines and
/// range-cap truncation only produce stderr diagnostics.
pub fn scan_process<W: Write>(pid: i32, out: &mut W) -> Result<(), ScanError> {
    let page_size = page_size();
    let ranges = MapRanges::load(pid, page_size)?;
    if ranges.truncated() {
        eprintln!(
            "too many ranges for pid {pid}, scanning the first {} only",
            ranges.len()
        );
    }

    let mut pagemap = Pagemap::open(pid)?;

    report::write_begin(out)?;
    for range in ranges.iter() {
        // The entry buffer lives for one range only.
        let mappings = pagemap.resolve_range(range)?;
        report::write_mappings(out, &mappings)?;
    }
    report::write_end(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_a_nonzero_power_of_two() {
        assert!(page_size().is_power_of_two());
    }
}
