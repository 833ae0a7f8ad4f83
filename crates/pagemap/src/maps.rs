//! `/proc/<pid>/maps` parsing into page-granularity ranges.
//!
//! Each accepted record contributes one [`VmaRange`], in document order.
//! Records that do not match the expected minimum field layout are skipped
//! with a diagnostic; they never abort the scan.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::ScanError;

/// Hard cap on ranges taken from one maps description.
pub const MAX_RANGES: usize = 10240;

/// One mapped region, converted to page numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VmaRange {
    /// First page of the region.
    pub start_page: u64,
    /// One past the last page of the region.
    pub end_page: u64,
}

impl VmaRange {
    /// Number of pages covered.
    pub fn pages(&self) -> u64 {
        self.end_page - self.start_page
    }
}

/// Ordered ranges for one scan pass.
#[derive(Debug)]
pub struct MapRanges {
    ranges: Vec<VmaRange>,
    truncated: bool,
    skipped: usize,
}

impl MapRanges {
    /// Read and parse `/proc/<pid>/maps`.
    ///
    /// Open failure is fatal (target exited, permission denied, bad pid);
    /// malformed lines are only skipped.
    pub fn load(pid: i32, page_size: u64) -> Result<Self, ScanError> {
        let path = format!("/proc/{pid}/maps");
        let file = File::open(path).map_err(|source| ScanError::OpenMaps { pid, source })?;
        Self::parse(BufReader::new(file), pid, page_size)
    }

    /// Parse a maps description from any line source.
    pub fn parse<R: BufRead>(reader: R, pid: i32, page_size: u64) -> Result<Self, ScanError> {
        let mut ranges = Vec::new();
        let mut truncated = false;
        let mut skipped = 0;

        for line in reader.lines() {
            let line = line.map_err(|source| ScanError::ReadMaps { pid, source })?;
            let Some((vm_start, vm_end)) = parse_record(&line) else {
                eprintln!("unexpected maps line: {line}");
                skipped += 1;
                continue;
            };
            ranges.push(VmaRange {
                start_page: vm_start / page_size,
                end_page: vm_end / page_size,
            });
            if ranges.len() >= MAX_RANGES {
                truncated = true;
                break;
            }
        }

        Ok(Self {
            ranges,
            truncated,
            skipped,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &VmaRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// True when the [`MAX_RANGES`] cap cut the description short.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Number of malformed lines that were skipped.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Parse one maps record into its byte-addressed bounds.
///
/// The minimum layout is `start-end perms offset major:minor inode`, with
/// an optional pathname after the inode. `None` means the record does not
/// match and should be skipped.
fn parse_record(line: &str) -> Option<(u64, u64)> {
    let mut fields = line.split_whitespace();

    let (start, end) = fields.next()?.split_once('-')?;
    let vm_start = u64::from_str_radix(start, 16).ok()?;
    let vm_end = u64::from_str_radix(end, 16).ok()?;
    if vm_end < vm_start {
        return None;
    }

    // Permission flags are always four characters, e.g. "r-xp".
    if fields.next()?.chars().count() != 4 {
        return None;
    }

    if u64::from_str_radix(fields.next()?, 16).is_err() {
        return None;
    }

    let (major, minor) = fields.next()?.split_once(':')?;
    if u32::from_str_radix(major, 16).is_err() || u32::from_str_radix(minor, 16).is_err() {
        return None;
    }

    if fields.next()?.parse::<u64>().is_err() {
        return None;
    }

    Some((vm_start, vm_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PAGE: u64 = 4096;

    fn parse(input: &str) -> MapRanges {
        MapRanges::parse(Cursor::new(input.to_owned()), 1, PAGE).expect("parse maps")
    }

    #[test]
    fn well_formed_record_becomes_one_range() {
        let ranges = parse("00400000-00401000 r-xp 00000000 08:01 123 /bin/x\n");
        assert_eq!(ranges.len(), 1);
        let range = ranges.iter().next().expect("one range");
        assert_eq!(
            *range,
            VmaRange {
                start_page: 0x400,
                end_page: 0x401
            }
        );
        assert_eq!(range.pages(), 1);
    }

    #[test]
    fn pathless_record_is_accepted() {
        let ranges = parse("7ffd1000-7ffd3000 rw-p 00000000 00:00 0\n");
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges.skipped(), 0);
    }

    #[test]
    fn short_record_is_skipped() {
        let input = "00400000-00401000 r-xp\n00600000-00601000 rw-p 00000000 08:01 124\n";
        let ranges = parse(input);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges.skipped(), 1);
        assert_eq!(ranges.iter().next().map(|r| r.start_page), Some(0x600));
    }

    #[test]
    fn garbage_fields_are_skipped() {
        let ranges = parse("zzz-yyy r-xp 00000000 08:01 123\n");
        assert!(ranges.is_empty());
        assert_eq!(ranges.skipped(), 1);
    }

    #[test]
    fn inverted_bounds_are_skipped() {
        let ranges = parse("00401000-00400000 r-xp 00000000 08:01 123\n");
        assert!(ranges.is_empty());
        assert_eq!(ranges.skipped(), 1);
    }

    #[test]
    fn document_order_is_preserved() {
        let ranges = parse(
            "00600000-00601000 rw-p 00000000 08:01 124 /bin/x\n\
             00400000-00401000 r-xp 00000000 08:01 123 /bin/x\n",
        );
        let starts: Vec<u64> = ranges.iter().map(|r| r.start_page).collect();
        assert_eq!(starts, vec![0x600, 0x400]);
    }

    #[test]
    fn unaligned_bounds_floor_to_page_numbers() {
        let ranges = parse("00400123-00401fff rw-p 00000000 00:00 0\n");
        let range = ranges.iter().next().expect("one range");
        assert_eq!(range.start_page, 0x400);
        assert_eq!(range.end_page, 0x401);
    }

    #[test]
    fn range_cap_truncates_without_failing() {
        let mut input = String::new();
        for i in 0..(MAX_RANGES + 5) {
            let start = (i as u64 + 1) * 0x1000;
            input.push_str(&format!(
                "{:x}-{:x} rw-p 00000000 00:00 0\n",
                start,
                start + 0x1000
            ));
        }
        let ranges = parse(&input);
        assert_eq!(ranges.len(), MAX_RANGES);
        assert!(ranges.truncated());
    }
}
