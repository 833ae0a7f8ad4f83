//! Frame resolution against the `/proc/<pid>/pagemap` channel.
//!
//! pagemap is a random-access file of one 64-bit word per virtual page.
//! Resolving a range is one indexed bulk read: seek to the range's start
//! page, read one word per page, decode each returned word in order.
//! Filtering unmapped pages is left to the report layer.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::entry::PagemapEntry;
use crate::error::ScanError;
use crate::maps::VmaRange;

/// Bytes per pagemap word.
const ENTRY_BYTES: u64 = 8;

/// One resolved page: virtual page number and physical frame number.
///
/// `pfn` is 0 for pages without physical backing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMapping {
    pub vpn: u64,
    pub pfn: u64,
}

/// Open pagemap channel for one target process.
///
/// Held for the whole scan pass and released when dropped, on fatal paths
/// included.
#[derive(Debug)]
pub struct Pagemap {
    file: File,
}

impl Pagemap {
    /// Open `/proc/<pid>/pagemap`.
    pub fn open(pid: i32) -> Result<Self, ScanError> {
        let path = format!("/proc/{pid}/pagemap");
        let file = File::open(path).map_err(|source| ScanError::OpenPagemap { pid, source })?;
        Ok(Self { file })
    }

    /// Resolve the pages of `range`, in order.
    ///
    /// Exactly one bulk read against the channel; a seek or read failure
    /// is fatal, typically because the target exited mid-scan. Any retry
    /// belongs to the polling wrapper, not here. The channel may return
    /// fewer words than requested (ranges past the task size read as
    /// empty); only returned words are resolved.
    pub fn resolve_range(&mut self, range: &VmaRange) -> Result<Vec<PageMapping>, ScanError> {
        let entries = read_entries(&mut self.file, range.start_page, range.pages())?;
        Ok(resolve_entries(range.start_page, &entries))
    }
}

/// Bulk-read up to `count` raw words starting at word index `start_page`.
///
/// A read that ends mid-word is fatal; ending early on a word boundary
/// just yields fewer words. Generic over the channel so the decode path
/// can be exercised against in-memory buffers.
pub fn read_entries<C: Read + Seek>(
    channel: &mut C,
    start_page: u64,
    count: u64,
) -> Result<Vec<PagemapEntry>, ScanError> {
    let offset = start_page
        .checked_mul(ENTRY_BYTES)
        .ok_or(ScanError::IndexOverflow { page: start_page })?;
    let bytes = count
        .checked_mul(ENTRY_BYTES)
        .ok_or(ScanError::IndexOverflow { page: start_page })?;

    channel
        .seek(SeekFrom::Start(offset))
        .map_err(|source| ScanError::SeekPagemap {
            page: start_page,
            source,
        })?;

    let mut buf = vec![0u8; bytes as usize];
    let mut filled = 0;
    while filled < buf.len() {
        match channel.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(source) => {
                return Err(ScanError::ReadPagemap {
                    page: start_page,
                    pages: count,
                    source,
                })
            }
        }
    }
    if filled as u64 % ENTRY_BYTES != 0 {
        return Err(ScanError::PartialRead {
            page: start_page,
            bytes: filled,
        });
    }
    buf.truncate(filled);

    Ok(buf
        .chunks_exact(ENTRY_BYTES as usize)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            PagemapEntry(u64::from_le_bytes(word))
        })
        .collect())
}

/// Decode raw words into (VPN, PFN) pairs, one per returned word.
///
/// With the page shift derived from the actual page size, the VPN of page
/// `i` of a range is exactly `start_page + i`.
pub fn resolve_entries(start_page: u64, entries: &[PagemapEntry]) -> Vec<PageMapping> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| PageMapping {
            vpn: start_page + idx as u64,
            pfn: entry.state().frame,
        })
        .collect()
}
