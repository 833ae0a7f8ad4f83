//! Fatal error taxonomy for one scan pass.
//!
//! Everything here aborts the pass; recoverable conditions (malformed maps
//! lines, range-cap truncation) never surface as errors.

use std::io;

use thiserror::Error;

/// Errors that abort a scan pass.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to open /proc/{pid}/maps")]
    OpenMaps {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error("failed to read /proc/{pid}/maps")]
    ReadMaps {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error("failed to open /proc/{pid}/pagemap")]
    OpenPagemap {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error("failed to seek pagemap to page {page:#x}")]
    SeekPagemap {
        page: u64,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {pages} pagemap entries at page {page:#x}")]
    ReadPagemap {
        page: u64,
        pages: u64,
        #[source]
        source: io::Error,
    },

    #[error("partial pagemap read at page {page:#x}: {bytes} bytes")]
    PartialRead { page: u64, bytes: usize },

    #[error("pagemap page index {page:#x} overflows the channel offset")]
    IndexOverflow { page: u64 },

    #[error("failed to write report")]
    WriteReport(#[from] io::Error),
}
