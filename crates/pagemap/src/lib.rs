//! Per-process virtual-to-physical page mapping extraction.
//!
//! Walks a target process's mapped ranges (`/proc/<pid>/maps`), resolves
//! each virtual page against the kernel pagemap channel
//! (`/proc/<pid>/pagemap`), and renders a VPN:PFN line for every resident
//! page.
//!
//! One scan pass is a linear pipeline:
//!
//! - [`maps::MapRanges`] — parse the mapped-range description
//! - [`resolve::Pagemap`] — one indexed bulk read + decode per range
//! - [`report`] — `0x<vpn>:0x<pfn>` lines between fixed markers
//!
//! [`scan::scan_process`] ties the three together for one pass.

pub mod entry;
pub mod error;
pub mod maps;
pub mod report;
pub mod resolve;
pub mod scan;

pub use entry::{EntryStatus, PageState, PagemapEntry};
pub use error::ScanError;
pub use maps::{MapRanges, VmaRange, MAX_RANGES};
pub use report::{BEGIN_MARKER, END_MARKER};
pub use resolve::{PageMapping, Pagemap};
pub use scan::{page_size, scan_process};
