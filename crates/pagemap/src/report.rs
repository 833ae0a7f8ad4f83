//! Report rendering for one scan pass.
//!
//! One line per resident page, `0x<vpn>:0x<pfn>`, bracketed by fixed
//! begin/end markers. Pages with PFN 0 are unmapped and never printed.

use std::io::{self, Write};

use crate::resolve::PageMapping;

/// Literal marker opening one report.
pub const BEGIN_MARKER: &str = "VPN-PPNMap:";
/// Literal marker closing one report.
pub const END_MARKER: &str = "VPN-PPNMap-End";

pub fn write_begin<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{BEGIN_MARKER}")
}

/// Write one line per mapped page; unmapped pages (PFN 0) are skipped.
pub fn write_mappings<W: Write>(out: &mut W, mappings: &[PageMapping]) -> io::Result<()> {
    for mapping in mappings {
        if mapping.pfn == 0 {
            continue;
        }
        writeln!(out, "0x{:x}:0x{:x}", mapping.vpn, mapping.pfn)?;
    }
    Ok(())
}

pub fn write_end<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{END_MARKER}")
}
