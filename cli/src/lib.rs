//! UVM command-line front-ends: `uvmasm` and `uvmi`

pub mod assembler;
pub mod interpreter;
pub mod logger;
pub mod report;

use core::ops::Range;

/// Memory range dumped by `uvmi` when none is given
pub const DEFAULT_RANGE: Range<u32> = 0..100;

/// Parse a `start-end` address range, end exclusive
pub fn parse_range(value: &str) -> Result<Range<u32>, String> {
    let (start, end) = value.split_once('-').ok_or("expected `start-end`, e.g. 0-100")?;
    let parse = |s: &str| s.trim().parse::<u32>().map_err(|e| format!("invalid address `{s}`: {e}"));

    let range = parse(start)?..parse(end)?;
    if range.start > range.end {
        return Err(format!("range start {} is past its end {}", range.start, range.end));
    }

    Ok(range)
}
