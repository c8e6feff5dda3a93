//! Text reports printed and written by the front-ends

use {
    std::io::{self, Write},
    uvmbytecode::{disasm, Program},
};

/// Registers per row of the register table
pub const REGISTERS_PER_ROW: usize = 8;

/// Header row of the memory dump
pub const CSV_HEADER: &str = "Address,Value (dec),Value (hex)";

/// Print the register file, eight registers per row:
///
/// ```text
/// R00 R01 R02 R03 R04 R05 R06 R07: 00000000 00000000 ...
/// ```
pub fn write_registers(out: &mut impl Write, registers: &[u32]) -> io::Result<()> {
    for (row, values) in registers.chunks(REGISTERS_PER_ROW).enumerate() {
        let base = row * REGISTERS_PER_ROW;
        let names = (base..base + values.len()).map(|i| format!("R{i:02}")).collect::<Vec<_>>();
        let values = values.iter().map(|v| format!("{v:08x}")).collect::<Vec<_>>();
        writeln!(out, "{}: {}", names.join(" "), values.join(" "))?;
    }
    Ok(())
}

/// Write a memory dump as CSV
pub fn write_csv(out: &mut impl Write, dump: &[(u32, u32)]) -> io::Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for &(address, value) in dump {
        writeln!(out, "{address},{value},0x{value:08x}")?;
    }
    Ok(())
}

/// Print the first `count` cells of a memory dump
pub fn write_head(out: &mut impl Write, dump: &[(u32, u32)], count: usize) -> io::Result<()> {
    for &(address, value) in dump.iter().take(count) {
        writeln!(out, "  0x{address:04x}: {value:8} (0x{value:08x})")?;
    }
    Ok(())
}

/// Print the numbered instruction list followed by the hex listing
pub fn write_listing(out: &mut impl Write, program: &Program) -> io::Result<()> {
    writeln!(out, "Instructions:")?;
    for (i, instruction) in program.iter().enumerate() {
        writeln!(out, "{i:3}: {instruction}")?;
    }

    let mut listing = String::new();
    disasm(&program.encode(), &mut listing)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    writeln!(out, "\nBinary:")?;
    out.write_all(listing.as_bytes())
}
