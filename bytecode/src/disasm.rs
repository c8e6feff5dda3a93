use {
    crate::{codec::decode_iter, DecodeError, MAX_WIDTH},
    alloc::string::String,
    core::fmt::Write,
};

/// Write a listing of `program` to `out`, one line per instruction:
/// byte offset, encoded bytes and instruction text.
///
/// Lines up to the first undecodable instruction are written before the
/// error is returned.
pub fn disasm(program: &[u8], out: &mut String) -> Result<(), DecodeError> {
    for item in decode_iter(program) {
        let (offset, instruction) = item?;
        let bytes = program.get(offset..offset + instruction.kind().width()).unwrap_or_default();

        _ = write!(out, "{offset:04x}:");
        for byte in bytes {
            _ = write!(out, " {byte:02x}");
        }

        let pad = (MAX_WIDTH - bytes.len()) * 3;
        _ = writeln!(out, "{:pad$}   {instruction}", "");
    }

    Ok(())
}
