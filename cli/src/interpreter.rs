//! `uvmi` command

use {
    crate::{parse_range, report, DEFAULT_RANGE},
    argh::FromArgs,
    color_eyre::Result,
    core::ops::Range,
    memmap2::Mmap,
    std::{
        fs::File,
        io::{BufWriter, Write},
        path::PathBuf,
    },
    uvm::{Vm, VmConfig},
};

/// Cells printed after the dump is written
pub const HEAD_CELLS: usize = 10;

/// Run a UVM bytecode image and dump a range of its memory
#[derive(Debug, FromArgs, PartialEq)]
pub struct Command {
    /// bytecode image
    #[argh(positional)]
    pub image: PathBuf,

    /// file receiving the CSV memory dump
    #[argh(positional)]
    pub dump: PathBuf,

    /// dumped addresses as `start-end`, end exclusive (default 0-100)
    #[argh(positional, from_str_fn(parse_range))]
    pub range: Option<Range<u32>>,

    /// memory size in cells (default 2^30)
    #[argh(option)]
    pub memory_size: Option<u64>,
}

/// Run `com.image` and write the memory dump.
///
/// A failed run reports the fault and registers to `err` and writes no dump.
pub fn command(com: Command, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    let config =
        com.memory_size.map_or_else(VmConfig::default, |memory_size| VmConfig { memory_size });
    let range = com.range.unwrap_or(DEFAULT_RANGE);

    log::info!("loading image from \"{}\"", com.image.display());
    let file = File::open(&com.image)?;
    // SAFETY: mapped read-only and dropped right after decoding; the image
    // must not be modified while loading
    let image = unsafe { Mmap::map(&file)? };
    let mut vm = Vm::load(&image, &config)?;

    writeln!(out, "Loaded {} bytes from \"{}\"", image.len(), com.image.display())?;
    writeln!(out, "Program has {} commands", vm.program().len())?;
    drop(image);

    if let Err(fault) = vm.run() {
        writeln!(err, "[E] {fault}")?;
        writeln!(err, "    Program counter: {}\n\n== Registers ==", vm.pc())?;
        report::write_registers(err, vm.registers())?;
        return Err(fault.into());
    }

    writeln!(out, "Program execution completed\n\nRegister states:")?;
    report::write_registers(out, vm.registers())?;

    let dump = vm.dump(range.clone())?;
    let mut csv = BufWriter::new(File::create(&com.dump)?);
    report::write_csv(&mut csv, &dump)?;
    csv.flush()?;

    writeln!(
        out,
        "\nMemory dump saved to \"{}\" (addresses {}-{})",
        com.dump.display(),
        range.start,
        range.end
    )?;
    writeln!(out, "\nFirst {HEAD_CELLS} memory values:")?;
    report::write_head(out, &dump, HEAD_CELLS)?;

    Ok(())
}
