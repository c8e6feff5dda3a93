//! `uvmasm` command

use {
    crate::report,
    argh::FromArgs,
    color_eyre::{eyre::bail, Result},
    std::{fs, io::Write, path::PathBuf},
    uvmasm::{assemble, ErrorPolicy},
};

/// Assemble UVM source into a bytecode image
#[derive(Debug, FromArgs, PartialEq)]
pub struct Command {
    /// assembly source
    #[argh(positional)]
    pub input: PathBuf,

    /// bytecode image to write
    #[argh(positional)]
    pub output: PathBuf,

    /// print the instruction list and the hex listing
    #[argh(switch, short = 'l')]
    pub listing: bool,

    /// report every bad line instead of stopping at the first one
    #[argh(switch, short = 'k')]
    pub keep_going: bool,
}

/// Assemble `com.input` into `com.output`.
///
/// Line errors go to `err` and leave the output file untouched.
pub fn command(com: Command, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
    log::info!("assembling \"{}\"", com.input.display());
    let source = fs::read_to_string(&com.input)?;
    let policy = if com.keep_going { ErrorPolicy::Collect } else { ErrorPolicy::Abort };

    let program = match assemble(&source, policy) {
        Ok(program) => program,
        Err(errors) => {
            for error in errors.errors() {
                writeln!(err, "{error}")?;
                writeln!(err, "  Line: {}", error.text)?;
            }
            bail!(
                "failed to assemble \"{}\" ({} errors)",
                com.input.display(),
                errors.errors().len()
            );
        }
    };

    let bytes = program.encode();
    fs::write(&com.output, &bytes)?;

    writeln!(out, "Assembled {} commands", program.len())?;
    writeln!(out, "Output file size: {} bytes", bytes.len())?;

    if com.listing {
        writeln!(out)?;
        report::write_listing(out, &program)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        std::{io, path::Path},
        uvmbytecode::opcode,
    };

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("uvmasm-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn com(dir: &Path, source: &str) -> Command {
        let input = dir.join("program.asm");
        fs::write(&input, source).unwrap();
        _ = fs::remove_file(dir.join("program.bin"));
        Command { input, output: dir.join("program.bin"), listing: false, keep_going: false }
    }

    fn text(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_image() {
        let dir = scratch("writes_image");
        let com = com(&dir, "; scenario\nLOAD_CONST 3, 0x10\nREAD_MEM 2, 1\n");
        let output = com.output.clone();

        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        command(com, &mut out, &mut err).unwrap();

        assert_eq!(
            fs::read(output).unwrap(),
            [opcode::LOAD_CONST, 3, 0, 0, 0x10, opcode::READ_MEM, 2, 1],
        );
        assert_eq!(text(out), "Assembled 2 commands\nOutput file size: 8 bytes\n");
        assert!(err.is_empty());
    }

    #[test]
    fn listing() {
        let dir = scratch("listing");
        let com = Command { listing: true, ..com(&dir, "SHR 4, 256\n") };

        let mut out = vec![];
        command(com, &mut out, &mut io::sink()).unwrap();

        let out = text(out);
        assert!(out.contains("  0: SHR 4, 256\n"), "{out}");
        assert!(out.contains("0000: 04 04 00 00 01 00   SHR 4, 256\n"), "{out}");
    }

    #[test]
    fn no_output_on_error() {
        let dir = scratch("no_output_on_error");
        let com = com(&dir, "LOAD_CONST 1, 2\nBOGUS 1, 2\nSHR 4, 1073741824\n");
        let output = com.output.clone();

        let mut err = vec![];
        assert!(command(com, &mut io::sink(), &mut err).is_err());
        assert!(!output.exists());
        assert_eq!(text(err), "line 2: unknown instruction: BOGUS\n  Line: BOGUS 1, 2\n");
    }

    #[test]
    fn keep_going_reports_every_line() {
        let dir = scratch("keep_going_reports_every_line");
        let com = Command {
            keep_going: true,
            ..com(&dir, "LOAD_CONST 1, 2\nBOGUS 1, 2\nSHR 4, 1073741824\n")
        };
        let output = com.output.clone();

        let mut err = vec![];
        assert!(command(com, &mut io::sink(), &mut err).is_err());
        assert!(!output.exists());
        assert_eq!(
            text(err),
            "line 2: unknown instruction: BOGUS\n  Line: BOGUS 1, 2\n\
             line 3: memory address must be 0-1073741823, got 1073741824\n  \
             Line: SHR 4, 1073741824\n",
        );
    }
}
