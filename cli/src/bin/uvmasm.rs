//! UVM assembler

use {
    color_eyre::Result,
    std::io,
    uvmcli::{assembler, logger},
};

fn main() -> Result<()> {
    color_eyre::install()?;
    logger::init();
    assembler::command(argh::from_env(), &mut io::stdout().lock(), &mut io::stderr().lock())
}
