//! UVM interpreter

use {
    color_eyre::Result,
    std::io,
    uvmcli::{interpreter, logger},
};

fn main() -> Result<()> {
    color_eyre::install()?;
    logger::init();
    interpreter::command(argh::from_env(), &mut io::stdout().lock(), &mut io::stderr().lock())
}
