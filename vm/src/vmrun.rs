//! Instruction dispatch
//!
//! Programs have no jumps: every successful step executes the instruction at
//! `pc` and moves to the next one, so a run is a single pass over the program.

use {
    crate::{mem::Memory, Vm, VmRunError, VmState},
    uvmbytecode::Instruction,
};

impl<Mem> Vm<Mem>
where
    Mem: Memory,
{
    /// Execute one instruction.
    ///
    /// The program counter advances by exactly one on success. On error it
    /// keeps pointing at the failing instruction and no state is modified.
    /// Stepping a halted VM does nothing.
    pub fn step(&mut self) -> Result<VmState, VmRunError> {
        let pc = self.pc;
        let Some(instruction) = self.program.get(pc) else {
            return Ok(VmState::Halted);
        };

        log::trace!("{pc:04}: {instruction}");
        match instruction {
            Instruction::LoadConst { reg, value } => self.write_reg(reg, value.get()),
            Instruction::ReadMem { dst_reg, addr_reg } => {
                let address = self.read_reg(addr_reg);
                let value = self
                    .memory
                    .load(address)
                    .map_err(|_| VmRunError::LoadAccessEx { pc, address })?;
                self.write_reg(dst_reg, value);
            }
            Instruction::WriteMem { src_reg, addr_reg } => {
                let address = self.read_reg(addr_reg);
                let value = self.read_reg(src_reg);
                self.memory
                    .store(address, value)
                    .map_err(|_| VmRunError::StoreAccessEx { pc, address })?;
            }
            // One-shot write, the target cell is never read
            Instruction::ShiftRight { reg, address } => {
                let address = address.get();
                let value = self.read_reg(reg) >> 1;
                self.memory
                    .store(address, value)
                    .map_err(|_| VmRunError::StoreAccessEx { pc, address })?;
            }
        }

        self.pc += 1;
        Ok(self.state())
    }

    /// Execute program to completion
    ///
    /// Stops on the first [`VmRunError`]
    pub fn run(&mut self) -> Result<(), VmRunError> {
        while let VmState::Loaded = self.step()? {}
        log::debug!("halted after {} instructions", self.pc);
        Ok(())
    }
}
