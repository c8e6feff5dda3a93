//! UVM Virtual Machine
//!
//! Straight-line interpreter over a decoded [`Program`]: 32 registers,
//! a word-addressed memory and a program counter. The instruction set has
//! no jumps, so a run ends once the program counter passes the last
//! instruction.

// # General safety notice:
// - Register indices are validated on decode (r0 - r31)
// - Memory accesses are bounds-checked by the `Memory` implementation

#![no_std]

extern crate alloc;

pub mod config;
pub mod mem;

mod vmrun;

#[cfg(test)]
mod tests;

pub use {config::VmConfig, uvmbytecode as bytecode};

use {
    alloc::vec::Vec,
    core::ops::Range,
    derive_more::Display,
    mem::{LoadError, Memory, PagedMemory},
    uvmbytecode::{DecodeError, Program, Reg},
};

/// Register file size
pub const REGISTER_COUNT: usize = Reg::MAX as usize + 1;

/// UVM Virtual Machine
pub struct Vm<Mem = PagedMemory> {
    /// Holds 32 registers
    registers: [u32; REGISTER_COUNT],

    /// Memory implementation
    memory: Mem,

    /// Program counter, index of the next instruction
    pc: usize,

    /// Loaded program
    program: Program,
}

impl<Mem> Vm<Mem>
where
    Mem: Memory,
{
    /// Create a new VM in the loaded state: zeroed registers, pc at 0
    pub fn new(program: Program, memory: Mem) -> Self {
        log::debug!(
            "loaded {} instructions, memory of {} cells",
            program.len(),
            memory.size()
        );
        Self { registers: [0; REGISTER_COUNT], memory, pc: 0, program }
    }

    pub fn state(&self) -> VmState {
        if self.pc < self.program.len() {
            VmState::Loaded
        } else {
            VmState::Halted
        }
    }

    /// Read register
    #[inline(always)]
    pub fn read_reg(&self, reg: Reg) -> u32 {
        self.registers[usize::from(reg.get())]
    }

    /// Write register
    #[inline(always)]
    pub fn write_reg(&mut self, reg: Reg, value: u32) {
        self.registers[usize::from(reg.get())] = value;
    }

    /// Register file snapshot
    pub fn registers(&self) -> &[u32; REGISTER_COUNT] {
        &self.registers
    }

    #[inline]
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn memory(&self) -> &Mem {
        &self.memory
    }

    /// Ordered `(address, value)` pairs for the half-open `range`
    pub fn dump(&self, range: Range<u32>) -> Result<Vec<(u32, u32)>, LoadError> {
        self.memory.dump(range)
    }
}

impl Vm {
    /// Create a VM backed by paged memory sized by `config`
    pub fn with_config(program: Program, config: &VmConfig) -> Self {
        Self::new(program, PagedMemory::new(config.memory_size))
    }

    /// Decode `bytes` and load the resulting program
    pub fn load(bytes: &[u8], config: &VmConfig) -> Result<Self, DecodeError> {
        Ok(Self::with_config(Program::decode(bytes)?, config))
    }
}

/// Execution state
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VmState {
    /// Instructions left to execute
    Loaded,

    /// Program counter has passed the last instruction
    Halted,
}

/// Virtual machine halt error
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum VmRunError {
    /// Load outside of memory
    #[display(fmt = "load out of bounds at address {address} (instruction {pc})")]
    LoadAccessEx { pc: usize, address: u32 },

    /// Store outside of memory
    #[display(fmt = "store out of bounds at address {address} (instruction {pc})")]
    StoreAccessEx { pc: usize, address: u32 },
}

impl VmRunError {
    /// Index of the failing instruction
    pub fn pc(&self) -> usize {
        match *self {
            Self::LoadAccessEx { pc, .. } | Self::StoreAccessEx { pc, .. } => pc,
        }
    }

    /// Offending memory address
    pub fn address(&self) -> u32 {
        match *self {
            Self::LoadAccessEx { address, .. } | Self::StoreAccessEx { address, .. } => address,
        }
    }
}

impl core::error::Error for VmRunError {}
