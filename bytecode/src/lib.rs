//! UVM bytecode definitions
//!
//! Instruction set shared by the assembler and the virtual machine:
//! - [`Kind`] enumerates the instruction kinds together with their mnemonic,
//!   opcode, arity and encoded width
//! - [`Instruction`] is a validated instruction; its operands are
//!   range-restricted newtypes, so an out-of-range instruction cannot exist
//! - the binary codec lives on [`Instruction::encode`] / [`Instruction::decode`]
//!   and [`Program`]

#![no_std]

extern crate alloc;

mod codec;
#[cfg(feature = "disasm")]
mod disasm;
mod program;

#[cfg(feature = "disasm")]
pub use disasm::disasm;
pub use {
    codec::{decode_iter, DecodeError, DecodeErrorKind, DecodeIter},
    program::Program,
};

use {
    core::fmt::{self, Display, Formatter},
    derive_more::Display,
    static_assertions::const_assert,
};

macro_rules! constmod {
    ($vis:vis $mname:ident($repr:ty) {
        $(#![doc = $mdoc:literal])?
        $($cname:ident = $val:expr $(,$doc:literal)?;)*
    }) => {
        $(#[doc = $mdoc])?
        $vis mod $mname {
            $(
                $(#[doc = $doc])?
                pub const $cname: $repr = $val;
            )*
        }
    };
}

constmod!(pub opcode(u8) {
    //! Opcode constant module

    LOAD_CONST = 0x01, "BT; #0 ← imm #1";
    READ_MEM   = 0x02, "BB; #0 ← [#1]";
    WRITE_MEM  = 0x03, "BB; [#1] ← #0";
    SHR        = 0x04, "BA; [imm #1] ← #0 » 1";
});

/// Encoded size of a register operand
pub const REG_BYTES: usize = 1;
/// Encoded size of a 24-bit constant operand
pub const IMM24_BYTES: usize = 3;
/// Encoded size of a 30-bit address operand
pub const ADDR30_BYTES: usize = 4;
/// Widest encoded instruction
pub const MAX_WIDTH: usize = 1 + REG_BYTES + ADDR30_BYTES;

/// Operand role, reported by range errors
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Field {
    #[display(fmt = "register")]
    Reg,
    #[display(fmt = "constant")]
    Value,
    #[display(fmt = "destination register")]
    DstReg,
    #[display(fmt = "source register")]
    SrcReg,
    #[display(fmt = "address register")]
    AddrReg,
    #[display(fmt = "memory address")]
    Address,
}

/// Instruction construction failure
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ValidationError {
    /// Wrong operand count
    #[display(fmt = "instruction {kind} expects {expected} arguments, got {got}")]
    Arity { kind: Kind, expected: usize, got: usize },

    /// Operand outside of `0..=max`
    #[display(fmt = "{field} must be 0-{max}, got {value}")]
    OutOfRange { field: Field, value: i128, max: u32 },
}

impl core::error::Error for ValidationError {}

/// Define range-checked operand newtypes
macro_rules! operand_def {
    ($($(#[doc = $doc:literal])* $name:ident($repr:ty) <= $max:literal;)*) => {$(
        $(#[doc = $doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($repr);

        impl $name {
            /// Largest accepted value
            pub const MAX: $repr = $max;

            /// Range-check `value` in the role of `field`
            pub fn new(value: i128, field: Field) -> Result<Self, ValidationError> {
                match <$repr>::try_from(value) {
                    Ok(v) if v <= Self::MAX => Ok(Self(v)),
                    _ => Err(ValidationError::OutOfRange {
                        field,
                        value,
                        max: Self::MAX.into(),
                    }),
                }
            }

            /// Get inner value
            #[inline(always)]
            pub const fn get(self) -> $repr {
                self.0
            }
        }

        impl From<$name> for $repr {
            #[inline]
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    )*};
}

operand_def! {
    /// Register index
    Reg(u8) <= 31;
    /// 24-bit immediate constant
    Imm24(u32) <= 0xFF_FFFF;
    /// 30-bit literal memory address
    Addr30(u32) <= 0x3FFF_FFFF;
}

const_assert!((Reg::MAX as u64) < 1 << (8 * REG_BYTES));
const_assert!((Imm24::MAX as u64) < 1 << (8 * IMM24_BYTES));
const_assert!((Addr30::MAX as u64) < 1 << (8 * ADDR30_BYTES));

/// Instruction kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    LoadConst,
    ReadMem,
    WriteMem,
    ShiftRight,
}

impl Kind {
    /// Every kind, in opcode order
    pub const ALL: [Self; 4] = [Self::LoadConst, Self::ReadMem, Self::WriteMem, Self::ShiftRight];

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::LoadConst => "LOAD_CONST",
            Self::ReadMem => "READ_MEM",
            Self::WriteMem => "WRITE_MEM",
            Self::ShiftRight => "SHR",
        }
    }

    pub const fn opcode(self) -> u8 {
        match self {
            Self::LoadConst => opcode::LOAD_CONST,
            Self::ReadMem => opcode::READ_MEM,
            Self::WriteMem => opcode::WRITE_MEM,
            Self::ShiftRight => opcode::SHR,
        }
    }

    /// Operand count
    pub const fn arity(self) -> usize {
        match self {
            Self::LoadConst | Self::ReadMem | Self::WriteMem | Self::ShiftRight => 2,
        }
    }

    /// Encoded size in bytes, opcode included
    pub const fn width(self) -> usize {
        1 + match self {
            Self::LoadConst => REG_BYTES + IMM24_BYTES,
            Self::ReadMem | Self::WriteMem => REG_BYTES + REG_BYTES,
            Self::ShiftRight => REG_BYTES + ADDR30_BYTES,
        }
    }

    /// Look up an upper-case mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.mnemonic() == mnemonic)
    }

    pub fn from_opcode(op: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.opcode() == op)
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Validated instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `reg ← value`
    LoadConst { reg: Reg, value: Imm24 },
    /// `dst_reg ← [addr_reg]`
    ReadMem { dst_reg: Reg, addr_reg: Reg },
    /// `[addr_reg] ← src_reg`
    WriteMem { src_reg: Reg, addr_reg: Reg },
    /// `[address] ← reg » 1`
    ShiftRight { reg: Reg, address: Addr30 },
}

impl Instruction {
    /// Build an instruction of `kind` from raw operand values.
    ///
    /// Fails on a wrong operand count or the first out-of-range operand.
    pub fn new(kind: Kind, operands: &[i128]) -> Result<Self, ValidationError> {
        match (kind, operands) {
            (Kind::LoadConst, &[reg, value]) => Ok(Self::LoadConst {
                reg: Reg::new(reg, Field::Reg)?,
                value: Imm24::new(value, Field::Value)?,
            }),
            (Kind::ReadMem, &[dst_reg, addr_reg]) => Ok(Self::ReadMem {
                dst_reg: Reg::new(dst_reg, Field::DstReg)?,
                addr_reg: Reg::new(addr_reg, Field::AddrReg)?,
            }),
            (Kind::WriteMem, &[src_reg, addr_reg]) => Ok(Self::WriteMem {
                src_reg: Reg::new(src_reg, Field::SrcReg)?,
                addr_reg: Reg::new(addr_reg, Field::AddrReg)?,
            }),
            (Kind::ShiftRight, &[reg, address]) => Ok(Self::ShiftRight {
                reg: Reg::new(reg, Field::Reg)?,
                address: Addr30::new(address, Field::Address)?,
            }),
            _ => Err(ValidationError::Arity {
                kind,
                expected: kind.arity(),
                got: operands.len(),
            }),
        }
    }

    pub const fn kind(&self) -> Kind {
        match self {
            Self::LoadConst { .. } => Kind::LoadConst,
            Self::ReadMem { .. } => Kind::ReadMem,
            Self::WriteMem { .. } => Kind::WriteMem,
            Self::ShiftRight { .. } => Kind::ShiftRight,
        }
    }
}

/// Canonical assembly text, e.g. `LOAD_CONST 3, 16`
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match *self {
            Self::LoadConst { reg, value } => write!(f, "{kind} {reg}, {value}"),
            Self::ReadMem { dst_reg, addr_reg } => write!(f, "{kind} {dst_reg}, {addr_reg}"),
            Self::WriteMem { src_reg, addr_reg } => write!(f, "{kind} {src_reg}, {addr_reg}"),
            Self::ShiftRight { reg, address } => write!(f, "{kind} {reg}, {address}"),
        }
    }
}
