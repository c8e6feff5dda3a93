//! Binary instruction encoding
//!
//! An instruction is its opcode byte followed by the operands in declaration
//! order, big-endian. Registers take one byte, the 24-bit constant three and
//! the 30-bit address four. A program is the plain concatenation of its
//! instructions, without any header.

use {
    crate::{Addr30, Field, Imm24, Instruction, Kind, Reg, ValidationError},
    alloc::vec::Vec,
    core::iter::FusedIterator,
    derive_more::Display,
};

/// Decoding failure kind
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// No bytes left where an opcode was expected
    #[display(fmt = "unexpected end of bytecode")]
    UnexpectedEnd,

    /// Opcode byte does not name any instruction
    #[display(fmt = "unknown opcode {_0:#04x}")]
    UnknownOpcode(u8),

    /// Buffer ends in the middle of an instruction
    #[display(fmt = "truncated {kind} instruction: needs {needed} bytes, {available} available")]
    Truncated { kind: Kind, needed: usize, available: usize },

    /// Operand bytes decode to a value outside of its architectural range
    #[display(fmt = "{_0}")]
    FieldOutOfRange(ValidationError),
}

impl From<ValidationError> for DecodeErrorKind {
    fn from(value: ValidationError) -> Self {
        Self::FieldOutOfRange(value)
    }
}

/// Decoding error
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[display(fmt = "{kind} at byte offset {offset}")]
pub struct DecodeError {
    /// Kind
    pub kind: DecodeErrorKind,
    /// Offset of the failing instruction in the bytecode
    pub offset: usize,
}

impl core::error::Error for DecodeError {}

impl Instruction {
    /// Append the encoded instruction to `buf`
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.kind().opcode());
        match *self {
            Self::LoadConst { reg, value } => {
                buf.push(reg.get());
                buf.extend_from_slice(&value.get().to_be_bytes()[1..]);
            }
            Self::ReadMem { dst_reg, addr_reg } => buf.extend([dst_reg.get(), addr_reg.get()]),
            Self::WriteMem { src_reg, addr_reg } => buf.extend([src_reg.get(), addr_reg.get()]),
            Self::ShiftRight { reg, address } => {
                buf.push(reg.get());
                buf.extend_from_slice(&address.get().to_be_bytes());
            }
        }
    }

    /// Decode the instruction at the start of `bytes`.
    ///
    /// Returns the instruction and the number of bytes it occupies.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), DecodeErrorKind> {
        let &op = bytes.first().ok_or(DecodeErrorKind::UnexpectedEnd)?;
        let kind = Kind::from_opcode(op).ok_or(DecodeErrorKind::UnknownOpcode(op))?;

        let instruction = match kind {
            Kind::LoadConst => {
                let [reg, value @ ..] = operands::<4>(bytes, kind)?;
                let [v0, v1, v2] = value;
                Self::LoadConst {
                    reg: Reg::new(reg.into(), Field::Reg)?,
                    value: Imm24::new(u32::from_be_bytes([0, v0, v1, v2]).into(), Field::Value)?,
                }
            }
            Kind::ReadMem => {
                let [dst_reg, addr_reg] = operands::<2>(bytes, kind)?;
                Self::ReadMem {
                    dst_reg: Reg::new(dst_reg.into(), Field::DstReg)?,
                    addr_reg: Reg::new(addr_reg.into(), Field::AddrReg)?,
                }
            }
            Kind::WriteMem => {
                let [src_reg, addr_reg] = operands::<2>(bytes, kind)?;
                Self::WriteMem {
                    src_reg: Reg::new(src_reg.into(), Field::SrcReg)?,
                    addr_reg: Reg::new(addr_reg.into(), Field::AddrReg)?,
                }
            }
            Kind::ShiftRight => {
                let [reg, address @ ..] = operands::<5>(bytes, kind)?;
                Self::ShiftRight {
                    reg: Reg::new(reg.into(), Field::Reg)?,
                    address: Addr30::new(u32::from_be_bytes(address).into(), Field::Address)?,
                }
            }
        };

        Ok((instruction, kind.width()))
    }
}

/// Operand bytes following the opcode
fn operands<const N: usize>(bytes: &[u8], kind: Kind) -> Result<[u8; N], DecodeErrorKind> {
    debug_assert_eq!(N + 1, kind.width());
    bytes
        .get(1..=N)
        .and_then(|operands| operands.try_into().ok())
        .ok_or(DecodeErrorKind::Truncated { kind, needed: kind.width(), available: bytes.len() })
}

/// Iterator over the instructions of a bytecode buffer.
///
/// Yields `(offset, instruction)` pairs and stops after the first error.
#[derive(Clone, Debug)]
pub struct DecodeIter<'a> {
    bytes: &'a [u8],
    offset: usize,
    failed: bool,
}

impl Iterator for DecodeIter<'_> {
    type Item = Result<(usize, Instruction), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.bytes.get(self.offset..).filter(|rest| !rest.is_empty() && !self.failed)?;
        let offset = self.offset;
        Some(match Instruction::decode(rest) {
            Ok((instruction, width)) => {
                self.offset += width;
                Ok((offset, instruction))
            }
            Err(kind) => {
                self.failed = true;
                Err(DecodeError { kind, offset })
            }
        })
    }
}

impl FusedIterator for DecodeIter<'_> {}

/// Decode `bytes` instruction by instruction
pub fn decode_iter(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter { bytes, offset: 0, failed: false }
}
