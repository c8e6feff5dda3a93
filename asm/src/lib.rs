//! UVM assembler
//!
//! Source format, one instruction per line:
//!
//! ```text
//! ; full-line comment
//! LOAD_CONST 3, 0x10   ; trailing comment
//! write_mem  0, 1
//! ```
//!
//! Mnemonics are case-insensitive, operands are comma-separated decimal or
//! `0x`-prefixed hexadecimal integers.


use {
    derive_more::Display,
    std::{
        fmt::{self, Formatter},
        num::IntErrorKind,
    },
    uvmbytecode::{Instruction, Kind, Program, ValidationError},
};

/// Single line error
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum ParseError {
    /// Mnemonic not in the instruction set
    #[display(fmt = "unknown instruction: {_0}")]
    UnknownInstruction(String),

    /// Operand is not a decimal or `0x` hexadecimal integer
    #[display(fmt = "invalid argument: {_0}")]
    InvalidArgument(String),

    /// Wrong operand count or operand out of range
    #[display(fmt = "{_0}")]
    Invalid(ValidationError),
}

impl From<ValidationError> for ParseError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

impl std::error::Error for ParseError {}

/// Assemble one line of source.
///
/// Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Instruction>, ParseError> {
    let code = line.split_once(';').map_or(line, |(code, _)| code);
    let mut words = code.split_whitespace();
    let Some(mnemonic) = words.next() else {
        return Ok(None);
    };

    let operands = words.collect::<Vec<_>>().join(" ");
    let operands = operands
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_operand)
        .collect::<Result<Vec<_>, _>>()?;

    let mnemonic = mnemonic.to_ascii_uppercase();
    let kind = Kind::from_mnemonic(&mnemonic).ok_or(ParseError::UnknownInstruction(mnemonic))?;
    Ok(Some(Instruction::new(kind, &operands)?))
}

fn parse_operand(token: &str) -> Result<i128, ParseError> {
    let parsed = match token.strip_prefix("0x") {
        Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => i128::from_str_radix(hex, 16),
        Some(_) => return Err(ParseError::InvalidArgument(token.into())),
        None => token.parse(),
    };

    // Well-formed but wider than i128 is still a number, left to the range check
    match parsed {
        Ok(value) => Ok(value),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i128::MAX),
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => Ok(i128::MIN),
        Err(_) => Err(ParseError::InvalidArgument(token.into())),
    }
}

/// What to do after a bad line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop at the first bad line
    #[default]
    Abort,

    /// Check every line and report all errors
    Collect,
}

/// Error with its source location
#[derive(Clone, Debug, Display, PartialEq, Eq)]
#[display(fmt = "line {line}: {error}")]
pub struct LineError {
    /// 1-based line number
    pub line: usize,
    /// Offending source line, trimmed
    pub text: String,
    pub error: ParseError,
}

impl std::error::Error for LineError {}

/// Failed assembly, holds at least one [`LineError`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyError(Vec<LineError>);

impl AssemblyError {
    pub fn errors(&self) -> &[LineError] {
        &self.0
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i != 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for AssemblyError {}

/// Assemble a whole source text.
///
/// No program is produced if any line fails; `policy` only decides whether
/// lines after the first failure are still checked.
pub fn assemble(source: &str, policy: ErrorPolicy) -> Result<Program, AssemblyError> {
    let mut instructions = vec![];
    let mut errors = vec![];

    for (index, text) in source.lines().enumerate() {
        match parse_line(text) {
            Ok(Some(instruction)) => instructions.push(instruction),
            Ok(None) => (),
            Err(error) => {
                let error = LineError { line: index + 1, text: text.trim().into(), error };
                log::debug!("{error}");
                errors.push(error);
                if policy == ErrorPolicy::Abort {
                    break;
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(AssemblyError(errors));
    }

    log::debug!("assembled {} instructions", instructions.len());
    Ok(Program::from(instructions))
}
