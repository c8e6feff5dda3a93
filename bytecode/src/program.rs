use {
    crate::{codec::decode_iter, DecodeError, Instruction},
    alloc::vec::Vec,
    core::slice,
};

/// Ordered instruction sequence, in execution order
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Program(Vec<Instruction>);

impl Program {
    /// Decode a headerless bytecode buffer.
    ///
    /// The buffer has to end exactly on an instruction boundary.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let program = decode_iter(bytes)
            .map(|item| item.map(|(_, instruction)| instruction))
            .collect::<Result<Self, _>>()?;

        log::debug!("decoded {} instructions from {} bytes", program.len(), bytes.len());
        Ok(program)
    }

    /// Encode into a fresh buffer
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.0.iter().for_each(|instruction| instruction.encode(&mut buf));
        buf
    }

    /// Size of the encoded program in bytes
    pub fn encoded_len(&self) -> usize {
        self.0.iter().map(|instruction| instruction.kind().width()).sum()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Instruction at program counter `pc`
    #[inline]
    pub fn get(&self, pc: usize) -> Option<Instruction> {
        self.0.get(pc).copied()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, Instruction> {
        self.0.iter()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self(instructions)
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
