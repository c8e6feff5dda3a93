//! Memory implementations

use {alloc::vec::Vec, core::ops::Range, derive_more::Display};

pub mod paging;

pub use paging::{PagedMemory, PAGE_CELLS};

/// Word-addressed load-store memory
pub trait Memory {
    /// Number of addressable cells
    fn size(&self) -> u64;

    /// Load the cell at `addr`
    fn load(&self, addr: u32) -> Result<u32, LoadError>;

    /// Store `value` to the cell at `addr`
    fn store(&mut self, addr: u32, value: u32) -> Result<(), StoreError>;

    /// Ordered `(address, value)` pairs for the half-open `range`.
    ///
    /// Fails on the first address outside of memory.
    fn dump(&self, range: Range<u32>) -> Result<Vec<(u32, u32)>, LoadError> {
        range.map(|addr| self.load(addr).map(|value| (addr, value))).collect()
    }
}

/// Flat memory, one element per cell
impl Memory for Vec<u32> {
    fn size(&self) -> u64 {
        self.len() as u64
    }

    fn load(&self, addr: u32) -> Result<u32, LoadError> {
        usize::try_from(addr)
            .ok()
            .and_then(|index| self.get(index))
            .copied()
            .ok_or(LoadError(addr))
    }

    fn store(&mut self, addr: u32, value: u32) -> Result<(), StoreError> {
        let cell = usize::try_from(addr)
            .ok()
            .and_then(|index| self.get_mut(index))
            .ok_or(StoreError(addr))?;
        *cell = value;
        Ok(())
    }
}

/// Unhandled load access trap
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq)]
#[display(fmt = "Load access error at address {_0:#x}")]
pub struct LoadError(pub u32);

/// Unhandled store access trap
#[derive(Clone, Copy, Display, Debug, PartialEq, Eq)]
#[display(fmt = "Store access error at address {_0:#x}")]
pub struct StoreError(pub u32);

impl core::error::Error for LoadError {}
impl core::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use {super::*, alloc::vec};

    #[test]
    fn flat_memory_bounds() {
        let mut mem = vec![0_u32; 16];
        assert_eq!(mem.size(), 16);
        assert_eq!(mem.store(15, 7), Ok(()));
        assert_eq!(mem.load(15), Ok(7));
        assert_eq!(mem.store(16, 1), Err(StoreError(16)));
        assert_eq!(mem.load(u32::MAX), Err(LoadError(u32::MAX)));
    }

    #[test]
    fn dump_is_half_open() {
        let mut mem = vec![0_u32; 8];
        mem.store(3, 30).unwrap();
        mem.store(4, 40).unwrap();
        assert_eq!(mem.dump(3..5), Ok(vec![(3, 30), (4, 40)]));
        assert_eq!(mem.dump(5..5), Ok(vec![]));
        assert_eq!(mem.dump(6..9), Err(LoadError(8)));
    }
}
