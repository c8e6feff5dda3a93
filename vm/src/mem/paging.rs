//! Sparse paged memory

use {
    super::{LoadError, Memory, StoreError},
    crate::config::DEFAULT_MEMORY_SIZE,
    alloc::boxed::Box,
    core::fmt::{self, Debug, Formatter},
    hashbrown::HashMap,
};

/// Cells per page
pub const PAGE_CELLS: usize = 4096;

type Page = [u32; PAGE_CELLS];

/// Memory allocated in pages on first non-zero store.
///
/// Cells of unmapped pages read as zero, so the whole architectural address
/// space can be addressable without reserving it upfront.
#[derive(Clone)]
pub struct PagedMemory {
    pages: HashMap<u32, Box<Page>>,
    size: u64,
}

impl PagedMemory {
    /// Create memory of `size` cells, all zero
    pub fn new(size: u64) -> Self {
        Self { pages: HashMap::new(), size }
    }

    /// Number of allocated pages
    pub fn mapped_pages(&self) -> usize {
        self.pages.len()
    }

    /// Page number and offset of an in-bounds address
    #[inline]
    fn locate(&self, addr: u32) -> Option<(u32, usize)> {
        (u64::from(addr) < self.size)
            .then(|| (addr / PAGE_CELLS as u32, (addr % PAGE_CELLS as u32) as usize))
    }
}

impl Default for PagedMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}

impl Debug for PagedMemory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedMemory")
            .field("size", &self.size)
            .field("mapped_pages", &self.pages.len())
            .finish()
    }
}

impl Memory for PagedMemory {
    fn size(&self) -> u64 {
        self.size
    }

    fn load(&self, addr: u32) -> Result<u32, LoadError> {
        let (page, offset) = self.locate(addr).ok_or(LoadError(addr))?;
        Ok(self.pages.get(&page).map_or(0, |page| page[offset]))
    }

    fn store(&mut self, addr: u32, value: u32) -> Result<(), StoreError> {
        let (page, offset) = self.locate(addr).ok_or(StoreError(addr))?;
        if value == 0 && !self.pages.contains_key(&page) {
            return Ok(());
        }

        let cells = self.pages.entry(page).or_insert_with(|| {
            log::trace!("mapping page {page:#x}");
            Box::new([0; PAGE_CELLS])
        });
        cells[offset] = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, alloc::vec};

    #[test]
    fn unmapped_reads_zero() {
        let mem = PagedMemory::default();
        assert_eq!(mem.size(), 1 << 30);
        assert_eq!(mem.load(0), Ok(0));
        assert_eq!(mem.load((1 << 30) - 1), Ok(0));
        assert_eq!(mem.mapped_pages(), 0);
    }

    #[test]
    fn stores_map_pages_lazily() {
        let mut mem = PagedMemory::new(3 * PAGE_CELLS as u64);
        mem.store(0, 0).unwrap();
        assert_eq!(mem.mapped_pages(), 0);

        mem.store(PAGE_CELLS as u32 + 1, 9).unwrap();
        mem.store(PAGE_CELLS as u32 + 2, 10).unwrap();
        assert_eq!(mem.mapped_pages(), 1);
        assert_eq!(mem.load(PAGE_CELLS as u32 + 1), Ok(9));
        assert_eq!(mem.load(PAGE_CELLS as u32), Ok(0));

        mem.store(PAGE_CELLS as u32 + 1, 0).unwrap();
        assert_eq!(mem.load(PAGE_CELLS as u32 + 1), Ok(0));
    }

    #[test]
    fn bounds_checked() {
        let mut mem = PagedMemory::new(10);
        assert_eq!(mem.store(9, 1), Ok(()));
        assert_eq!(mem.store(10, 1), Err(StoreError(10)));
        assert_eq!(mem.load(10), Err(LoadError(10)));
        assert_eq!(mem.dump(8..10), Ok(vec![(8, 0), (9, 1)]));
    }

    #[test]
    fn full_address_space() {
        let mut mem = PagedMemory::new(1 << 32);
        assert_eq!(mem.store(u32::MAX, 5), Ok(()));
        assert_eq!(mem.load(u32::MAX), Ok(5));
    }
}
