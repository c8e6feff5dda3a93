use uvmbytecode::Addr30;

/// Default memory size in cells, enough for every `SHR` address
pub const DEFAULT_MEMORY_SIZE: u64 = Addr30::MAX as u64 + 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VmConfig {
    /// Number of addressable memory cells
    pub memory_size: u64,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self { memory_size: DEFAULT_MEMORY_SIZE }
    }
}
