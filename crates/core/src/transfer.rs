//! Block transfer settings
//!
//! A file no larger than one block goes up in a single request. Anything
//! bigger is split into fixed-size blocks which are sent with bounded
//! concurrency and then committed in order.

/// Default block size: 1 MiB
pub const DEFAULT_BLOCK_SIZE: u64 = 1024 * 1024;

/// Default number of blocks in flight for one file
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Maximum number of committed blocks per blob (service limit)
pub const MAX_BLOCKS: u64 = 50_000;

/// Per-file transfer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Block size in bytes
    pub block_size: u64,

    /// Number of concurrent block uploads for a single file
    pub concurrency: usize,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl TransferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_size(mut self, size: u64) -> Self {
        self.block_size = size.max(1);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Whether a file of this size is sent in one request
    pub fn uses_single_request(&self, file_size: u64) -> bool {
        file_size <= self.block_size
    }

    /// Block size to use for a file, grown if needed to stay within the block limit
    pub fn block_size_for(&self, file_size: u64) -> u64 {
        if block_count(file_size, self.block_size) <= MAX_BLOCKS {
            self.block_size
        } else {
            file_size.div_ceil(MAX_BLOCKS)
        }
    }
}

/// Number of blocks needed for a file
pub fn block_count(file_size: u64, block_size: u64) -> u64 {
    file_size.div_ceil(block_size)
}

/// Byte range `[start, end)` of a zero-based block
pub fn block_range(index: u64, block_size: u64, file_size: u64) -> (u64, u64) {
    let start = index * block_size;
    let end = (start + block_size).min(file_size);
    (start, end)
}
