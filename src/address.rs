//! Address decomposition into tag / set index / block offset.
//!
//! Both `block_size` and `num_sets` must be powers of two; the shift and mask
//! arithmetic below assumes it. `Cache::new` checks this once per geometry.

/// Number of offset bits for a block of `block_size` bytes.
pub fn offset_bits(block_size: u64) -> u32 {
    block_size.trailing_zeros()
}

/// Number of index bits needed to select one of `num_sets` sets.
pub fn index_bits(num_sets: u64) -> u32 {
    num_sets.trailing_zeros()
}

/// Set index for `address`.
pub fn index(address: u64, block_size: u64, num_sets: u64) -> usize {
    ((address >> offset_bits(block_size)) & (num_sets - 1)) as usize
}

/// Tag bits of `address` (everything above offset and index).
pub fn tag(address: u64, block_size: u64, num_sets: u64) -> u64 {
    let shift = offset_bits(block_size) + index_bits(num_sets);
    address.checked_shr(shift).unwrap_or(0)
}

/// Precomputed decoder for one cache geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressDecoder {
    /// log2(block size).
    offset_bits: u32,
    /// Mask applied after removing the offset bits (num_sets - 1).
    set_mask: u64,
    /// log2(num sets).
    index_bits: u32,
}

impl AddressDecoder {
    pub fn new(block_size: u64, num_sets: u64) -> Self {
        Self {
            offset_bits: offset_bits(block_size),
            set_mask: num_sets - 1,
            index_bits: index_bits(num_sets),
        }
    }

    /// Returns (set_index, tag) for the given address.
    pub fn decode(&self, address: u64) -> (usize, u64) {
        let block_addr = address >> self.offset_bits;
        let set_index = (block_addr & self.set_mask) as usize;
        let tag = block_addr.checked_shr(self.index_bits).unwrap_or(0);
        (set_index, tag)
    }

    /// Byte offset within the block.
    pub fn offset(&self, address: u64) -> u64 {
        address & ((1u64 << self.offset_bits) - 1)
    }
}
