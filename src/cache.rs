//! Cache model: set-associative with configurable size, block size, associativity and LRU policy.

use crate::address::AddressDecoder;
use crate::error::{Result, SimError};
use crate::metrics::CacheStats;
use crate::set::ReplacementSet;
use log::debug;

pub use crate::set::{AccessOutcome, LruPolicy};

/// Geometry and replacement policy of one cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheConfig {
    /// Total cache size in bytes.
    pub size_bytes: u64,
    /// Block size in bytes.
    pub block_size: u64,
    /// Associativity (number of ways per set).
    pub associativity: usize,
    pub policy: LruPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: 1024 * 1024,
            block_size: 4,
            associativity: 4,
            policy: LruPolicy::TouchOnly,
        }
    }
}

impl CacheConfig {
    /// `size / (block * associativity)`, integer division. Zero if the
    /// divisor is zero or larger than the cache.
    pub fn num_sets(&self) -> u64 {
        self.block_size
            .checked_mul(self.associativity as u64)
            .filter(|&d| d > 0)
            .map_or(0, |d| self.size_bytes / d)
    }

    /// Checks everything the address arithmetic relies on.
    pub fn validate(&self) -> Result<()> {
        if self.associativity == 0 {
            return Err(SimError::Configuration(
                "associativity must be at least 1".into(),
            ));
        }
        if !self.block_size.is_power_of_two() {
            return Err(SimError::Configuration(format!(
                "block size {} is not a power of two",
                self.block_size
            )));
        }
        let num_sets = self.num_sets();
        if num_sets == 0 {
            return Err(SimError::Configuration(format!(
                "{} bytes cannot hold one set of {} x {}-byte blocks",
                self.size_bytes, self.associativity, self.block_size
            )));
        }
        if !num_sets.is_power_of_two() {
            return Err(SimError::Configuration(format!(
                "set count {num_sets} is not a power of two"
            )));
        }
        Ok(())
    }
}

/// A single cache instance with its own counters.
pub struct Cache {
    config: CacheConfig,
    sets: Vec<ReplacementSet>,
    decoder: AddressDecoder,
    stats: CacheStats,
}

impl Cache {
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let num_sets = config.num_sets();
        let sets = (0..num_sets)
            .map(|_| ReplacementSet::new(config.associativity, config.policy))
            .collect();
        debug!(
            "cache {} B, {} B blocks, {}-way, {} sets, {}",
            config.size_bytes, config.block_size, config.associativity, num_sets, config.policy
        );
        Ok(Self {
            config,
            sets,
            decoder: AddressDecoder::new(config.block_size, num_sets),
            stats: CacheStats::new(),
        })
    }

    /// Access the cache. On a miss the block is installed over the set's LRU victim.
    pub fn access(&mut self, address: u64) -> AccessOutcome {
        let (set_idx, tag) = self.decoder.decode(address);
        let outcome = self.sets[set_idx].access(tag, self.stats.accesses);
        self.stats.record(outcome);
        outcome
    }

    /// Replay every address, returning the final counters.
    pub fn run<I>(&mut self, addresses: I) -> CacheStats
    where
        I: IntoIterator<Item = u64>,
    {
        for address in addresses {
            self.access(address);
        }
        self.stats
    }

    /// Invalidate all lines and zero the counters.
    pub fn reset(&mut self) {
        self.sets.iter_mut().for_each(ReplacementSet::clear);
        self.stats = CacheStats::new();
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    pub fn sets(&self) -> &[ReplacementSet] {
        &self.sets
    }
}
