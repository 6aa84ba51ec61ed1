//! Replays a trace through one freshly built cache and summarises the run.

use crate::cache::{Cache, CacheConfig};
use crate::error::Result;
use crate::metrics::CacheStats;
use crate::trace::TraceFile;
use log::info;

/// One row of the result table. Rates are `None` when the trace was empty.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepResult {
    pub trace_id: String,
    pub cache_size_kb: u64,
    pub block_size_bytes: u64,
    pub associativity: usize,
    pub hit_rate_percent: Option<f64>,
    pub miss_rate_percent: Option<f64>,
}

impl SweepResult {
    pub fn new(trace_id: impl Into<String>, config: &CacheConfig, stats: &CacheStats) -> Self {
        Self {
            trace_id: trace_id.into(),
            cache_size_kb: config.size_bytes / 1024,
            block_size_bytes: config.block_size,
            associativity: config.associativity,
            hit_rate_percent: stats.hit_rate(),
            miss_rate_percent: stats.miss_rate(),
        }
    }
}

/// Owns the cache for a single configuration. Never shared between runs.
pub struct Simulator {
    cache: Cache,
}

impl Simulator {
    pub fn new(config: CacheConfig) -> Result<Self> {
        Ok(Self {
            cache: Cache::new(config)?,
        })
    }

    /// Feed every record of `trace` to the cache.
    pub fn replay(&mut self, trace: &TraceFile) -> &CacheStats {
        self.cache.run(trace.addresses());
        self.cache.stats()
    }

    pub fn result(&self, trace_id: &str) -> SweepResult {
        SweepResult::new(trace_id, self.cache.config(), self.cache.stats())
    }

    pub fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }
}

/// Build a cache for `config`, replay `trace`, and return its summary row.
pub fn simulate(config: CacheConfig, trace: &TraceFile) -> Result<SweepResult> {
    let mut sim = Simulator::new(config)?;
    let stats = *sim.replay(trace);
    let result = sim.result(&trace.name);
    match stats.hit_rate() {
        Some(hit) => info!(
            "{}: {} KB, {} B blocks, {}-way: {} hits / {} misses ({:.2}%)",
            trace.name,
            result.cache_size_kb,
            result.block_size_bytes,
            result.associativity,
            stats.hits,
            stats.misses,
            hit
        ),
        None => info!("{}: empty trace, hit rate undefined", trace.name),
    }
    Ok(result)
}
