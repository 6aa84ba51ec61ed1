//! Trace-driven set-associative cache simulator: address decoding, LRU sets, parameter sweeps.

pub mod address;
pub mod cache;
pub mod error;
pub mod metrics;
pub mod report;
pub mod set;
pub mod simulator;
pub mod sweep;
pub mod trace;

pub use cache::{AccessOutcome, Cache, CacheConfig, LruPolicy};
pub use error::{Result, SimError};
pub use simulator::{simulate, SweepResult};
