//! Hit/miss counters for one simulation run and the rates derived from them.

use crate::error::{Result, SimError};
use crate::set::AccessOutcome;

/// Counters owned by one `Cache` instance.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Cache hits.
    pub hits: u64,
    /// Cache misses.
    pub misses: u64,
    /// Accesses so far; also the recency stamp handed to the sets.
    pub accesses: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: AccessOutcome) {
        self.accesses += 1;
        match outcome {
            AccessOutcome::Hit => self.hits += 1,
            AccessOutcome::Miss => self.misses += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate in percent, `None` before any access.
    pub fn hit_rate(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        Some(self.hits as f64 / total as f64 * 100.0)
    }

    /// Miss rate in percent, `None` before any access.
    pub fn miss_rate(&self) -> Option<f64> {
        self.hit_rate().map(|hit| 100.0 - hit)
    }

    /// Both rates, or `UndefinedRate` when nothing was simulated.
    pub fn rates(&self) -> Result<(f64, f64)> {
        match (self.hit_rate(), self.miss_rate()) {
            (Some(hit), Some(miss)) => Ok((hit, miss)),
            _ => Err(SimError::UndefinedRate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_undefined_without_accesses() {
        let s = CacheStats::new();
        assert_eq!(s.hit_rate(), None);
        assert_eq!(s.miss_rate(), None);
        assert!(matches!(s.rates(), Err(SimError::UndefinedRate)));
    }

    #[test]
    fn rates_from_counters() {
        let s = CacheStats {
            hits: 75,
            misses: 25,
            accesses: 100,
        };
        let (hit, miss) = s.rates().unwrap();
        assert!((hit - 75.0).abs() < 1e-9);
        assert!((miss - 25.0).abs() < 1e-9);
    }

    #[test]
    fn record_classifies_every_access() {
        let mut s = CacheStats::new();
        s.record(AccessOutcome::Hit);
        s.record(AccessOutcome::Miss);
        s.record(AccessOutcome::Miss);
        assert_eq!(s.accesses, 3);
        assert_eq!(s.total(), 3);
        assert!((s.hit_rate().unwrap() - 100.0 / 3.0).abs() < 1e-9);
        assert!((s.miss_rate().unwrap() - 200.0 / 3.0).abs() < 1e-9);
    }
}
