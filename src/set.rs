//! One associative set: fixed ways, LRU replacement with two recency policies.

use log::trace;
use std::fmt;

/// Result of a cache access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    Miss,
}

/// How recency is tracked inside a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LruPolicy {
    /// Only the matched or installed line is stamped with the access counter.
    /// Victim = valid line with the smallest stamp.
    #[default]
    TouchOnly,
    /// Every access reorders the whole set: the matched or installed line gets
    /// age 0 and every other valid line ages by one. Victim = oldest valid line.
    FullOrder,
}

impl fmt::Display for LruPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LruPolicy::TouchOnly => write!(f, "touch-only"),
            LruPolicy::FullOrder => write!(f, "full-order"),
        }
    }
}

/// One cache line. `tag` and `recency` are meaningful only while `valid`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
    /// Access stamp under `TouchOnly`, age under `FullOrder`.
    pub recency: u64,
}

/// One set of `associativity` ways.
#[derive(Clone, Debug)]
pub struct ReplacementSet {
    lines: Vec<CacheLine>,
    policy: LruPolicy,
}

impl ReplacementSet {
    pub fn new(associativity: usize, policy: LruPolicy) -> Self {
        Self {
            lines: vec![CacheLine::default(); associativity],
            policy,
        }
    }

    /// Look up `tag`; on a miss, install it over the LRU victim.
    /// `now` is the owning cache's access counter.
    pub fn access(&mut self, tag: u64, now: u64) -> AccessOutcome {
        if let Some(way) = self.lines.iter().position(|l| l.valid && l.tag == tag) {
            self.touch(way, now);
            return AccessOutcome::Hit;
        }

        let victim = self.victim();
        let line = &mut self.lines[victim];
        if line.valid {
            trace!("evict way {} tag {:#x} for tag {:#x}", victim, line.tag, tag);
        }
        line.valid = true;
        line.tag = tag;
        self.touch(victim, now);
        AccessOutcome::Miss
    }

    /// First invalid way, otherwise the least recently used valid way
    /// (lowest index on ties).
    fn victim(&self) -> usize {
        if let Some(way) = self.lines.iter().position(|l| !l.valid) {
            return way;
        }
        let mut victim = 0;
        for (way, line) in self.lines.iter().enumerate().skip(1) {
            let older = match self.policy {
                LruPolicy::TouchOnly => line.recency < self.lines[victim].recency,
                LruPolicy::FullOrder => line.recency > self.lines[victim].recency,
            };
            if older {
                victim = way;
            }
        }
        victim
    }

    fn touch(&mut self, way: usize, now: u64) {
        match self.policy {
            LruPolicy::TouchOnly => self.lines[way].recency = now,
            LruPolicy::FullOrder => {
                for (i, line) in self.lines.iter_mut().enumerate() {
                    if i == way {
                        line.recency = 0;
                    } else if line.valid {
                        line.recency += 1;
                    }
                }
            }
        }
    }

    /// Invalidate every way.
    pub fn clear(&mut self) {
        self.lines.fill(CacheLine::default());
    }

    pub fn contains(&self, tag: u64) -> bool {
        self.lines.iter().any(|l| l.valid && l.tag == tag)
    }

    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    pub fn associativity(&self) -> usize {
        self.lines.len()
    }

    pub fn policy(&self) -> LruPolicy {
        self.policy
    }
}
