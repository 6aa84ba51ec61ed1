//! Parameter sweeps: a fixed configuration plus one-at-a-time variation of
//! cache size, block size and associativity, over a set of traces.

use crate::cache::{CacheConfig, LruPolicy};
use crate::error::SimError;
use crate::simulator::{simulate, SweepResult};
use crate::trace::TraceFile;
use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Trace names used by the reference sweep (`<name>.trace`).
pub const REFERENCE_TRACES: [&str; 5] = ["gcc", "gzip", "mcf", "swim", "twolf"];

/// Which parameter a job varies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SweepKind {
    Fixed,
    CacheSize,
    BlockSize,
    Associativity,
}

impl fmt::Display for SweepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepKind::Fixed => write!(f, "fixed"),
            SweepKind::CacheSize => write!(f, "cache size"),
            SweepKind::BlockSize => write!(f, "block size"),
            SweepKind::Associativity => write!(f, "associativity"),
        }
    }
}

/// Powers of two from `start` up to and including `end`.
pub fn doublings(start: u64, end: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let mut v = start;
    while v > 0 && v <= end {
        out.push(v);
        v = match v.checked_mul(2) {
            Some(next) => next,
            None => break,
        };
    }
    out
}

/// Sweep configuration. `Default` is the reference sweep.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// Values held fixed while another parameter varies.
    pub fixed: CacheConfig,
    pub cache_sizes: Vec<u64>,
    pub block_sizes: Vec<u64>,
    pub associativities: Vec<usize>,
    pub traces: Vec<PathBuf>,
    /// Run jobs on the rayon pool. Output order is unaffected.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            fixed: CacheConfig::default(),
            cache_sizes: doublings(128 * 1024, 4096 * 1024),
            block_sizes: doublings(1, 128),
            associativities: doublings(1, 64).into_iter().map(|a| a as usize).collect(),
            traces: REFERENCE_TRACES
                .iter()
                .map(|name| PathBuf::from(format!("{name}.trace")))
                .collect(),
            parallel: false,
        }
    }
}

impl SweepConfig {
    pub fn with_policy(mut self, policy: LruPolicy) -> Self {
        self.fixed.policy = policy;
        self
    }

    /// All jobs in output order: the fixed run per trace, then each sweep per trace.
    pub fn plan(&self) -> Vec<SweepJob> {
        let mut jobs = Vec::new();
        let fixed = self.fixed;
        let mut push = |kind, trace: &PathBuf, config| {
            jobs.push(SweepJob {
                kind,
                trace: trace.clone(),
                config,
            })
        };

        for trace in &self.traces {
            push(SweepKind::Fixed, trace, fixed);
        }
        for trace in &self.traces {
            for &size_bytes in &self.cache_sizes {
                push(SweepKind::CacheSize, trace, CacheConfig { size_bytes, ..fixed });
            }
        }
        for trace in &self.traces {
            for &block_size in &self.block_sizes {
                push(SweepKind::BlockSize, trace, CacheConfig { block_size, ..fixed });
            }
        }
        for trace in &self.traces {
            for &associativity in &self.associativities {
                push(
                    SweepKind::Associativity,
                    trace,
                    CacheConfig {
                        associativity,
                        ..fixed
                    },
                );
            }
        }
        jobs
    }
}

/// One independent simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepJob {
    pub kind: SweepKind,
    pub trace: PathBuf,
    pub config: CacheConfig,
}

/// A job that produced no row, and why.
#[derive(Debug)]
pub struct Skipped {
    pub job: SweepJob,
    pub reason: String,
}

/// Everything a sweep produced, rows in plan order.
#[derive(Debug, Default)]
pub struct SweepOutcome {
    pub results: Vec<SweepResult>,
    pub skipped: Vec<Skipped>,
}

/// Runs every job of `config.plan()`. Configuration errors and unreadable
/// traces skip the affected jobs; nothing here aborts the sweep.
pub fn run_sweep(config: &SweepConfig) -> SweepOutcome {
    let jobs = config.plan();
    info!(
        "sweep: {} jobs over {} traces ({})",
        jobs.len(),
        config.traces.len(),
        config.fixed.policy
    );

    // Each trace is read once and shared read-only by all of its jobs.
    let mut traces: HashMap<PathBuf, Result<TraceFile, String>> = HashMap::new();
    for path in &config.traces {
        traces.entry(path.clone()).or_insert_with(|| {
            TraceFile::load(path).map_err(|e| {
                warn!("{e}");
                e.to_string()
            })
        });
    }

    let run_job = |job: &SweepJob| -> Result<SweepResult, String> {
        let trace = match traces.get(&job.trace) {
            Some(Ok(trace)) => trace,
            Some(Err(reason)) => return Err(reason.clone()),
            None => return Err(format!("trace {} not loaded", job.trace.display())),
        };
        simulate(job.config, trace).map_err(|e| {
            if matches!(e, SimError::Configuration(_)) {
                warn!("skipping {} sweep on {}: {e}", job.kind, trace.name);
            }
            e.to_string()
        })
    };

    let outcomes: Vec<Result<SweepResult, String>> = if config.parallel {
        jobs.par_iter().map(run_job).collect()
    } else {
        jobs.iter().map(run_job).collect()
    };

    let mut out = SweepOutcome::default();
    for (job, outcome) in jobs.into_iter().zip(outcomes) {
        match outcome {
            Ok(result) => out.results.push(result),
            Err(reason) => out.skipped.push(Skipped { job, reason }),
        }
    }
    info!(
        "sweep finished: {} results, {} skipped",
        out.results.len(),
        out.skipped.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doublings_inclusive() {
        assert_eq!(doublings(1, 128), vec![1, 2, 4, 8, 16, 32, 64, 128]);
        assert_eq!(doublings(128 * 1024, 4096 * 1024).len(), 6);
        assert_eq!(doublings(3, 2), Vec::<u64>::new());
        assert_eq!(doublings(0, 8), Vec::<u64>::new());
    }

    #[test]
    fn reference_plan_shape() {
        let plan = SweepConfig::default().plan();
        // 5 fixed + 5 * (6 + 8 + 7)
        assert_eq!(plan.len(), 5 + 5 * 21);
        assert_eq!(plan[0].kind, SweepKind::Fixed);
        assert_eq!(plan[0].trace, PathBuf::from("gcc.trace"));
        assert_eq!(plan[0].config, CacheConfig::default());
        assert_eq!(plan[5].kind, SweepKind::CacheSize);
        assert_eq!(plan[5].config.size_bytes, 128 * 1024);
        assert_eq!(plan[5].config.block_size, 4);
        assert_eq!(plan[5].config.associativity, 4);
        let last = plan.last().unwrap();
        assert_eq!(last.kind, SweepKind::Associativity);
        assert_eq!(last.trace, PathBuf::from("twolf.trace"));
        assert_eq!(last.config.associativity, 64);
        assert_eq!(last.config.size_bytes, 1024 * 1024);
    }

    #[test]
    fn policy_carried_into_every_job() {
        let plan = SweepConfig::default()
            .with_policy(LruPolicy::FullOrder)
            .plan();
        assert!(plan.iter().all(|j| j.config.policy == LruPolicy::FullOrder));
    }

    #[test]
    fn missing_traces_are_skipped_not_fatal() {
        let config = SweepConfig {
            traces: vec![PathBuf::from("/nonexistent/trace-cache-sim/a.trace")],
            cache_sizes: vec![1024],
            block_sizes: vec![],
            associativities: vec![],
            ..SweepConfig::default()
        };
        let out = run_sweep(&config);
        assert!(out.results.is_empty());
        assert_eq!(out.skipped.len(), 2);
        assert!(out.skipped[0].reason.contains("trace unavailable"));
    }
}
