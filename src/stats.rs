//! Per-client request statistics.
//!
//! Each [`Client`](crate::Client) owns a [`Stats`] that counts calls and
//! time spent per logical operation, HTTP statuses received, and retries.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Call count and cumulative time for one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpStats {
    pub calls: u64,
    pub elapsed: Duration,
}

/// Counters collected by a client.
///
/// Named counters written by the client:
///
/// - `received_http_<status>` for every HTTP response
/// - `retries_401` for every re-login triggered by HTTP 401
/// - `retries_500` for every backoff triggered by HTTP 500
#[derive(Debug, Clone, Default)]
pub struct Stats {
    ops: BTreeMap<&'static str, OpStats>,
    counters: BTreeMap<String, u64>,
    backoff: Duration,
}

impl Stats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call of `op` that took `elapsed`.
    pub fn record(&mut self, op: &'static str, elapsed: Duration) {
        let entry = self.ops.entry(op).or_default();
        entry.calls += 1;
        entry.elapsed += elapsed;
    }

    /// Increment a named counter by one.
    pub fn increment(&mut self, name: &str) {
        self.add(name, 1);
    }

    /// Increment a named counter.
    pub fn add(&mut self, name: &str, n: u64) {
        match self.counters.get_mut(name) {
            Some(count) => *count += n,
            None => {
                self.counters.insert(name.to_string(), n);
            }
        }
    }

    /// Add to the total time spent backing off.
    pub fn add_backoff(&mut self, delay: Duration) {
        self.backoff += delay;
    }

    /// Statistics for `op`, if it was ever called.
    pub fn op(&self, op: &str) -> Option<OpStats> {
        self.ops.get(op).copied()
    }

    /// Value of a named counter (zero if never incremented).
    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Total time spent sleeping between HTTP 500 retries.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Iterate over per-operation statistics, ordered by name.
    pub fn ops(&self) -> impl Iterator<Item = (&'static str, OpStats)> + '_ {
        self.ops.iter().map(|(name, stats)| (*name, *stats))
    }

    /// Iterate over named counters, ordered by name.
    pub fn counters(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counters.iter().map(|(name, n)| (name.as_str(), *n))
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, op) in &self.ops {
            writeln!(f, "{}:calls {}", name, op.calls)?;
            writeln!(f, "{}:secs {:.3}", name, op.elapsed.as_secs_f64())?;
        }
        for (name, n) in &self.counters {
            writeln!(f, "{} {}", name, n)?;
        }
        if !self.backoff.is_zero() {
            writeln!(f, "backoff:secs {:.3}", self.backoff.as_secs_f64())?;
        }
        Ok(())
    }
}
