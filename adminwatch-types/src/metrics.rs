//! Process and runtime metrics parsed from the exposition text.

use std::collections::BTreeMap;

use crate::percent_of;

/// A point-in-time view of the admin service's own process metrics.
///
/// Built wholesale from one metrics payload and replaced on the next poll.
/// Every field defaults to zero or an empty string, so a payload that
/// mentions none of the recognized metrics yields `MetricSnapshot::default()`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MetricSnapshot {
    /// Garbage collector counters, keyed by generation.
    pub gc_stats: GcStats,
    /// Virtual and resident memory.
    pub memory: MemoryStats,
    /// Interpreter version and implementation.
    pub runtime_info: RuntimeInfo,
    /// CPU time and file descriptors.
    pub process: ProcessStats,
    /// Database and HTTP request counters.
    pub request_stats: RequestStats,
}

impl MetricSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if nothing was recognized.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Garbage collector counters per generation id ("0", "1", "2", ...).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GcStats {
    /// Objects collected, per generation.
    pub collected: BTreeMap<String, u64>,
    /// Uncollectable objects found, per generation.
    pub uncollectable: BTreeMap<String, u64>,
    /// Number of collection passes, per generation.
    pub collections: BTreeMap<String, u64>,
}

impl GcStats {
    /// Total objects collected across all generations.
    pub fn total_collected(&self) -> u64 {
        self.collected.values().sum()
    }

    /// Total collection passes across all generations.
    pub fn total_collections(&self) -> u64 {
        self.collections.values().sum()
    }
}

/// Process memory in bytes.
///
/// `resident_bytes <= virtual_bytes` is expected but not enforced; the
/// values are reported exactly as exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoryStats {
    pub virtual_bytes: u64,
    pub resident_bytes: u64,
}

impl MemoryStats {
    /// Resident memory as a percentage of virtual memory (0.0 if unknown).
    pub fn usage_percent(&self) -> f64 {
        percent_of(self.resident_bytes as f64, self.virtual_bytes as f64)
    }
}

/// Interpreter information from the `python_info` metric.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeInfo {
    /// `major.minor.patchlevel`.
    pub version: String,
    /// e.g. "CPython".
    pub implementation: String,
}

/// CPU time and file descriptor usage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProcessStats {
    pub cpu_seconds: f64,
    pub open_fds: u64,
    pub max_fds: u64,
}

impl ProcessStats {
    /// Open descriptors as a percentage of the limit (0.0 if no limit is known).
    pub fn fd_usage_percent(&self) -> f64 {
        percent_of(self.open_fds as f64, self.max_fds as f64)
    }
}

/// Database and HTTP request counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RequestStats {
    /// New connections opened on the default database alias.
    pub db_connections: u64,
    /// Queries executed on the default database alias.
    pub db_queries: u64,
    /// GET requests served.
    pub requests_total: u64,
    /// Mean request latency including middlewares, in milliseconds.
    ///
    /// Stays at 0.0 when the latency histogram has no observations.
    pub response_time_avg_ms: f64,
}
