//! Prometheus text exposition parsing.
//!
//! Turns the admin service's `/metrics` body into a [`MetricSnapshot`].
//! Parsing is total: comments, blank lines, malformed lines and metrics we
//! do not know are skipped, and anything not seen keeps its zero default.

use adminwatch_types::MetricSnapshot;

const LATENCY_COUNT: &str = "django_http_requests_latency_including_middlewares_seconds_count";

/// One sample line split into name, raw label block and value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<'a> {
    pub name: &'a str,
    /// Contents of the `{...}` block, without the braces.
    pub labels: Option<&'a str>,
    pub value: f64,
}

impl<'a> Sample<'a> {
    /// Value of the label `key`, if present.
    pub fn label(&self, key: &str) -> Option<&'a str> {
        self.labels.and_then(|block| label_value(block, key))
    }
}

/// Metric families routed into the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    GcCollected,
    GcUncollectable,
    GcCollections,
    VirtualMemory,
    ResidentMemory,
    CpuSeconds,
    OpenFds,
    MaxFds,
    DbExecute,
    DbNewConnections,
    RequestsByMethod,
    LatencySum,
    RuntimeInfo,
}

impl MetricKind {
    fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "python_gc_objects_collected_total" => MetricKind::GcCollected,
            "python_gc_objects_uncollectable_total" => MetricKind::GcUncollectable,
            "python_gc_collections_total" => MetricKind::GcCollections,
            "process_virtual_memory_bytes" => MetricKind::VirtualMemory,
            "process_resident_memory_bytes" => MetricKind::ResidentMemory,
            "process_cpu_seconds_total" => MetricKind::CpuSeconds,
            "process_open_fds" => MetricKind::OpenFds,
            "process_max_fds" => MetricKind::MaxFds,
            "django_db_execute_total" => MetricKind::DbExecute,
            "django_db_new_connections_total" => MetricKind::DbNewConnections,
            "django_http_requests_total_by_method_total" => MetricKind::RequestsByMethod,
            "django_http_requests_latency_including_middlewares_seconds_sum" => {
                MetricKind::LatencySum
            }
            "python_info" => MetricKind::RuntimeInfo,
            _ => return None,
        };
        Some(kind)
    }
}

/// Parse an exposition text payload into a snapshot.
///
/// Never fails. Integer fields are filled by truncating the exported float
/// toward zero; negative and NaN values become 0.
pub fn parse(text: &str) -> MetricSnapshot {
    let lines: Vec<&str> = text.lines().collect();
    let mut snapshot = MetricSnapshot::default();
    let mut skipped = 0usize;

    for line in &lines {
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let Some(sample) = parse_sample(line) else {
            skipped += 1;
            continue;
        };

        match MetricKind::from_name(sample.name) {
            Some(kind) => apply(&mut snapshot, kind, &sample, &lines),
            None => skipped += 1,
        }
    }

    tracing::trace!(lines = lines.len(), skipped, "parsed metrics exposition");
    snapshot
}

/// Split a sample line of the form `name{labels} value [timestamp]`.
///
/// Returns `None` for lines that do not follow that shape or whose value is
/// not a finite number.
pub fn parse_sample(line: &str) -> Option<Sample<'_>> {
    let line = line.trim();
    let name_end = line.find(|c: char| c == '{' || c.is_whitespace())?;
    let name = &line[..name_end];
    if name.is_empty() {
        return None;
    }

    let mut rest = &line[name_end..];
    let mut labels = None;
    if let Some(block) = rest.strip_prefix('{') {
        let close = block.find('}')?;
        let inner = block[..close].trim();
        if !inner.is_empty() {
            labels = Some(inner);
        }
        rest = &block[close + 1..];
    }

    // The value must be separated from the name or label block.
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }

    let value: f64 = rest.split_whitespace().next()?.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(Sample {
        name,
        labels,
        value,
    })
}

/// Find `key="value"` in a label block and return the raw value.
fn label_value<'a>(block: &'a str, key: &str) -> Option<&'a str> {
    let mut rest = block;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if rest.is_empty() {
            return None;
        }

        let eq = rest.find('=')?;
        let name = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start().strip_prefix('"')?;

        // Closing quote is the first one not preceded by a backslash.
        let mut end = None;
        let mut escaped = false;
        for (i, c) in after.char_indices() {
            match c {
                '\\' if !escaped => escaped = true,
                '"' if !escaped => {
                    end = Some(i);
                    break;
                }
                _ => escaped = false,
            }
        }
        let end = end?;

        if name == key {
            return Some(&after[..end]);
        }
        rest = &after[end + 1..];
    }
}

fn apply(snapshot: &mut MetricSnapshot, kind: MetricKind, sample: &Sample<'_>, lines: &[&str]) {
    let value = sample.value;
    match kind {
        MetricKind::GcCollected => {
            if let Some(generation) = generation(sample) {
                snapshot
                    .gc_stats
                    .collected
                    .insert(generation.to_string(), truncate(value));
            }
        }
        MetricKind::GcUncollectable => {
            if let Some(generation) = generation(sample) {
                snapshot
                    .gc_stats
                    .uncollectable
                    .insert(generation.to_string(), truncate(value));
            }
        }
        MetricKind::GcCollections => {
            if let Some(generation) = generation(sample) {
                snapshot
                    .gc_stats
                    .collections
                    .insert(generation.to_string(), truncate(value));
            }
        }
        MetricKind::VirtualMemory => snapshot.memory.virtual_bytes = truncate(value),
        MetricKind::ResidentMemory => snapshot.memory.resident_bytes = truncate(value),
        MetricKind::CpuSeconds => snapshot.process.cpu_seconds = value,
        MetricKind::OpenFds => snapshot.process.open_fds = truncate(value),
        MetricKind::MaxFds => snapshot.process.max_fds = truncate(value),
        MetricKind::DbExecute => {
            if sample.label("alias") == Some("default") {
                snapshot.request_stats.db_queries = truncate(value);
            }
        }
        MetricKind::DbNewConnections => {
            if sample.label("alias") == Some("default") {
                snapshot.request_stats.db_connections = truncate(value);
            }
        }
        MetricKind::RequestsByMethod => {
            if sample.label("method") == Some("GET") {
                snapshot.request_stats.requests_total = truncate(value);
            }
        }
        MetricKind::LatencySum => {
            // Only the first `_count` line counts, even if its value is unusable.
            let count = lines
                .iter()
                .map(|line| line.trim_start())
                .find(|line| line.starts_with(LATENCY_COUNT))
                .and_then(parse_sample)
                .filter(|s| s.name == LATENCY_COUNT)
                .map_or(0.0, |s| s.value);
            if count > 0.0 {
                snapshot.request_stats.response_time_avg_ms = value * 1000.0 / count;
            }
        }
        MetricKind::RuntimeInfo => {
            if sample.labels.is_some() {
                let part = |key: &str| sample.label(key).unwrap_or_default();
                snapshot.runtime_info.implementation = part("implementation").to_string();
                snapshot.runtime_info.version =
                    format!("{}.{}.{}", part("major"), part("minor"), part("patchlevel"));
            }
        }
    }
}

/// The `generation` label, only if it is a non-empty run of digits.
fn generation<'a>(sample: &Sample<'a>) -> Option<&'a str> {
    sample
        .label("generation")
        .filter(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()))
}

/// Counters are exported as floats; integer fields truncate toward zero.
fn truncate(value: f64) -> u64 {
    value as u64
}
