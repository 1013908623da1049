//! Plain-text rendering of the dashboard state.
//!
//! Produces the summary printed by the CLI: overall health, one line per
//! service, the broker panel and the process metrics panel.

use std::fmt::Write;

use adminwatch_types::{DashboardSnapshot, MetricSnapshot};

use crate::dashboard::DashboardState;
use crate::data::units::{format_bytes, format_millis};
use crate::data::HealthSummary;

/// Render the whole dashboard state.
pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();

    if let Some(error) = &state.last_error {
        let _ = writeln!(out, "error: {}", error);
    }

    match (&state.snapshot, &state.summary) {
        (Some(snapshot), Some(summary)) => render_snapshot(&mut out, snapshot, summary),
        _ => out.push_str("No dashboard data yet\n"),
    }

    out
}

/// Render one snapshot with its health summary.
pub fn render_snapshot(out: &mut String, snapshot: &DashboardSnapshot, summary: &HealthSummary) {
    let _ = writeln!(out, "Dashboard at {}", snapshot.timestamp.to_rfc3339());
    let _ = writeln!(
        out,
        "Health: {}/{} services healthy ({:.2}%){}",
        summary.healthy_count,
        summary.total_count,
        summary.health_percentage,
        if summary.is_fully_healthy() { " all clear" } else { "" }
    );
    let _ = writeln!(
        out,
        "Average response time: {}",
        format_millis(summary.average_response_time_ms)
    );

    out.push_str("\nServices\n");
    for ((name, entry), comparison) in snapshot.service_health.iter().zip(&summary.comparisons) {
        let _ = write!(
            out,
            "  [{:<4}] {:<24} {:>10}  {}",
            entry.status.symbol(),
            name,
            format_millis(entry.response_time_ms),
            comparison.relative.label()
        );
        if let Some(topics) = entry.topics {
            let _ = write!(out, "  topics={}", topics);
        }
        if let Some(error) = &entry.error_message {
            let _ = write!(out, "  ({})", error);
        }
        out.push('\n');
    }

    let kafka = &snapshot.kafka_metrics;
    out.push_str("\nKafka\n");
    let _ = writeln!(out, "  brokers:    {}", kafka.broker_count);
    let _ = writeln!(
        out,
        "  topics:     {} ({:.2}% of partitions)",
        kafka.topic_count,
        kafka.topics_per_partition_percent()
    );
    let _ = writeln!(out, "  partitions: {}", kafka.partition_count);

    render_system(out, &snapshot.system_metrics);
}

fn render_system(out: &mut String, metrics: &MetricSnapshot) {
    out.push_str("\nSystem\n");

    let runtime = &metrics.runtime_info;
    if !runtime.implementation.is_empty() || !runtime.version.is_empty() {
        let _ = writeln!(
            out,
            "  runtime:  {} {}",
            runtime.implementation, runtime.version
        );
    }

    let _ = writeln!(
        out,
        "  memory:   {} resident / {} virtual ({:.2}%)",
        format_bytes(metrics.memory.resident_bytes),
        format_bytes(metrics.memory.virtual_bytes),
        metrics.memory.usage_percent()
    );
    let _ = writeln!(out, "  cpu:      {:.2}s", metrics.process.cpu_seconds);
    let _ = writeln!(
        out,
        "  fds:      {} / {} ({:.2}%)",
        metrics.process.open_fds,
        metrics.process.max_fds,
        metrics.process.fd_usage_percent()
    );

    let requests = &metrics.request_stats;
    let _ = writeln!(
        out,
        "  requests: {} GET, avg {}",
        requests.requests_total,
        format_millis(requests.response_time_avg_ms)
    );
    let _ = writeln!(
        out,
        "  database: {} queries, {} connections",
        requests.db_queries, requests.db_connections
    );

    let gc = &metrics.gc_stats;
    for (generation, collected) in &gc.collected {
        let collections = gc.collections.get(generation).copied().unwrap_or(0);
        let uncollectable = gc.uncollectable.get(generation).copied().unwrap_or(0);
        let _ = writeln!(
            out,
            "  gc gen {}: {} collected, {} collections, {} uncollectable",
            generation, collected, collections, uncollectable
        );
    }
}
