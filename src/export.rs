//! JSON export of a dashboard snapshot.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use adminwatch_types::DashboardSnapshot;

use crate::data::{aggregate, HealthSummary};

/// Build the export document for a snapshot.
///
/// Top-level keys: `summary`, `services`, `kafka`, `system`, `timestamp`.
/// Services keep the order of the dashboard payload.
pub fn export_document(snapshot: &DashboardSnapshot, summary: &HealthSummary) -> Result<Value> {
    let mut export = Map::new();

    export.insert(
        "summary".to_string(),
        json!({
            "healthy": summary.healthy_count,
            "total": summary.total_count,
            "health_percentage": summary.health_percentage,
            "average_response_time_ms": summary.average_response_time_ms,
            "fully_healthy": summary.is_fully_healthy(),
        }),
    );

    let services: Vec<Value> = snapshot
        .service_health
        .iter()
        .zip(&summary.comparisons)
        .map(|((name, entry), comparison)| {
            json!({
                "name": name,
                "status": entry.status.as_str(),
                "response_time_ms": entry.response_time_ms,
                "relative": comparison.relative,
                "last_check": entry.last_check,
                "last_successful_check": entry.last_successful_check,
                "error_message": entry.error_message,
                "topics": entry.topics,
            })
        })
        .collect();
    export.insert("services".to_string(), Value::Array(services));

    let kafka = &snapshot.kafka_metrics;
    export.insert(
        "kafka".to_string(),
        json!({
            "broker_count": kafka.broker_count,
            "topic_count": kafka.topic_count,
            "partition_count": kafka.partition_count,
            "topics_per_partition_percent": kafka.topics_per_partition_percent(),
        }),
    );

    let metrics = &snapshot.system_metrics;
    let mut system = match serde_json::to_value(metrics)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    system.insert(
        "memory_usage_percent".to_string(),
        json!(metrics.memory.usage_percent()),
    );
    system.insert(
        "fd_usage_percent".to_string(),
        json!(metrics.process.fd_usage_percent()),
    );
    export.insert("system".to_string(), Value::Object(system));

    export.insert("timestamp".to_string(), json!(snapshot.timestamp));

    Ok(Value::Object(export))
}

/// Write a snapshot's export document to `path` as pretty JSON.
pub fn export_to_file(snapshot: &DashboardSnapshot, path: &Path) -> Result<()> {
    let summary = aggregate(&snapshot.service_health);
    let json = serde_json::to_string_pretty(&export_document(snapshot, &summary)?)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;

    tracing::info!(path = %path.display(), "Exported dashboard snapshot");
    Ok(())
}
