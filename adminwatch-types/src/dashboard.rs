//! The dashboard payload and the merged dashboard snapshot.

use chrono::{DateTime, Utc};

use crate::{percent_of, MetricSnapshot, ServiceHealthMap};

/// Message broker cluster counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KafkaMetrics {
    pub broker_count: u64,
    pub topic_count: u64,
    pub partition_count: u64,
}

impl KafkaMetrics {
    /// Topics as a percentage of partitions (0.0 with no partitions).
    pub fn topics_per_partition_percent(&self) -> f64 {
        percent_of(self.topic_count as f64, self.partition_count as f64)
    }
}

/// The `service_metrics` object of the dashboard payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServiceMetrics {
    pub kafka: KafkaMetrics,
}

/// The JSON document returned by the admin service's dashboard endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardPayload {
    #[cfg_attr(feature = "serde", serde(default))]
    pub service_health: ServiceHealthMap,
    #[cfg_attr(feature = "serde", serde(default))]
    pub service_metrics: ServiceMetrics,
    /// When the admin service assembled the payload.
    pub timestamp: DateTime<Utc>,
}

/// A complete, merged view of the admin dashboard for one poll tick.
///
/// Built from one [`DashboardPayload`] and one [`MetricSnapshot`] and never
/// modified afterwards; the next tick builds a new one.
///
/// # Example
///
/// ```rust
/// use adminwatch_types::{DashboardSnapshot, HealthState, MetricSnapshot, ServiceHealthEntry};
///
/// let snapshot = DashboardSnapshot::builder()
///     .service("user-service", ServiceHealthEntry::new(HealthState::Healthy, 12.0))
///     .kafka(3, 12, 36)
///     .system_metrics(MetricSnapshot::default())
///     .build();
///
/// assert_eq!(snapshot.service_health.len(), 1);
/// assert_eq!(snapshot.kafka_metrics.broker_count, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardSnapshot {
    pub service_health: ServiceHealthMap,
    pub kafka_metrics: KafkaMetrics,
    pub system_metrics: MetricSnapshot,
    /// Timestamp reported by the dashboard payload.
    pub timestamp: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Merge a dashboard payload with parsed process metrics.
    pub fn from_parts(payload: DashboardPayload, system_metrics: MetricSnapshot) -> Self {
        Self {
            service_health: payload.service_health,
            kafka_metrics: payload.service_metrics.kafka,
            system_metrics,
            timestamp: payload.timestamp,
        }
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> DashboardSnapshotBuilder {
        DashboardSnapshotBuilder::new()
    }
}

/// Builder for constructing `DashboardSnapshot` instances.
#[derive(Debug, Default)]
pub struct DashboardSnapshotBuilder {
    service_health: ServiceHealthMap,
    kafka_metrics: KafkaMetrics,
    system_metrics: MetricSnapshot,
    timestamp: Option<DateTime<Utc>>,
}

impl DashboardSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service health entry.
    pub fn service(mut self, name: impl Into<String>, entry: crate::ServiceHealthEntry) -> Self {
        self.service_health.insert(name, entry);
        self
    }

    /// Set broker, topic and partition counts.
    pub fn kafka(mut self, brokers: u64, topics: u64, partitions: u64) -> Self {
        self.kafka_metrics = KafkaMetrics {
            broker_count: brokers,
            topic_count: topics,
            partition_count: partitions,
        };
        self
    }

    pub fn system_metrics(mut self, metrics: MetricSnapshot) -> Self {
        self.system_metrics = metrics;
        self
    }

    /// Set a specific timestamp.
    pub fn timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }

    /// Build the snapshot, stamping it now if no timestamp was given.
    pub fn build(self) -> DashboardSnapshot {
        DashboardSnapshot {
            service_health: self.service_health,
            kafka_metrics: self.kafka_metrics,
            system_metrics: self.system_metrics,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}
