//! Service health aggregation.
//!
//! Reduces the per-service health map into the summary shown at the top of
//! the dashboard. Pure and recomputed from scratch on every call.

use serde::Serialize;

use adminwatch_types::{percent_of, ServiceHealthMap};

/// Where a service's response time sits relative to the mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeLatency {
    BelowAverage,
    AboveAverage,
}

impl RelativeLatency {
    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            RelativeLatency::BelowAverage => "below average",
            RelativeLatency::AboveAverage => "above average",
        }
    }
}

/// One service's response time compared to the mean of all services.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceComparison {
    pub service: String,
    pub response_time_ms: f64,
    pub relative: RelativeLatency,
}

/// Aggregate statistics over all services.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub healthy_count: usize,
    pub total_count: usize,
    /// 0.0 when there are no services.
    pub health_percentage: f64,
    /// Mean response time; 0.0 when there are no services.
    pub average_response_time_ms: f64,
    /// One entry per service, in map order.
    pub comparisons: Vec<ServiceComparison>,
}

impl HealthSummary {
    /// True when at least one service is known and all of them are healthy.
    pub fn is_fully_healthy(&self) -> bool {
        self.total_count > 0 && self.healthy_count == self.total_count
    }
}

/// Summarize a health map.
///
/// A service is "below average" only when its response time is strictly
/// less than the mean; ties count as above.
pub fn aggregate(health: &ServiceHealthMap) -> HealthSummary {
    let total_count = health.len();
    let healthy_count = health.values().filter(|e| e.status.is_healthy()).count();

    let average_response_time_ms = if total_count == 0 {
        0.0
    } else {
        health.values().map(|e| e.response_time_ms).sum::<f64>() / total_count as f64
    };

    let comparisons = health
        .iter()
        .map(|(service, entry)| ServiceComparison {
            service: service.to_string(),
            response_time_ms: entry.response_time_ms,
            relative: if entry.response_time_ms < average_response_time_ms {
                RelativeLatency::BelowAverage
            } else {
                RelativeLatency::AboveAverage
            },
        })
        .collect();

    HealthSummary {
        healthy_count,
        total_count,
        health_percentage: percent_of(healthy_count as f64, total_count as f64),
        average_response_time_ms,
        comparisons,
    }
}
