//! Data processing for dashboard payloads.
//!
//! This module turns raw collaborator responses into the structured values
//! the dashboard publishes.
//!
//! ## Submodules
//!
//! - [`exposition`]: Prometheus text parsing into a [`MetricSnapshot`](adminwatch_types::MetricSnapshot)
//! - [`health`]: Service health aggregation ([`HealthSummary`], [`aggregate`])
//! - [`units`]: Parsing of interval strings and formatting of bytes and latencies
//!
//! ## Data Flow
//!
//! ```text
//! /metrics text              /dashboard JSON
//!       │                          │
//!       ▼                          ▼
//! exposition::parse()       DashboardPayload
//!       │                          │
//!       └──────────┬───────────────┘
//!                  ▼
//!       DashboardSnapshot::from_parts()
//!                  │
//!                  └──▶ health::aggregate() (HealthSummary)
//! ```

pub mod exposition;
pub mod health;
pub mod units;

pub use exposition::parse;
pub use health::{aggregate, HealthSummary, RelativeLatency, ServiceComparison};
