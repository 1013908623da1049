//! # adminwatch
//!
//! A polling client and library for the admin service dashboard.
//!
//! The admin service exposes two documents: a JSON dashboard payload with
//! per-service health and message broker counts, and the Prometheus text
//! exposition of its own process. This crate fetches both, parses the
//! metrics text, merges everything into one immutable snapshot and keeps
//! that snapshot fresh on a fixed interval.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        dashboard                             │
//! │  ┌─────────┐     ┌──────────┐     ┌──────────────────────┐   │
//! │  │ source  │────▶│   data   │────▶│ watch<DashboardState>│   │
//! │  │ (fetch) │     │ (parse,  │     │  (atomic publish)    │   │
//! │  └─────────┘     │aggregate)│     └──────────┬───────────┘   │
//! │                  └──────────┘                │               │
//! │                                   report / export            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`DashboardSource`] trait and its HTTP implementation
//!   [`AdminClient`], with explicit [`Session`] credentials
//! - **[`data`]**: Prometheus text parsing ([`data::parse`]) and service health
//!   aggregation ([`data::aggregate`])
//! - **[`dashboard`]**: the [`DashboardAssembler`] polling loop and the
//!   [`PollingHandle`] that controls it
//! - **[`config`]**: layered [`Settings`] (defaults, file, environment, CLI)
//! - **[`report`]** and **[`export`]**: plain-text and JSON output
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Print one summary and exit
//! adminwatch --base-url http://localhost:8002 --once
//!
//! # Refresh every 30 seconds until interrupted
//! adminwatch --token "$ACCESS_TOKEN"
//!
//! # Write the current snapshot as JSON
//! adminwatch --export dashboard.json
//! ```
//!
//! ### Parsing metrics text
//!
//! ```
//! let snapshot = adminwatch::data::parse("process_open_fds 12\nprocess_max_fds 1024\n");
//! assert_eq!(snapshot.process.open_fds, 12);
//! assert_eq!(snapshot.process.fd_usage_percent(), 12.0 / 1024.0 * 100.0);
//! ```
//!
//! ### Polling in the background
//!
//! ```no_run
//! use adminwatch::{AdminClient, DashboardAssembler, Session};
//!
//! # tokio_test::block_on(async {
//! let client = AdminClient::builder()
//!     .base_url("http://localhost:8002")
//!     .session(Session::with_token("access-token"))
//!     .build()
//!     .unwrap();
//!
//! let handle = DashboardAssembler::builder(client).build().start();
//! let mut updates = handle.subscribe();
//! updates.changed().await.unwrap();
//! println!("{}", adminwatch::report::render(&updates.borrow()));
//! # });
//! ```

pub mod config;
pub mod dashboard;
pub mod data;
pub mod export;
pub mod report;
pub mod source;

// Re-export main types for convenience
pub use config::{Overrides, Settings};
pub use dashboard::{DashboardAssembler, DashboardAssemblerBuilder, DashboardState, PollingHandle};
pub use data::{HealthSummary, RelativeLatency, ServiceComparison};
pub use source::{AdminClient, AdminClientBuilder, DashboardSource, FetchError, Session};

pub use adminwatch_types::{
    DashboardPayload, DashboardSnapshot, HealthState, KafkaMetrics, MetricSnapshot,
    ServiceHealthEntry, ServiceHealthMap,
};
