//! Collaborator abstraction for fetching dashboard inputs.
//!
//! The dashboard is built from two documents served by the admin service:
//! the dashboard JSON payload and the Prometheus metrics text. This module
//! defines the [`DashboardSource`] trait the poller fetches through, and the
//! HTTP implementation ([`AdminClient`]) used in production.

mod error;
mod http;
mod session;

pub use error::FetchError;
pub use http::{
    AdminClient, AdminClientBuilder, DEFAULT_BASE_URL, DEFAULT_DASHBOARD_PATH,
    DEFAULT_METRICS_PATH,
};
pub use session::Session;

use std::fmt::Debug;

use async_trait::async_trait;

use adminwatch_types::DashboardPayload;

/// Trait for fetching the inputs of a dashboard refresh.
///
/// Implementations must be shareable across tasks; the poller issues both
/// fetches concurrently on every tick.
///
/// # Example
///
/// ```no_run
/// use adminwatch::{AdminClient, DashboardSource};
///
/// # tokio_test::block_on(async {
/// let client = AdminClient::builder().build().unwrap();
/// let text = client.fetch_metrics_text().await.unwrap();
/// let snapshot = adminwatch::data::parse(&text);
/// println!("{} open fds", snapshot.process.open_fds);
/// # });
/// ```
#[async_trait]
pub trait DashboardSource: Send + Sync + Debug {
    /// Fetch and decode the dashboard JSON payload.
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, FetchError>;

    /// Fetch the raw Prometheus exposition text.
    async fn fetch_metrics_text(&self) -> Result<String, FetchError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
