//! Admin service client over HTTP.
//!
//! Fetches the two documents the dashboard is built from:
//!
//! - **Dashboard JSON** (`/api/admin/dashboard/`): service health and broker counts
//! - **Metrics text** (`/metrics`): the service's Prometheus exposition
//!
//! ## Example
//!
//! ```rust,no_run
//! use adminwatch::{AdminClient, DashboardSource, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AdminClient::builder()
//!         .base_url("http://localhost:8002")
//!         .session(Session::with_token("access-token"))
//!         .build()?;
//!
//!     let payload = client.fetch_dashboard().await?;
//!     for (service, health) in payload.service_health.iter() {
//!         println!("{}: {}", service, health.status);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use adminwatch_types::DashboardPayload;

use super::{DashboardSource, FetchError, Session};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8002";
pub const DEFAULT_DASHBOARD_PATH: &str = "/api/admin/dashboard/";
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

/// Client for the admin service's dashboard and metrics endpoints.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    dashboard_path: String,
    metrics_path: String,
    session: Session,
    description: String,
}

impl AdminClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> AdminClientBuilder {
        AdminClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Issue a GET and fail on any non-success status.
    async fn get(&self, path: &str) -> Result<reqwest::Response, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url);
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus {
                endpoint: path.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl DashboardSource for AdminClient {
    async fn fetch_dashboard(&self) -> Result<DashboardPayload, FetchError> {
        self.get(&self.dashboard_path)
            .await?
            .json::<DashboardPayload>()
            .await
            .map_err(|e| FetchError::decode(&self.dashboard_path, e))
    }

    async fn fetch_metrics_text(&self) -> Result<String, FetchError> {
        self.get(&self.metrics_path)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::decode(&self.metrics_path, e))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for AdminClient.
#[derive(Debug, Default)]
pub struct AdminClientBuilder {
    base_url: Option<String>,
    dashboard_path: Option<String>,
    metrics_path: Option<String>,
    session: Option<Session>,
    timeout: Option<Duration>,
}

impl AdminClientBuilder {
    /// Set the admin service base URL (e.g., "http://localhost:8002").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the dashboard JSON path (default: "/api/admin/dashboard/").
    pub fn dashboard_path(mut self, path: impl Into<String>) -> Self {
        self.dashboard_path = Some(path.into());
        self
    }

    /// Set the metrics text path (default: "/metrics").
    pub fn metrics_path(mut self, path: impl Into<String>) -> Self {
        self.metrics_path = Some(path.into());
        self
    }

    /// Set the session whose credentials are sent with each request.
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AdminClient, FetchError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(FetchError::Config(format!(
                "base URL must start with http:// or https://: {}",
                base_url
            )));
        }

        Ok(AdminClient {
            client,
            description: format!("http: {}", base_url),
            base_url,
            dashboard_path: normalize_path(self.dashboard_path, DEFAULT_DASHBOARD_PATH),
            metrics_path: normalize_path(self.metrics_path, DEFAULT_METRICS_PATH),
            session: self.session.unwrap_or_default(),
        })
    }
}

// Ensure a request path starts with a single slash
fn normalize_path(path: Option<String>, default: &str) -> String {
    match path {
        Some(p) if !p.trim().is_empty() => format!("/{}", p.trim().trim_start_matches('/')),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminwatch_types::HealthState;

    const DASHBOARD_JSON: &str = r#"{
        "service_health": {
            "user_service": {
                "status": "healthy",
                "last_check": "2024-03-01T10:00:00Z",
                "last_successful_check": "2024-03-01T10:00:00Z",
                "response_time": 12.0,
                "error_message": null
            },
            "kafka": {
                "status": "unhealthy",
                "last_check": "2024-03-01T10:00:00Z",
                "last_successful_check": null,
                "response_time": 40.0,
                "error_message": "NoBrokersAvailable"
            }
        },
        "service_metrics": {"kafka": {"broker_count": 1, "topic_count": 3, "partition_count": 9}},
        "timestamp": "2024-03-01T10:00:01Z"
    }"#;

    fn client_for(server: &mockito::ServerGuard) -> AdminClient {
        AdminClient::builder()
            .base_url(server.url())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let client = AdminClient::builder().build().unwrap();
        assert_eq!(client.base_url, "http://localhost:8002");
        assert_eq!(client.dashboard_path, "/api/admin/dashboard/");
        assert_eq!(client.metrics_path, "/metrics");
        assert!(!client.session.is_authenticated());
        assert_eq!(client.description(), "http: http://localhost:8002");
    }

    #[test]
    fn test_builder_custom() {
        let client = AdminClient::builder()
            .base_url("https://admin.internal:9000/")
            .dashboard_path("dash")
            .metrics_path("/prom")
            .session(Session::with_token("t"))
            .build()
            .unwrap();

        assert_eq!(client.base_url, "https://admin.internal:9000");
        assert_eq!(client.dashboard_path, "/dash");
        assert_eq!(client.metrics_path, "/prom");
        assert!(client.session().is_authenticated());
    }

    #[test]
    fn test_builder_rejects_bad_scheme() {
        let err = AdminClient::builder().base_url("ftp://x").build().unwrap_err();
        assert!(matches!(err, FetchError::Config(_)));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(None, "/d"), "/d");
        assert_eq!(normalize_path(Some("  ".to_string()), "/d"), "/d");
        assert_eq!(normalize_path(Some("//x/".to_string()), "/d"), "/x/");
    }

    #[tokio::test]
    async fn test_fetch_dashboard() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/admin/dashboard/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(DASHBOARD_JSON)
            .create_async()
            .await;

        let payload = client_for(&server).fetch_dashboard().await.unwrap();

        assert_eq!(
            payload.service_health.keys().collect::<Vec<_>>(),
            vec!["user_service", "kafka"]
        );
        assert_eq!(
            payload.service_health.get("kafka").unwrap().status,
            HealthState::Unhealthy
        );
        assert_eq!(payload.service_metrics.kafka.partition_count, 9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_metrics_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/metrics")
            .with_status(200)
            .with_header("content-type", "text/plain; version=0.0.4")
            .with_body("process_open_fds 12\n")
            .create_async()
            .await;

        let text = client_for(&server).fetch_metrics_text().await.unwrap();
        assert_eq!(text, "process_open_fds 12\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/metrics")
            .match_header("authorization", "Bearer s3cret")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client = AdminClient::builder()
            .base_url(server.url())
            .session(Session::with_token("s3cret"))
            .build()
            .unwrap();

        client.fetch_metrics_text().await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/admin/dashboard/")
            .with_status(503)
            .create_async()
            .await;

        let err = client_for(&server).fetch_dashboard().await.unwrap_err();
        match err {
            FetchError::HttpStatus { endpoint, status } => {
                assert_eq!(endpoint, "/api/admin/dashboard/");
                assert_eq!(status, 503);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/admin/dashboard/")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).fetch_dashboard().await.unwrap_err();
        match err {
            FetchError::Decode { endpoint, .. } => assert_eq!(endpoint, "/api/admin/dashboard/"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = AdminClient::builder()
            .base_url("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let err = client.fetch_metrics_text().await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
