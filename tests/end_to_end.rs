//! Full refresh against a mock admin service.

use std::time::Duration;

use chrono::{TimeZone, Utc};

use adminwatch::{
    AdminClient, DashboardAssembler, HealthState, RelativeLatency, Session,
};

const DASHBOARD: &str = include_str!("fixtures/dashboard.json");
const METRICS: &str = include_str!("fixtures/metrics.txt");

async fn mock_admin_service(server: &mut mockito::ServerGuard) -> (mockito::Mock, mockito::Mock) {
    let dashboard = server
        .mock("GET", "/api/admin/dashboard/")
        .match_header("authorization", "Bearer e2e-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(DASHBOARD)
        .create_async()
        .await;
    let metrics = server
        .mock("GET", "/metrics")
        .match_header("authorization", "Bearer e2e-token")
        .with_status(200)
        .with_header("content-type", "text/plain; version=0.0.4")
        .with_body(METRICS)
        .create_async()
        .await;
    (dashboard, metrics)
}

fn assembler_for(server: &mockito::ServerGuard) -> DashboardAssembler {
    let client = AdminClient::builder()
        .base_url(server.url())
        .session(Session::with_token("e2e-token"))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    DashboardAssembler::builder(client)
        .interval(Duration::from_secs(30))
        .build()
}

#[tokio::test]
async fn test_single_refresh_builds_full_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let (dashboard_mock, metrics_mock) = mock_admin_service(&mut server).await;

    let snapshot = assembler_for(&server).poll_once().await.unwrap();

    // Dashboard payload
    assert_eq!(
        snapshot.service_health.keys().collect::<Vec<_>>(),
        vec!["user_service", "analytics_service", "kafka"]
    );
    let kafka = snapshot.service_health.get("kafka").unwrap();
    assert_eq!(kafka.status, HealthState::Unhealthy);
    assert_eq!(kafka.response_time_ms, 0.0);
    assert_eq!(kafka.last_successful_check, None);
    assert_eq!(kafka.error_message.as_deref(), Some("NoBrokersAvailable"));
    assert_eq!(kafka.topics, Some(3));
    assert_eq!(snapshot.kafka_metrics.broker_count, 1);
    assert_eq!(snapshot.kafka_metrics.topic_count, 3);
    assert_eq!(snapshot.kafka_metrics.partition_count, 12);
    assert_eq!(
        snapshot.timestamp,
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 1).unwrap()
    );

    // Metrics text
    let metrics = &snapshot.system_metrics;
    assert_eq!(metrics.gc_stats.collected.get("0"), Some(&1843));
    assert_eq!(metrics.gc_stats.collected.get("2"), Some(&37));
    assert_eq!(metrics.gc_stats.uncollectable.get("2"), Some(&3));
    assert_eq!(metrics.gc_stats.collections.get("1"), Some(&19));
    assert_eq!(metrics.memory.virtual_bytes, 419_430_400);
    assert_eq!(metrics.memory.resident_bytes, 61_440_000);
    assert_eq!(metrics.runtime_info.version, "3.11.4");
    assert_eq!(metrics.runtime_info.implementation, "CPython");
    assert_eq!(metrics.process.cpu_seconds, 12.5);
    assert_eq!(metrics.process.open_fds, 24);
    assert_eq!(metrics.process.max_fds, 1024);
    assert_eq!(metrics.request_stats.db_queries, 9120);
    assert_eq!(metrics.request_stats.db_connections, 8);
    assert_eq!(metrics.request_stats.requests_total, 2200);
    assert_eq!(metrics.request_stats.response_time_avg_ms, 2.5);

    dashboard_mock.assert_async().await;
    metrics_mock.assert_async().await;
}

#[tokio::test]
async fn test_polling_publishes_summary() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_admin_service(&mut server).await;

    let handle = assembler_for(&server).start();
    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();
    let state = updates.borrow_and_update().clone();

    assert!(state.last_error.is_none());
    assert_eq!(state.ticks, 1);

    let summary = state.summary.unwrap();
    assert_eq!(summary.healthy_count, 2);
    assert_eq!(summary.total_count, 3);
    assert!((summary.health_percentage - 66.666_666).abs() < 1e-3);
    assert_eq!(summary.average_response_time_ms, 10.0);
    assert!(!summary.is_fully_healthy());

    let relative: Vec<_> = summary
        .comparisons
        .iter()
        .map(|c| (c.service.as_str(), c.relative))
        .collect();
    assert_eq!(
        relative,
        vec![
            ("user_service", RelativeLatency::AboveAverage),
            ("analytics_service", RelativeLatency::AboveAverage),
            ("kafka", RelativeLatency::BelowAverage),
        ]
    );

    handle.shutdown().await;
}

#[tokio::test]
async fn test_failed_endpoint_reports_error() {
    let mut server = mockito::Server::new_async().await;
    let _dashboard = server
        .mock("GET", "/api/admin/dashboard/")
        .with_status(200)
        .with_body(DASHBOARD)
        .create_async()
        .await;
    let _metrics = server
        .mock("GET", "/metrics")
        .with_status(502)
        .create_async()
        .await;

    let client = AdminClient::builder().base_url(server.url()).build().unwrap();
    let handle = DashboardAssembler::new(client, Duration::from_secs(30)).start();
    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();
    let state = updates.borrow_and_update().clone();

    assert!(state.snapshot.is_none());
    assert!(state.summary.is_none());
    assert_eq!(state.last_error.as_deref(), Some("/metrics returned status 502"));

    handle.shutdown().await;
}

#[tokio::test]
async fn test_export_writes_snapshot() {
    let mut server = mockito::Server::new_async().await;
    let _mocks = mock_admin_service(&mut server).await;

    let snapshot = assembler_for(&server).poll_once().await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dashboard.json");
    adminwatch::export::export_to_file(&snapshot, &path).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["summary"]["healthy"], 2);
    assert_eq!(doc["services"][2]["name"], "kafka");
    assert_eq!(doc["kafka"]["topics_per_partition_percent"], 25.0);
    assert_eq!(doc["system"]["request_stats"]["requests_total"], 2200);
    assert_eq!(doc["timestamp"], "2024-03-01T10:00:01Z");
}
