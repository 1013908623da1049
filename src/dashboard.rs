//! Periodic assembly of the dashboard from its two collaborator documents.
//!
//! A [`DashboardAssembler`] owns a [`DashboardSource`] and, once started,
//! polls it on a fixed interval. Every tick fetches the dashboard payload
//! and the metrics text concurrently, merges them into a new
//! [`DashboardSnapshot`] and publishes a whole [`DashboardState`] through a
//! `tokio::sync::watch` channel.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use adminwatch_types::DashboardSnapshot;

use crate::data::{self, HealthSummary};
use crate::source::{DashboardSource, FetchError};

/// Default polling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// What the dashboard shows after the most recent tick.
///
/// A failed tick keeps the previous `snapshot` and `summary` and only sets
/// `last_error`. The next successful tick clears it.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub snapshot: Option<Arc<DashboardSnapshot>>,
    pub summary: Option<HealthSummary>,
    pub last_error: Option<String>,
    /// Ticks completed so far, successful or not.
    pub ticks: u64,
    /// When the snapshot was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Next state after a tick.
    fn advance(&self, result: Result<DashboardSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => Self {
                summary: Some(data::aggregate(&snapshot.service_health)),
                snapshot: Some(Arc::new(snapshot)),
                last_error: None,
                ticks: self.ticks + 1,
                updated_at: Some(Utc::now()),
            },
            Err(e) => Self {
                snapshot: self.snapshot.clone(),
                summary: self.summary.clone(),
                last_error: Some(e.to_string()),
                ticks: self.ticks + 1,
                updated_at: self.updated_at,
            },
        }
    }
}

/// Polls a [`DashboardSource`] and republishes the merged dashboard.
///
/// # Example
///
/// ```rust,no_run
/// use adminwatch::{AdminClient, DashboardAssembler};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = AdminClient::builder().build()?;
///     let assembler = DashboardAssembler::builder(client)
///         .interval(Duration::from_secs(30))
///         .build();
///
///     let handle = assembler.start();
///     let mut updates = handle.subscribe();
///
///     while updates.changed().await.is_ok() {
///         let state = updates.borrow_and_update().clone();
///         if let Some(summary) = state.summary {
///             println!("{:.2}% healthy", summary.health_percentage);
///         }
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DashboardAssembler {
    source: Arc<dyn DashboardSource>,
    interval: Duration,
}

impl DashboardAssembler {
    pub fn new(source: impl DashboardSource + 'static, interval: Duration) -> Self {
        Self {
            source: Arc::new(source),
            interval,
        }
    }

    /// Create a builder for configuring the assembler.
    pub fn builder(source: impl DashboardSource + 'static) -> DashboardAssemblerBuilder {
        DashboardAssemblerBuilder {
            source: Arc::new(source),
            interval: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn source(&self) -> &dyn DashboardSource {
        self.source.as_ref()
    }

    /// Run a single tick without publishing anything.
    pub async fn poll_once(&self) -> Result<DashboardSnapshot, FetchError> {
        assemble(self.source.as_ref()).await
    }

    /// Start background polling.
    ///
    /// The first tick fires immediately, then once per interval. Ticks run
    /// one after another; a slow tick delays the next one rather than
    /// causing a burst.
    pub fn start(&self) -> PollingHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(DashboardState::default());
        let source = self.source.clone();
        let interval = self.interval;

        tracing::info!(
            source = source.description(),
            interval_secs = interval.as_secs_f64(),
            "Dashboard polling started"
        );

        let task = tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        // A stop during a fetch abandons the tick unpublished.
                        let result = tokio::select! {
                            result = assemble(source.as_ref()) => result,
                            _ = stop_requested(&mut stop_rx) => break,
                        };
                        match &result {
                            Ok(snapshot) => tracing::debug!(
                                services = snapshot.service_health.len(),
                                brokers = snapshot.kafka_metrics.broker_count,
                                "Dashboard refreshed"
                            ),
                            Err(e) => tracing::warn!(error = %e, "Dashboard refresh failed"),
                        }

                        let next = state_tx.borrow().advance(result);
                        state_tx.send_replace(next);

                        if state_tx.is_closed() {
                            break;
                        }
                    }
                    _ = stop_requested(&mut stop_rx) => break,
                }
            }

            tracing::info!("Dashboard polling stopped");
        });

        PollingHandle {
            stop_tx,
            state_rx,
            task: Some(task),
        }
    }
}

/// Resolves once a stop is signalled or the handle is gone.
async fn stop_requested(stop_rx: &mut watch::Receiver<bool>) {
    let _ = stop_rx.wait_for(|stop| *stop).await;
}

/// Fetch both documents concurrently and merge them. Both must succeed.
async fn assemble(source: &dyn DashboardSource) -> Result<DashboardSnapshot, FetchError> {
    let (payload, text) = tokio::join!(source.fetch_dashboard(), source.fetch_metrics_text());
    let payload = payload?;
    let metrics = data::parse(&text?);

    Ok(DashboardSnapshot::from_parts(payload, metrics))
}

/// Builder for configuring a DashboardAssembler.
#[derive(Debug)]
pub struct DashboardAssemblerBuilder {
    source: Arc<dyn DashboardSource>,
    interval: Option<Duration>,
}

impl DashboardAssemblerBuilder {
    /// Set the polling interval.
    ///
    /// Defaults to 30 seconds if not specified.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Build the assembler.
    pub fn build(self) -> DashboardAssembler {
        DashboardAssembler {
            source: self.source,
            interval: self.interval.unwrap_or(DEFAULT_INTERVAL),
        }
    }
}

/// Handle for a running polling task.
///
/// Drop this handle to stop polling, or call `stop()` explicitly.
#[derive(Debug)]
pub struct PollingHandle {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<DashboardState>,
    task: Option<JoinHandle<()>>,
}

impl PollingHandle {
    /// Receive every published state.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_rx.clone()
    }

    /// The most recently published state.
    pub fn current(&self) -> DashboardState {
        self.state_rx.borrow().clone()
    }

    /// Signal the polling task to stop after its current tick.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop polling and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(true);
    }
}
