//! Layered runtime configuration.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, `ADMINWATCH_*` environment variables, command line overrides.
//!
//! ```toml
//! base_url = "http://admin.internal:8002"
//! poll_interval_secs = 15
//! access_token = "..."
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::source::{
    AdminClient, Session, DEFAULT_BASE_URL, DEFAULT_DASHBOARD_PATH, DEFAULT_METRICS_PATH,
};

const ENV_PREFIX: &str = "ADMINWATCH";

/// Resolved settings for the dashboard poller.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub dashboard_path: String,
    pub metrics_path: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

impl Settings {
    /// Load settings from the process environment and an optional file.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_from(path, overrides, None)
    }

    fn load_from(
        path: Option<&Path>,
        overrides: &Overrides,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("dashboard_path", DEFAULT_DASHBOARD_PATH)?
            .set_default("metrics_path", DEFAULT_METRICS_PATH)?
            .set_default("poll_interval_secs", 30)?
            .set_default("request_timeout_secs", 10)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("base_url", overrides.base_url.clone())?
            .set_override_option("access_token", overrides.access_token.clone())?
            .set_override_option("poll_interval_secs", overrides.poll_interval_secs)?
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session(&self) -> Session {
        match &self.access_token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::anonymous(),
        }
    }

    /// Build the HTTP client these settings describe.
    pub fn client(&self) -> Result<AdminClient> {
        let client = AdminClient::builder()
            .base_url(&self.base_url)
            .dashboard_path(&self.dashboard_path)
            .metrics_path(&self.metrics_path)
            .session(self.session())
            .timeout(self.request_timeout())
            .build()?;
        Ok(client)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("dashboard_path", &self.dashboard_path)
            .field("metrics_path", &self.metrics_path)
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
