//! Per-service health as reported by the admin service.

use chrono::{DateTime, Utc};

/// Health state of a backend service.
///
/// The admin service reports `healthy` and `unhealthy`, and its model also
/// allows `degraded` and `down`. Anything else decodes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum HealthState {
    Healthy,
    Unhealthy,
    Degraded,
    Down,
    #[default]
    Unknown,
}

impl HealthState {
    /// Wire name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
            HealthState::Degraded => "degraded",
            HealthState::Down => "down",
            HealthState::Unknown => "unknown",
        }
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthState::Healthy => "OK",
            HealthState::Degraded => "WARN",
            HealthState::Unhealthy | HealthState::Down => "FAIL",
            HealthState::Unknown => "?",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthState::Healthy)
    }
}

impl From<&str> for HealthState {
    fn from(s: &str) -> Self {
        match s {
            "healthy" => HealthState::Healthy,
            "unhealthy" => HealthState::Unhealthy,
            "degraded" => HealthState::Degraded,
            "down" => HealthState::Down,
            _ => HealthState::Unknown,
        }
    }
}

impl From<String> for HealthState {
    fn from(s: String) -> Self {
        HealthState::from(s.as_str())
    }
}

impl From<HealthState> for String {
    fn from(state: HealthState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health of a single service, as of the admin service's last check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceHealthEntry {
    pub status: HealthState,

    /// When the admin service last probed this service.
    pub last_check: DateTime<Utc>,

    /// When the last probe that succeeded ran. `None` if none ever did.
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_successful_check: Option<DateTime<Utc>>,

    /// Probe round-trip in milliseconds. A null on the wire reads as 0.0.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "response_time", default, deserialize_with = "null_as_zero")
    )]
    pub response_time_ms: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub error_message: Option<String>,

    /// Topic count, only reported for the message broker.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub topics: Option<u64>,
}

impl ServiceHealthEntry {
    /// Create an entry checked now.
    pub fn new(status: HealthState, response_time_ms: f64) -> Self {
        let now = Utc::now();
        Self {
            status,
            last_check: now,
            last_successful_check: status.is_healthy().then_some(now),
            response_time_ms,
            error_message: None,
            topics: None,
        }
    }

    /// Set the time of the last check.
    pub fn last_check(mut self, at: DateTime<Utc>) -> Self {
        self.last_check = at;
        self
    }

    /// Set the error reported by the last check.
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Set the broker topic count.
    pub fn topics(mut self, topics: u64) -> Self {
        self.topics = Some(topics);
        self
    }
}

#[cfg(feature = "serde")]
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Service health keyed by service name.
///
/// Keys are unique. Iteration follows insertion order, which for decoded
/// payloads is the order the services appear in the JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServiceHealthMap {
    entries: Vec<(String, ServiceHealthEntry)>,
}

impl ServiceHealthMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Insert an entry, replacing (in place) any entry with the same name.
    ///
    /// Returns the replaced entry, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        entry: ServiceHealthEntry,
    ) -> Option<ServiceHealthEntry> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, entry)),
            None => {
                self.entries.push((name, entry));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ServiceHealthEntry> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceHealthEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Service names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Entries in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &ServiceHealthEntry> {
        self.entries.iter().map(|(_, e)| e)
    }
}

impl<K: Into<String>> FromIterator<(K, ServiceHealthEntry)> for ServiceHealthMap {
    fn from_iter<I: IntoIterator<Item = (K, ServiceHealthEntry)>>(iter: I) -> Self {
        let mut map = ServiceHealthMap::new();
        for (name, entry) in iter {
            map.insert(name, entry);
        }
        map
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ServiceHealthMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, entry) in &self.entries {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ServiceHealthMap {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ServiceHealthMapVisitor)
    }
}

#[cfg(feature = "serde")]
struct ServiceHealthMapVisitor;

#[cfg(feature = "serde")]
impl<'de> serde::de::Visitor<'de> for ServiceHealthMapVisitor {
    type Value = ServiceHealthMap;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of service name to health entry")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = ServiceHealthMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, entry)) = access.next_entry::<String, ServiceHealthEntry>()? {
            map.insert(name, entry);
        }
        Ok(map)
    }
}
