//! # adminwatch-types
//!
//! Core types for the adminwatch dashboard. This crate defines the data
//! model shared by the metrics parser, the health aggregator and the
//! polling assembler, and by anything that consumes the merged view.
//!
//! ## Design Goals
//!
//! - **Immutable snapshots**: every poll builds fresh values; nothing is
//!   patched in place
//! - **Total defaults**: every numeric field has a zero default so partial
//!   input never produces a partially-initialized value
//! - **Optional serialization**: enable the `serde` feature for JSON
//!   decoding of the admin service payload and for exports
//!
//! ## Features
//!
//! - `serde`: serialization via serde (also enables chrono's serde support)
//!
//! ## Example
//!
//! ```rust
//! use adminwatch_types::{HealthState, ServiceHealthEntry, ServiceHealthMap};
//!
//! let mut health = ServiceHealthMap::new();
//! health.insert("user-service", ServiceHealthEntry::new(HealthState::Healthy, 12.5));
//! health.insert("post-service", ServiceHealthEntry::new(HealthState::Down, 250.0));
//!
//! assert_eq!(health.len(), 2);
//! assert_eq!(health.keys().next(), Some("user-service"));
//! ```

mod dashboard;
mod health;
mod metrics;

pub use dashboard::*;
pub use health::*;
pub use metrics::*;

/// Compute `part / whole * 100`, or 0.0 when `whole` is zero.
///
/// Every percentage in the dashboard goes through this so an empty
/// denominator never yields NaN or infinity.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
