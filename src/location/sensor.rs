use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::LocationConfig;
use crate::models::geo::LocationFix;

/// Errors surfaced by the geolocation sensor.
///
/// None of these stop an active watch: the sensor keeps retrying on its
/// own schedule and the tracker reports availability as lost until the
/// next good fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("timed out waiting for a fix")]
    Timeout,

    #[error("geolocation is not supported on this platform")]
    Unsupported,
}

/// Options for a continuous watch registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Zero means a cached fix is never reused.
    pub maximum_age: Duration,
    /// Per-fix acquisition timeout.
    pub timeout: Duration,
}

impl WatchOptions {
    pub fn from_config(cfg: &LocationConfig) -> Self {
        Self {
            high_accuracy: cfg.high_accuracy,
            maximum_age: Duration::from_millis(cfg.maximum_age_ms),
            timeout: Duration::from_millis(cfg.fix_timeout_ms),
        }
    }
}

/// Opaque handle for an active watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(Uuid);

impl WatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WatchId {
    fn default() -> Self {
        Self::new()
    }
}

/// One delivery from an active watch.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorEvent {
    Fix(LocationFix),
    Error(SensorError),
}

/// A registered continuous watch. Events flow until the watch is cleared.
pub struct SensorWatch {
    pub id: WatchId,
    pub events: mpsc::Receiver<SensorEvent>,
}

/// Seam to the platform geolocation facility.
#[async_trait]
pub trait LocationSensor: Send + Sync {
    /// Register a continuous watch producing periodic fixes or errors.
    async fn watch(&self, options: WatchOptions) -> Result<SensorWatch, SensorError>;

    /// Release a watch. Unknown handles are ignored.
    async fn clear_watch(&self, id: WatchId);
}
