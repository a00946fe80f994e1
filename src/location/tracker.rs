use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::sensor::{LocationSensor, SensorEvent, WatchId, WatchOptions};
use crate::config::config;
use crate::error::CoreError;
use crate::models::geo::LocationFix;

/// Continuous position acquisition with an explicit active/stopped state.
///
/// Whoever starts tracking owns the duty to stop it on teardown, on every
/// exit path including logout. A dropped tracker cannot release the sensor
/// watch itself and logs the leak instead.
pub struct LocationTracker {
    sensor: Arc<dyn LocationSensor>,
    latest: Arc<RwLock<Option<LocationFix>>>,
    active: Mutex<Option<ActiveWatch>>,
}

struct ActiveWatch {
    watch_id: WatchId,
    consumer: JoinHandle<()>,
}

impl LocationTracker {
    pub fn new(sensor: Arc<dyn LocationSensor>) -> Self {
        Self {
            sensor,
            latest: Arc::new(RwLock::new(None)),
            active: Mutex::new(None),
        }
    }

    /// Begin continuous acquisition. A no-op when already tracking.
    ///
    /// Watch registration failure (permission denied up front, unsupported
    /// platform) is returned to the caller; errors on an established watch
    /// are non-fatal and only flip availability.
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut active = self.active.lock().await;
        if active.is_some() {
            return Ok(());
        }

        let options = WatchOptions::from_config(&config().location);
        let watch = self.sensor.watch(options).await?;

        let latest = self.latest.clone();
        let mut events = watch.events;
        let consumer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    SensorEvent::Fix(fix) => {
                        // Latest fix wins; no history, no smoothing.
                        *latest.write().await = Some(fix);
                    }
                    SensorEvent::Error(err) => {
                        // One warning per error event; the watch keeps
                        // retrying on the sensor's own schedule.
                        warn!("location sensor error: {}", err);
                        *latest.write().await = None;
                    }
                }
            }
        });

        *active = Some(ActiveWatch {
            watch_id: watch.id,
            consumer,
        });
        info!("location tracking started");
        Ok(())
    }

    /// Release the sensor watch and discard the latest fix. Safe to call
    /// repeatedly.
    pub async fn stop(&self) {
        let Some(watch) = self.active.lock().await.take() else {
            return;
        };

        self.sensor.clear_watch(watch.watch_id).await;
        watch.consumer.abort();
        *self.latest.write().await = None;
        info!("location tracking stopped");
    }

    /// Latest known fix, or `None` while unavailable.
    pub async fn current(&self) -> Option<LocationFix> {
        *self.latest.read().await
    }

    pub async fn is_tracking(&self) -> bool {
        self.active.lock().await.is_some()
    }
}

impl Drop for LocationTracker {
    fn drop(&mut self) {
        if let Ok(active) = self.active.try_lock() {
            if active.is_some() {
                warn!("location tracker dropped while active; sensor watch leaked");
            }
        }
    }
}
