use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};

use super::sensor::{LocationSensor, SensorError, SensorEvent, SensorWatch, WatchId, WatchOptions};
use crate::models::geo::LocationFix;

const EVENT_BUFFER: usize = 8;

/// Scriptable sensor for tests and platform-free embeddings.
///
/// Fixes and errors pushed through the handle fan out to every active
/// watch.
pub struct SimulatedSensor {
    watches: RwLock<HashMap<WatchId, mpsc::Sender<SensorEvent>>>,
    refusal: RwLock<Option<SensorError>>,
}

impl SimulatedSensor {
    pub fn new() -> Self {
        Self {
            watches: RwLock::new(HashMap::new()),
            refusal: RwLock::new(None),
        }
    }

    /// Make subsequent `watch` registrations fail with `err`.
    pub async fn refuse_watches(&self, err: SensorError) {
        *self.refusal.write().await = Some(err);
    }

    /// Deliver a fix, stamped now, to every active watch.
    pub async fn push_fix(&self, lat: f64, lng: f64) {
        self.fan_out(SensorEvent::Fix(LocationFix {
            lat,
            lng,
            timestamp: Utc::now(),
        }))
        .await;
    }

    /// Deliver a sensor error to every active watch.
    pub async fn push_error(&self, err: SensorError) {
        self.fan_out(SensorEvent::Error(err)).await;
    }

    pub async fn active_watches(&self) -> usize {
        self.watches.read().await.len()
    }

    async fn fan_out(&self, event: SensorEvent) {
        let mut watches = self.watches.write().await;
        let mut dead = Vec::new();
        for (id, tx) in watches.iter() {
            if tx.send(event.clone()).await.is_err() {
                dead.push(*id);
            }
        }
        // Prune watches whose consumers have gone away.
        for id in dead {
            watches.remove(&id);
        }
    }
}

impl Default for SimulatedSensor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationSensor for SimulatedSensor {
    async fn watch(&self, _options: WatchOptions) -> Result<SensorWatch, SensorError> {
        if let Some(err) = self.refusal.read().await.clone() {
            return Err(err);
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let id = WatchId::new();
        self.watches.write().await.insert(id, tx);
        Ok(SensorWatch { id, events: rx })
    }

    async fn clear_watch(&self, id: WatchId) {
        self.watches.write().await.remove(&id);
    }
}
