use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::alert::AlertStatus;
use crate::store::AlertStore;

/// Toggles alerts between pending and completed.
pub struct StatusTransitionService {
    store: Arc<dyn AlertStore>,
}

impl StatusTransitionService {
    pub fn new(store: Arc<dyn AlertStore>) -> Self {
        Self { store }
    }

    /// Write `status` for `alert_id`.
    ///
    /// Always writes; rewriting the current value is harmless, so no
    /// pre-read is done. Local feed state is never touched here: the
    /// feed observes the change through its subscription, keeping the
    /// store the single source of truth. Concurrent writers race
    /// last-write-wins at the store.
    pub async fn set_status(&self, alert_id: Uuid, status: AlertStatus) -> Result<(), CoreError> {
        self.store.update_alert_status(alert_id, status).await?;
        info!("alert {} marked {}", alert_id, status);
        Ok(())
    }
}
