use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::channel::{ChangeNotifier, SubscriptionId};
use crate::error::CoreError;
use crate::models::alert::{AlertStatus, AlertWithSubmitter};
use crate::store::{AlertFilter, AlertStore, StoreError, ALERTS_TABLE};

/// Staff-facing live view over the alert collection.
///
/// The store stays the single source of truth: the feed never patches its
/// snapshot from a notification payload, it refetches the full current
/// state on every change signal.
pub struct AlertFeed {
    store: Arc<dyn AlertStore>,
    notifier: Arc<dyn ChangeNotifier>,
    view: Arc<FeedView>,
    subscription: Mutex<Option<FeedSubscription>>,
}

struct FeedView {
    filter: RwLock<AlertFilter>,
    alerts: RwLock<Vec<AlertWithSubmitter>>,
}

struct FeedSubscription {
    id: SubscriptionId,
    task: JoinHandle<()>,
}

impl FeedView {
    async fn reload(&self, store: &dyn AlertStore) -> Result<(), StoreError> {
        let query = self.filter.read().await.query();
        match store.select_alerts(&query).await {
            Ok(alerts) => {
                *self.alerts.write().await = alerts;
                Ok(())
            }
            Err(err) => {
                // Never retain a stale prior view after a failed fetch.
                self.alerts.write().await.clear();
                Err(err)
            }
        }
    }
}

impl AlertFeed {
    pub fn new(store: Arc<dyn AlertStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self {
            store,
            notifier,
            view: Arc::new(FeedView {
                filter: RwLock::new(AlertFilter::All),
                alerts: RwLock::new(Vec::new()),
            }),
            subscription: Mutex::new(None),
        }
    }

    /// Fetch alerts matching `filter` and replace the snapshot.
    ///
    /// The filter only changes what this and subsequent loads fetch; it
    /// never touches the live channel or stored data.
    pub async fn load(&self, filter: AlertFilter) -> Result<(), CoreError> {
        *self.view.filter.write().await = filter;
        self.view.reload(self.store.as_ref()).await?;
        Ok(())
    }

    pub async fn filter(&self) -> AlertFilter {
        *self.view.filter.read().await
    }

    /// The loaded alerts, most recent first.
    pub async fn snapshot(&self) -> Vec<AlertWithSubmitter> {
        self.view.alerts.read().await.clone()
    }

    /// Loaded alerts still awaiting staff action.
    pub async fn pending(&self) -> Vec<AlertWithSubmitter> {
        self.partition(AlertStatus::Pending).await
    }

    /// Loaded alerts already resolved.
    pub async fn completed(&self) -> Vec<AlertWithSubmitter> {
        self.partition(AlertStatus::Completed).await
    }

    async fn partition(&self, status: AlertStatus) -> Vec<AlertWithSubmitter> {
        self.view
            .alerts
            .read()
            .await
            .iter()
            .filter(|entry| entry.alert.status == status)
            .cloned()
            .collect()
    }

    /// Open the live channel on the alert table and refetch on every
    /// delivered signal. A second call on an already-live feed is a no-op:
    /// one subscription per feed instance.
    pub async fn subscribe(&self) -> Result<(), CoreError> {
        let mut slot = self.subscription.lock().await;
        if slot.is_some() {
            debug!("feed already subscribed");
            return Ok(());
        }

        let subscription = self.notifier.subscribe(ALERTS_TABLE).await?;
        let store = self.store.clone();
        let view = self.view.clone();
        let mut changes = subscription.changes;

        let task = tokio::spawn(async move {
            while changes.recv().await.is_some() {
                // Coalesce bursts: one refetch covers every queued signal.
                while changes.try_recv().is_ok() {}
                if let Err(err) = view.reload(store.as_ref()).await {
                    warn!("feed refresh failed: {}", err);
                }
            }
        });

        *slot = Some(FeedSubscription {
            id: subscription.id,
            task,
        });
        Ok(())
    }

    /// Release the live channel. A no-op when not subscribed.
    pub async fn unsubscribe(&self) {
        let Some(subscription) = self.subscription.lock().await.take() else {
            return;
        };

        self.notifier.unsubscribe(subscription.id).await;
        subscription.task.abort();
    }
}

impl Drop for AlertFeed {
    fn drop(&mut self) {
        if let Ok(subscription) = self.subscription.try_lock() {
            if subscription.is_some() {
                warn!("alert feed dropped while subscribed; channel leaked");
            }
        }
    }
}
