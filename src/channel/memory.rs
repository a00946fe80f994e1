use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;

use super::{ChangeNotifier, ChangeSubscription, SubscriptionId};
use crate::config::config;
use crate::store::StoreError;

/// Process-local change hub: one broadcast topic per table.
///
/// The in-memory store publishes here after every mutation, mirroring the
/// row-change triggers the Postgres backend installs.
pub struct MemoryHub {
    topics: RwLock<HashMap<String, broadcast::Sender<()>>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Publish a row-changed signal for `table`. Dropped silently when no
    /// subscriber is listening.
    pub async fn notify(&self, table: &str) {
        if let Some(sender) = self.topics.read().await.get(table) {
            let _ = sender.send(());
        }
    }

    async fn sender_for(&self, table: &str) -> broadcast::Sender<()> {
        let mut topics = self.topics.write().await;
        topics
            .entry(table.to_string())
            .or_insert_with(|| broadcast::channel(config().channel.buffer).0)
            .clone()
    }
}

impl Default for MemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory `ChangeNotifier` backed by a shared hub.
pub struct MemoryNotifier {
    hub: Arc<MemoryHub>,
    forwarders: RwLock<HashMap<SubscriptionId, JoinHandle<()>>>,
}

impl MemoryNotifier {
    pub fn new(hub: Arc<MemoryHub>) -> Self {
        Self {
            hub,
            forwarders: RwLock::new(HashMap::new()),
        }
    }

    /// Number of currently open subscriptions.
    pub async fn active_subscriptions(&self) -> usize {
        self.forwarders.read().await.len()
    }
}

#[async_trait]
impl ChangeNotifier for MemoryNotifier {
    async fn subscribe(&self, table: &str) -> Result<ChangeSubscription, StoreError> {
        let mut topic = self.hub.sender_for(table).await.subscribe();
        let (tx, rx) = mpsc::channel(config().channel.buffer);

        let forwarder = tokio::spawn(async move {
            loop {
                match topic.recv().await {
                    Ok(()) => {
                        if tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    // A lagged receiver collapses the missed burst into a
                    // single signal; the subscriber refetches anyway.
                    Err(broadcast::error::RecvError::Lagged(_)) => {
                        if tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        let id = SubscriptionId::new();
        self.forwarders.write().await.insert(id, forwarder);
        Ok(ChangeSubscription { id, changes: rx })
    }

    async fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(forwarder) = self.forwarders.write().await.remove(&id) {
            forwarder.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ALERTS_TABLE;

    #[tokio::test]
    async fn notify_reaches_subscriber() {
        let hub = Arc::new(MemoryHub::new());
        let notifier = MemoryNotifier::new(hub.clone());

        let mut sub = notifier.subscribe(ALERTS_TABLE).await.unwrap();
        hub.notify(ALERTS_TABLE).await;

        assert!(sub.changes.recv().await.is_some());
    }

    #[tokio::test]
    async fn unsubscribe_closes_the_stream() {
        let hub = Arc::new(MemoryHub::new());
        let notifier = MemoryNotifier::new(hub.clone());

        let mut sub = notifier.subscribe(ALERTS_TABLE).await.unwrap();
        notifier.unsubscribe(sub.id).await;
        assert_eq!(notifier.active_subscriptions().await, 0);

        hub.notify(ALERTS_TABLE).await;
        assert!(sub.changes.recv().await.is_none());
    }

    #[tokio::test]
    async fn tables_are_independent_topics() {
        let hub = Arc::new(MemoryHub::new());
        let notifier = MemoryNotifier::new(hub.clone());

        let mut sub = notifier.subscribe(ALERTS_TABLE).await.unwrap();
        hub.notify("profiles").await;
        hub.notify(ALERTS_TABLE).await;

        // Only the alerts signal arrives.
        assert!(sub.changes.recv().await.is_some());
        assert!(sub.changes.try_recv().is_err());
    }
}
