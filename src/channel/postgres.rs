use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{ChangeNotifier, ChangeSubscription, SubscriptionId};
use crate::config::config;
use crate::store::StoreError;

/// LISTEN/NOTIFY-backed change notifier.
///
/// Relies on the row-change triggers installed by the migrations, which
/// `pg_notify` on `<table>_changed` for every insert, update, and delete.
pub struct PgChangeNotifier {
    pool: PgPool,
    listeners: RwLock<HashMap<SubscriptionId, JoinHandle<()>>>,
}

impl PgChangeNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            listeners: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ChangeNotifier for PgChangeNotifier {
    async fn subscribe(&self, table: &str) -> Result<ChangeSubscription, StoreError> {
        let channel = format!("{}{}", table, config().channel.suffix);

        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(&channel).await?;
        debug!("listening on notify channel {}", channel);

        let (tx, rx) = mpsc::channel(config().channel.buffer);
        let task = tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    Ok(_) => {
                        if tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        if tx.is_closed() {
                            break;
                        }
                        // The listener reconnects on the next recv; back
                        // off briefly to avoid a tight loop while the
                        // connection is down.
                        warn!("notify channel {} error: {}", channel, err);
                        tokio::time::sleep(Duration::from_millis(500)).await;
                    }
                }
            }
        });

        let id = SubscriptionId::new();
        self.listeners.write().await.insert(id, task);
        Ok(ChangeSubscription { id, changes: rx })
    }

    async fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(task) = self.listeners.write().await.remove(&id) {
            // Dropping the task drops the listener, releasing the LISTEN.
            task.abort();
        }
    }
}
