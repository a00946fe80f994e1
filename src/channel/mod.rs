use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::store::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::{MemoryHub, MemoryNotifier};
pub use postgres::PgChangeNotifier;

/// Opaque handle for an open subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription over one table.
///
/// The receiver yields one unit signal per delivered "row changed"
/// notification, with no payload and no event-kind distinction. Signals
/// may coalesce; subscribers refetch current state rather than patching
/// from notifications, so collapsed bursts are immaterial.
pub struct ChangeSubscription {
    pub id: SubscriptionId,
    pub changes: mpsc::Receiver<()>,
}

/// Seam to the change-notification facility.
#[async_trait]
pub trait ChangeNotifier: Send + Sync {
    /// Open a subscription delivering at least one signal per row
    /// mutation of `table`.
    async fn subscribe(&self, table: &str) -> Result<ChangeSubscription, StoreError>;

    /// Release a subscription. Unknown handles are ignored.
    async fn unsubscribe(&self, id: SubscriptionId);
}
