use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::alert::{AlertStatus, AlertWithSubmitter, NewAlert};
use crate::models::profile::{Profile, ProfilePatch};

pub mod memory;
pub mod postgres;
pub mod query;

pub use memory::MemoryStore;
pub use postgres::PgAlertStore;
pub use query::{AlertFilter, AlertQuery, SortDirection};

pub const ALERTS_TABLE: &str = "alerts";
pub const PROFILES_TABLE: &str = "profiles";

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Seam to the persistent store holding the `alerts` and `profiles` tables.
///
/// Insert assigns id, pending status, and the creation timestamp at the
/// store layer. The core never deletes alerts; retention belongs to the
/// store.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Insert a new alert row and return its assigned id.
    async fn insert_alert(&self, new_alert: NewAlert) -> Result<Uuid, StoreError>;

    /// Write `status` for an existing alert. Rewriting the current value
    /// is allowed and harmless.
    async fn update_alert_status(&self, id: Uuid, status: AlertStatus) -> Result<(), StoreError>;

    /// Fetch alerts matching `query`, each joined to its submitter's
    /// display profile.
    async fn select_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertWithSubmitter>, StoreError>;

    /// Fetch a single profile by user id.
    async fn select_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Apply `patch` to the editable display fields of a profile.
    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> Result<(), StoreError>;
}
