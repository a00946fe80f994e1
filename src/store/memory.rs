use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query::{AlertQuery, SortDirection};
use super::{AlertStore, StoreError, ALERTS_TABLE, PROFILES_TABLE};
use crate::channel::{MemoryHub, MemoryNotifier};
use crate::models::alert::{Alert, AlertStatus, AlertWithSubmitter, NewAlert};
use crate::models::profile::{Profile, ProfilePatch};

/// In-memory store for tests and database-free embeddings.
///
/// Every mutation publishes a change signal on the shared hub, mirroring
/// the row-change triggers the Postgres backend installs.
pub struct MemoryStore {
    alerts: RwLock<HashMap<Uuid, Alert>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    hub: Arc<MemoryHub>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            alerts: RwLock::new(HashMap::new()),
            profiles: RwLock::new(HashMap::new()),
            hub: Arc::new(MemoryHub::new()),
        }
    }

    pub fn hub(&self) -> Arc<MemoryHub> {
        self.hub.clone()
    }

    /// A notifier bound to this store's hub.
    pub fn notifier(&self) -> MemoryNotifier {
        MemoryNotifier::new(self.hub.clone())
    }

    /// Seed a profile row. Registration itself lives with the identity
    /// provider, outside the core.
    pub async fn insert_profile(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.id, profile);
        self.hub.notify(PROFILES_TABLE).await;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn insert_alert(&self, new_alert: NewAlert) -> Result<Uuid, StoreError> {
        let alert = Alert {
            id: Uuid::new_v4(),
            submitter_id: new_alert.submitter_id,
            alert_type: new_alert.alert_type,
            location: new_alert.location,
            description: new_alert.description,
            status: AlertStatus::Pending,
            created_at: Utc::now(),
        };
        let id = alert.id;

        self.alerts.write().await.insert(id, alert);
        self.hub.notify(ALERTS_TABLE).await;
        Ok(id)
    }

    async fn update_alert_status(&self, id: Uuid, status: AlertStatus) -> Result<(), StoreError> {
        {
            let mut alerts = self.alerts.write().await;
            let alert = alerts
                .get_mut(&id)
                .ok_or_else(|| StoreError::NotFound(format!("alert {}", id)))?;
            alert.status = status;
        }
        self.hub.notify(ALERTS_TABLE).await;
        Ok(())
    }

    async fn select_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertWithSubmitter>, StoreError> {
        let alerts = self.alerts.read().await;
        let profiles = self.profiles.read().await;

        let mut rows: Vec<Alert> = alerts
            .values()
            .filter(|a| query.matches(a.alert_type))
            .cloned()
            .collect();
        match query.order {
            SortDirection::Asc => rows.sort_by_key(|a| a.created_at),
            SortDirection::Desc => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        Ok(rows
            .into_iter()
            .map(|alert| {
                let submitter = profiles
                    .get(&alert.submitter_id)
                    .map(Profile::submitter_info);
                AlertWithSubmitter { alert, submitter }
            })
            .collect())
    }

    async fn select_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> Result<(), StoreError> {
        {
            let mut profiles = self.profiles.write().await;
            let profile = profiles
                .get_mut(&user_id)
                .ok_or_else(|| StoreError::NotFound(format!("profile {}", user_id)))?;

            if let Some(full_name) = patch.full_name {
                profile.full_name = full_name;
            }
            if let Some(student_number) = patch.student_number {
                profile.student_number = Some(student_number);
            }
            if let Some(department) = patch.department {
                profile.department = Some(department);
            }
            if let Some(year) = patch.year {
                profile.year = Some(year);
            }
        }
        self.hub.notify(PROFILES_TABLE).await;
        Ok(())
    }
}
