use std::sync::Arc;
use tracing::info;

use crate::auth::{require_session, SessionProvider};
use crate::error::CoreError;
use crate::models::profile::{Profile, ProfilePatch};
use crate::store::AlertStore;

/// Read and edit the caller's own profile.
pub struct ProfileService {
    sessions: Arc<dyn SessionProvider>,
    store: Arc<dyn AlertStore>,
}

impl ProfileService {
    pub fn new(sessions: Arc<dyn SessionProvider>, store: Arc<dyn AlertStore>) -> Self {
        Self { sessions, store }
    }

    /// The session owner's profile. A session without a profile row is
    /// treated as unauthenticated.
    pub async fn own_profile(&self) -> Result<Profile, CoreError> {
        let session = require_session(self.sessions.as_ref()).await?;
        self.store
            .select_profile(session.user_id)
            .await?
            .ok_or(CoreError::NotAuthenticated)
    }

    /// Update the caller's editable display fields. Role and id are not
    /// reachable through this path.
    pub async fn update_own_profile(&self, patch: ProfilePatch) -> Result<(), CoreError> {
        let session = require_session(self.sessions.as_ref()).await?;
        if patch.is_empty() {
            return Ok(());
        }

        self.store.update_profile(session.user_id, patch).await?;
        info!("profile {} updated", session.user_id);
        Ok(())
    }
}
