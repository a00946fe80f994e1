use async_trait::async_trait;
use tracing::warn;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::profile::{Profile, Role};
use crate::store::AlertStore;

/// An authenticated caller, as reported by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
}

/// Seam to the external identity provider.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The current valid session, if any.
    async fn current_session(&self) -> Option<Session>;

    /// Invalidate the current session.
    async fn sign_out(&self);
}

/// Resolve the current session or fail.
pub async fn require_session(sessions: &dyn SessionProvider) -> Result<Session, CoreError> {
    sessions
        .current_session()
        .await
        .ok_or(CoreError::NotAuthenticated)
}

/// Load the caller's profile and check it carries the expected role.
///
/// A missing profile or a role mismatch is treated as unauthenticated,
/// matching the login gate such a caller would hit in the UI.
pub async fn require_role(
    store: &dyn AlertStore,
    session: &Session,
    role: Role,
) -> Result<Profile, CoreError> {
    let profile = store
        .select_profile(session.user_id)
        .await?
        .ok_or(CoreError::NotAuthenticated)?;

    if profile.role != role {
        warn!(
            "user {} attempted {}-gated access with role {}",
            session.user_id, role, profile.role
        );
        return Err(CoreError::NotAuthenticated);
    }

    Ok(profile)
}
