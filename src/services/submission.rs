use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::auth::{require_session, SessionProvider};
use crate::error::CoreError;
use crate::models::alert::{AlertDraft, NewAlert};
use crate::store::AlertStore;

/// Persists composed alerts under the authenticated identity.
pub struct AlertSubmissionService {
    sessions: Arc<dyn SessionProvider>,
    store: Arc<dyn AlertStore>,
}

impl AlertSubmissionService {
    pub fn new(sessions: Arc<dyn SessionProvider>, store: Arc<dyn AlertStore>) -> Self {
        Self { sessions, store }
    }

    /// Insert `draft` as a new pending alert owned by the current session.
    ///
    /// The store assigns pending status and the creation timestamp.
    /// Failures return to the caller; there is no automatic retry, the
    /// caller's draft stays intact for an explicit resend.
    pub async fn submit(&self, draft: AlertDraft) -> Result<Uuid, CoreError> {
        let session = require_session(self.sessions.as_ref()).await?;
        let alert_type = draft.alert_type;

        let id = self
            .store
            .insert_alert(NewAlert {
                submitter_id: session.user_id,
                alert_type: draft.alert_type,
                location: draft.location,
                description: draft.description,
            })
            .await?;

        info!("alert {} submitted ({} severity)", id, alert_type);
        Ok(id)
    }
}
