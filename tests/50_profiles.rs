mod common;

use std::sync::Arc;

use anyhow::Result;

use campus_alert_core::auth::{require_role, require_session, SessionProvider};
use campus_alert_core::error::CoreError;
use campus_alert_core::models::profile::{ProfilePatch, Role};
use campus_alert_core::services::ProfileService;

use common::{seeded_store, TestSessions};

#[tokio::test]
async fn role_gate_rejects_the_wrong_role() -> Result<()> {
    let env = seeded_store().await;

    let student_sessions = TestSessions::signed_in(env.student);
    let session = require_session(&student_sessions).await?;

    // A student passes the student gate but not the staff gate.
    let profile = require_role(env.store.as_ref(), &session, Role::Student).await?;
    assert_eq!(profile.full_name, "Ada Okafor");

    let err = require_role(env.store.as_ref(), &session, Role::Staff)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    Ok(())
}

#[tokio::test]
async fn role_gate_rejects_sessions_without_a_profile() -> Result<()> {
    let env = seeded_store().await;

    let sessions = TestSessions::signed_in(uuid::Uuid::new_v4());
    let session = require_session(&sessions).await?;

    let err = require_role(env.store.as_ref(), &session, Role::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotAuthenticated));
    Ok(())
}

#[tokio::test]
async fn sign_out_invalidates_the_session() -> Result<()> {
    let env = seeded_store().await;
    let sessions = TestSessions::signed_in(env.staff);

    assert!(require_session(&sessions).await.is_ok());
    sessions.sign_out().await;
    assert!(matches!(
        require_session(&sessions).await.unwrap_err(),
        CoreError::NotAuthenticated
    ));
    Ok(())
}

#[tokio::test]
async fn profile_edits_round_trip_and_never_touch_role() -> Result<()> {
    let env = seeded_store().await;
    let sessions = Arc::new(TestSessions::signed_in(env.student));
    let service = ProfileService::new(sessions, env.store.clone());

    let before = service.own_profile().await?;
    assert_eq!(before.role, Role::Student);

    service
        .update_own_profile(ProfilePatch {
            full_name: Some("Ada N. Okafor".to_string()),
            year: Some(2),
            ..Default::default()
        })
        .await?;

    let after = service.own_profile().await?;
    assert_eq!(after.full_name, "Ada N. Okafor");
    assert_eq!(after.year, Some(2));
    assert_eq!(after.role, Role::Student);
    // Untouched fields survive the patch.
    assert_eq!(after.department.as_deref(), Some("History"));
    Ok(())
}

#[tokio::test]
async fn profile_service_requires_a_session() -> Result<()> {
    let env = seeded_store().await;
    let sessions = Arc::new(TestSessions::signed_out());
    let service = ProfileService::new(sessions, env.store.clone());

    assert!(matches!(
        service.own_profile().await.unwrap_err(),
        CoreError::NotAuthenticated
    ));
    assert!(matches!(
        service
            .update_own_profile(ProfilePatch {
                year: Some(4),
                ..Default::default()
            })
            .await
            .unwrap_err(),
        CoreError::NotAuthenticated
    ));
    Ok(())
}
