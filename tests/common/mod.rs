#![allow(dead_code)]

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use campus_alert_core::auth::{Session, SessionProvider};
use campus_alert_core::models::alert::{AlertStatus, AlertWithSubmitter, NewAlert};
use campus_alert_core::models::profile::{Profile, ProfilePatch, Role};
use campus_alert_core::store::{AlertQuery, AlertStore, MemoryStore, StoreError};

/// Switchable session provider standing in for the identity provider.
pub struct TestSessions {
    current: RwLock<Option<Session>>,
}

impl TestSessions {
    pub fn signed_in(user_id: Uuid) -> Self {
        Self {
            current: RwLock::new(Some(Session { user_id })),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    pub async fn switch_to(&self, user_id: Uuid) {
        *self.current.write().await = Some(Session { user_id });
    }
}

#[async_trait]
impl SessionProvider for TestSessions {
    async fn current_session(&self) -> Option<Session> {
        *self.current.read().await
    }

    async fn sign_out(&self) {
        *self.current.write().await = None;
    }
}

/// Store wrapper whose reads can be told to fail.
pub struct FlakyStore {
    inner: Arc<MemoryStore>,
    fail_reads: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl AlertStore for FlakyStore {
    async fn insert_alert(&self, new_alert: NewAlert) -> Result<Uuid, StoreError> {
        self.inner.insert_alert(new_alert).await
    }

    async fn update_alert_status(&self, id: Uuid, status: AlertStatus) -> Result<(), StoreError> {
        self.inner.update_alert_status(id, status).await
    }

    async fn select_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertWithSubmitter>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Query("injected read failure".to_string()));
        }
        self.inner.select_alerts(query).await
    }

    async fn select_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        self.inner.select_profile(user_id).await
    }

    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> Result<(), StoreError> {
        self.inner.update_profile(user_id, patch).await
    }
}

pub fn student_profile(full_name: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        email: None,
        student_number: Some("S-2048".to_string()),
        department: Some("History".to_string()),
        year: Some(1),
        role: Role::Student,
    }
}

pub fn staff_profile(full_name: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        email: None,
        student_number: None,
        department: Some("Campus Security".to_string()),
        year: None,
        role: Role::Staff,
    }
}

/// Install a test subscriber once so RUST_LOG surfaces feed and tracker
/// logs during debugging.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// A seeded store with one student and one staff member.
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub student: Uuid,
    pub staff: Uuid,
}

pub async fn seeded_store() -> TestEnv {
    init_tracing();
    let store = Arc::new(MemoryStore::new());

    let student = student_profile("Ada Okafor");
    let staff = staff_profile("Marta Lindqvist");
    let (student_id, staff_id) = (student.id, staff.id);

    store.insert_profile(student).await;
    store.insert_profile(staff).await;

    TestEnv {
        store,
        student: student_id,
        staff: staff_id,
    }
}

/// Poll `check` until it passes or a second elapses. Live-channel effects
/// land asynchronously, so assertions on them go through here.
pub async fn wait_until<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
