use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use std::time::Duration;
use uuid::Uuid;

use super::query::AlertQuery;
use super::{AlertStore, StoreError};
use crate::config::config;
use crate::models::alert::{Alert, AlertStatus, AlertWithSubmitter, NewAlert};
use crate::models::geo::Coordinates;
use crate::models::profile::{Profile, ProfilePatch, SubmitterInfo};

const INSERT_ALERT: &str = r#"
INSERT INTO alerts (submitter_id, alert_type, location_lat, location_lng, description)
VALUES ($1, $2, $3, $4, $5)
RETURNING id;
"#;

const UPDATE_ALERT_STATUS: &str = r#"
UPDATE alerts SET status = $2 WHERE id = $1;
"#;

const SELECT_ALERTS_BASE: &str = r#"
SELECT a.id, a.submitter_id, a.alert_type, a.location_lat, a.location_lng,
       a.description, a.status, a.created_at,
       p.full_name, p.student_number, p.department, p.year
FROM alerts a
LEFT JOIN profiles p ON p.id = a.submitter_id
"#;

const SELECT_PROFILE: &str = r#"
SELECT id, full_name, email, student_number, department, year, role
FROM profiles WHERE id = $1;
"#;

const UPDATE_PROFILE: &str = r#"
UPDATE profiles
SET full_name = COALESCE($2, full_name),
    student_number = COALESCE($3, student_number),
    department = COALESCE($4, department),
    year = COALESCE($5, year)
WHERE id = $1;
"#;

/// Postgres-backed alert store.
pub struct PgAlertStore {
    pool: PgPool,
}

impl PgAlertStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using the configured database URL and pool limits.
    pub async fn connect() -> Result<Self, StoreError> {
        let db = &config().database;
        let url = db
            .url
            .as_deref()
            .ok_or_else(|| StoreError::Connection("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.connection_timeout_secs))
            .connect(url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct FeedRow {
    id: Uuid,
    submitter_id: Uuid,
    alert_type: String,
    location_lat: Option<f64>,
    location_lng: Option<f64>,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    full_name: Option<String>,
    student_number: Option<String>,
    department: Option<String>,
    year: Option<i32>,
}

impl FeedRow {
    fn into_entry(self) -> Result<AlertWithSubmitter, StoreError> {
        let location = match (self.location_lat, self.location_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        let alert = Alert {
            id: self.id,
            submitter_id: self.submitter_id,
            alert_type: self
                .alert_type
                .parse()
                .map_err(|e| StoreError::Query(format!("{}", e)))?,
            location,
            description: self.description,
            status: self
                .status
                .parse()
                .map_err(|e| StoreError::Query(format!("{}", e)))?,
            created_at: self.created_at,
        };
        let submitter = self.full_name.map(|full_name| SubmitterInfo {
            full_name,
            student_number: self.student_number,
            department: self.department,
            year: self.year,
        });
        Ok(AlertWithSubmitter { alert, submitter })
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: Uuid,
    full_name: String,
    email: Option<String>,
    student_number: Option<String>,
    department: Option<String>,
    year: Option<i32>,
    role: String,
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile, StoreError> {
        Ok(Profile {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            student_number: self.student_number,
            department: self.department,
            year: self.year,
            role: self
                .role
                .parse()
                .map_err(|e| StoreError::Query(format!("{}", e)))?,
        })
    }
}

#[async_trait]
impl AlertStore for PgAlertStore {
    async fn insert_alert(&self, new_alert: NewAlert) -> Result<Uuid, StoreError> {
        let (lat, lng) = match new_alert.location {
            Some(c) => (Some(c.lat), Some(c.lng)),
            None => (None, None),
        };

        let (id,): (Uuid,) = sqlx::query_as(INSERT_ALERT)
            .bind(new_alert.submitter_id)
            .bind(new_alert.alert_type.as_str())
            .bind(lat)
            .bind(lng)
            .bind(new_alert.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update_alert_status(&self, id: Uuid, status: AlertStatus) -> Result<(), StoreError> {
        let result = sqlx::query(UPDATE_ALERT_STATUS)
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("alert {}", id)));
        }
        Ok(())
    }

    async fn select_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertWithSubmitter>, StoreError> {
        let mut sql = String::from(SELECT_ALERTS_BASE);
        if query.alert_type.is_some() {
            sql.push_str("WHERE a.alert_type = $1\n");
        }
        sql.push_str(&format!("ORDER BY a.created_at {};", query.order.to_sql()));

        let statement = sqlx::query_as::<_, FeedRow>(&sql);
        let rows = match query.alert_type {
            Some(alert_type) => statement.bind(alert_type.as_str()).fetch_all(&self.pool).await?,
            None => statement.fetch_all(&self.pool).await?,
        };

        rows.into_iter().map(FeedRow::into_entry).collect()
    }

    async fn select_profile(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as(SELECT_PROFILE)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProfileRow::into_profile).transpose()
    }

    async fn update_profile(&self, user_id: Uuid, patch: ProfilePatch) -> Result<(), StoreError> {
        let result = sqlx::query(UPDATE_PROFILE)
            .bind(user_id)
            .bind(patch.full_name)
            .bind(patch.student_number)
            .bind(patch.department)
            .bind(patch.year)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("profile {}", user_id)));
        }
        Ok(())
    }
}
