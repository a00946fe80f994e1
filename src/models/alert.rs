use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::geo::Coordinates;
use super::profile::SubmitterInfo;

/// Severity of a student-submitted alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    High,
    Moderate,
    General,
}

impl AlertType {
    pub const ALL: [AlertType; 3] = [AlertType::High, AlertType::Moderate, AlertType::General];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::High => "high",
            AlertType::Moderate => "moderate",
            AlertType::General => "general",
        }
    }

    /// High and moderate alerts cannot be raised without a position.
    pub fn requires_location(&self) -> bool {
        matches!(self, AlertType::High | AlertType::Moderate)
    }

    /// The high-severity path skips detail collection entirely.
    pub fn accepts_description(&self) -> bool {
        !matches!(self, AlertType::High)
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown alert type: {0}")]
pub struct ParseAlertTypeError(String);

impl FromStr for AlertType {
    type Err = ParseAlertTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(AlertType::High),
            "moderate" => Ok(AlertType::Moderate),
            "general" => Ok(AlertType::General),
            other => Err(ParseAlertTypeError(other.to_string())),
        }
    }
}

/// Resolution status. New alerts always start out pending; only staff
/// action flips them, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Pending,
    Completed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown alert status: {0}")]
pub struct ParseAlertStatusError(String);

impl FromStr for AlertStatus {
    type Err = ParseAlertStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AlertStatus::Pending),
            "completed" => Ok(AlertStatus::Completed),
            other => Err(ParseAlertStatusError(other.to_string())),
        }
    }
}

/// A stored alert row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub submitter_id: Uuid,
    pub alert_type: AlertType,
    pub location: Option<Coordinates>,
    pub description: Option<String>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

/// A validated alert payload, ready to submit.
///
/// Produced by the composer. Carries no identity or timestamps; those are
/// attached by the submission service and the store respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDraft {
    pub alert_type: AlertType,
    pub description: Option<String>,
    pub location: Option<Coordinates>,
}

/// Insert payload for the store. Status and creation time are assigned at
/// the store layer so submitter clocks never skew stored ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    pub submitter_id: Uuid,
    pub alert_type: AlertType,
    pub location: Option<Coordinates>,
    pub description: Option<String>,
}

/// An alert joined to its submitter's display profile, as shown to staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertWithSubmitter {
    pub alert: Alert,
    pub submitter: Option<SubmitterInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_type_round_trips_through_str() {
        for t in AlertType::ALL {
            assert_eq!(t.as_str().parse::<AlertType>().unwrap(), t);
        }
        assert!("severe".parse::<AlertType>().is_err());
    }

    #[test]
    fn location_requirement_follows_severity() {
        assert!(AlertType::High.requires_location());
        assert!(AlertType::Moderate.requires_location());
        assert!(!AlertType::General.requires_location());
    }

    #[test]
    fn only_high_skips_description() {
        assert!(!AlertType::High.accepts_description());
        assert!(AlertType::Moderate.accepts_description());
        assert!(AlertType::General.accepts_description());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AlertStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!("completed".parse::<AlertStatus>().unwrap(), AlertStatus::Completed);
    }
}
