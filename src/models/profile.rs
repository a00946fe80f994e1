use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role column used for authorization gating: students raise alerts,
/// staff monitor and resolve them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "staff" => Ok(Role::Staff),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// A user profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub student_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub role: Role,
}

impl Profile {
    pub fn submitter_info(&self) -> SubmitterInfo {
        SubmitterInfo {
            full_name: self.full_name.clone(),
            student_number: self.student_number.clone(),
            department: self.department.clone(),
            year: self.year,
        }
    }
}

/// The display fields joined onto each feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitterInfo {
    pub full_name: String,
    pub student_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
}

/// Editable profile fields. `None` leaves a field untouched; id and role
/// are never editable through this path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub student_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.student_number.is_none()
            && self.department.is_none()
            && self.year.is_none()
    }
}
