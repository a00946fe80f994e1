use serde::{Deserialize, Serialize};

use crate::models::alert::AlertType;

/// Sort direction over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl Default for SortDirection {
    // Most recent first is the feed's display order.
    fn default() -> Self {
        SortDirection::Desc
    }
}

/// The eq/order predicate surface of the alert query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertQuery {
    /// Equality predicate on alert type; `None` selects every row.
    pub alert_type: Option<AlertType>,
    pub order: SortDirection,
}

impl AlertQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_type(alert_type: AlertType) -> Self {
        Self {
            alert_type: Some(alert_type),
            ..Self::default()
        }
    }

    /// Whether a row of type `alert_type` satisfies the predicate.
    pub fn matches(&self, alert_type: AlertType) -> bool {
        match self.alert_type {
            Some(wanted) => wanted == alert_type,
            None => true,
        }
    }
}

/// Display filter selected by staff. Filtering affects which rows the next
/// load fetches; it never mutates stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertFilter {
    All,
    Only(AlertType),
}

impl AlertFilter {
    pub fn query(&self) -> AlertQuery {
        match self {
            AlertFilter::All => AlertQuery::all(),
            AlertFilter::Only(alert_type) => AlertQuery::of_type(*alert_type),
        }
    }
}

impl Default for AlertFilter {
    fn default() -> Self {
        AlertFilter::All
    }
}
