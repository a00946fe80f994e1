use thiserror::Error;

use crate::location::sensor::SensorError;
use crate::models::alert::AlertType;
use crate::services::composer::ComposeError;
use crate::store::StoreError;

/// Crate-wide error taxonomy.
///
/// Composition failures block submission before any store call is made;
/// authentication and persistence failures propagate to the caller
/// unretried; sensor errors are non-fatal to tracking.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("location is required for {0} alerts")]
    LocationRequired(AlertType),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("sensor error: {0}")]
    Sensor(#[from] SensorError),
}

impl From<ComposeError> for CoreError {
    fn from(err: ComposeError) -> Self {
        match err {
            ComposeError::LocationRequired(alert_type) => CoreError::LocationRequired(alert_type),
        }
    }
}
