use thiserror::Error;

use crate::models::alert::{AlertDraft, AlertType};
use crate::models::geo::LocationFix;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("location is required for {0} alerts")]
    LocationRequired(AlertType),
}

/// Validates type-specific requirements and builds a submittable draft.
///
/// Pure construction: no persistence, no identity. A missing fix for a
/// severity that mandates one blocks here, before any store call; a
/// location-required alert is never silently downgraded to a location-less
/// one.
pub struct AlertComposer;

impl AlertComposer {
    pub fn compose(
        alert_type: AlertType,
        description: Option<&str>,
        fix: Option<&LocationFix>,
    ) -> Result<AlertDraft, ComposeError> {
        let location = if alert_type.requires_location() {
            match fix {
                Some(fix) => Some(fix.coordinates()),
                None => return Err(ComposeError::LocationRequired(alert_type)),
            }
        } else {
            // General alerts never carry a position, even when one is known.
            None
        };

        let description = if alert_type.accepts_description() {
            description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_owned)
        } else {
            None
        };

        Ok(AlertDraft {
            alert_type,
            description,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fix(lat: f64, lng: f64) -> LocationFix {
        LocationFix {
            lat,
            lng,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn high_without_fix_is_rejected() {
        let err = AlertComposer::compose(AlertType::High, None, None).unwrap_err();
        assert_eq!(err, ComposeError::LocationRequired(AlertType::High));

        let core: crate::error::CoreError = err.into();
        assert!(matches!(
            core,
            crate::error::CoreError::LocationRequired(AlertType::High)
        ));
    }

    #[test]
    fn moderate_without_fix_is_rejected() {
        let err = AlertComposer::compose(AlertType::Moderate, Some("hallway flooding"), None)
            .unwrap_err();
        assert_eq!(err, ComposeError::LocationRequired(AlertType::Moderate));
    }

    #[test]
    fn high_drops_description_and_copies_fix() {
        let draft =
            AlertComposer::compose(AlertType::High, Some("ignored"), Some(&fix(37.0, -122.0)))
                .unwrap();
        assert_eq!(draft.description, None);
        let location = draft.location.unwrap();
        assert_eq!(location.lat, 37.0);
        assert_eq!(location.lng, -122.0);
    }

    #[test]
    fn general_never_carries_location() {
        let draft =
            AlertComposer::compose(AlertType::General, Some("noisy party"), Some(&fix(1.0, 2.0)))
                .unwrap();
        assert_eq!(draft.location, None);
        assert_eq!(draft.description.as_deref(), Some("noisy party"));
    }

    #[test]
    fn general_without_fix_is_fine() {
        let draft = AlertComposer::compose(AlertType::General, None, None).unwrap();
        assert_eq!(draft.location, None);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn blank_description_becomes_none() {
        let draft =
            AlertComposer::compose(AlertType::Moderate, Some("   "), Some(&fix(1.0, 2.0)))
                .unwrap();
        assert_eq!(draft.description, None);
    }

    #[test]
    fn description_is_trimmed() {
        let draft =
            AlertComposer::compose(AlertType::Moderate, Some("  broken gate "), Some(&fix(1.0, 2.0)))
                .unwrap();
        assert_eq!(draft.description.as_deref(), Some("broken gate"));
    }
}
