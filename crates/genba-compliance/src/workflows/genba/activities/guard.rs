use super::super::domain::{parse_calendar_date, ActivityRecord, PhotoAttachment};
use super::super::loader::{GenbaArea, UserProfile};
use serde::{Deserialize, Serialize};

/// Raw form payload. Every field defaults so that missing input surfaces as a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySubmission {
    #[serde(default)]
    pub area_id: String,
    #[serde(default)]
    pub reporter_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "keterangan")]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<PhotoAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid activity date")]
    InvalidDate(String),
    #[error("unknown genba area {0}")]
    UnknownArea(String),
    #[error("unknown reporter {0}")]
    UnknownReporter(String),
}

/// Turns submissions into attributable activity records.
#[derive(Debug, Clone, Default)]
pub struct ActivityGuard;

impl ActivityGuard {
    /// Field checks that need no lookups; run before anything touches storage.
    pub fn check_required(&self, submission: &ActivitySubmission) -> Result<(), ValidationError> {
        let required = [
            ("area_id", &submission.area_id),
            ("reporter_id", &submission.reporter_id),
            ("date", &submission.date),
            ("description", &submission.description),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        Ok(())
    }

    pub fn record_from_submission(
        &self,
        submission: ActivitySubmission,
        area: Option<GenbaArea>,
        reporter: Option<UserProfile>,
    ) -> Result<ActivityRecord, ValidationError> {
        self.check_required(&submission)?;

        let date = parse_calendar_date(&submission.date)
            .map_err(|_| ValidationError::InvalidDate(submission.date.clone()))?;
        let area = area.ok_or_else(|| ValidationError::UnknownArea(submission.area_id.clone()))?;
        let reporter = reporter
            .ok_or_else(|| ValidationError::UnknownReporter(submission.reporter_id.clone()))?;

        Ok(ActivityRecord {
            id: String::new(),
            date,
            reporter_id: reporter.id,
            reporter_name: reporter.name,
            nik: reporter.nik,
            area_id: area.id,
            area_name: area.name,
            department_name: area.department_name,
            description: submission.description.trim().to_string(),
            photos: submission.photos,
        })
    }
}
