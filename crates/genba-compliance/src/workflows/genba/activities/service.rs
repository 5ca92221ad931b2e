use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::info;

use super::super::domain::ActivityRecord;
use super::super::filter::ActivityFilter;
use super::guard::{ActivityGuard, ActivitySubmission, ValidationError};
use super::repository::{ActivityRepository, GenbaDirectory, RepositoryError};

/// Service composing submission validation, the area/user directory and storage.
pub struct GenbaActivityService<R, D> {
    guard: ActivityGuard,
    repository: Arc<R>,
    directory: Arc<D>,
}

static ACTIVITY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_activity_id() -> String {
    let id = ACTIVITY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("act-{id:06}")
}

impl<R, D> GenbaActivityService<R, D>
where
    R: ActivityRepository + 'static,
    D: GenbaDirectory + 'static,
{
    pub fn new(repository: Arc<R>, directory: Arc<D>) -> Self {
        Self {
            guard: ActivityGuard,
            repository,
            directory,
        }
    }

    /// Validate a submission, attribute it to its area and reporter, and store it.
    pub fn submit(
        &self,
        submission: ActivitySubmission,
    ) -> Result<ActivityRecord, ActivityServiceError> {
        self.guard.check_required(&submission)?;

        let area = self.directory.area(submission.area_id.trim())?;
        let reporter = self.directory.user(submission.reporter_id.trim())?;
        let mut record = self
            .guard
            .record_from_submission(submission, area, reporter)?;
        record.id = next_activity_id();

        let stored = self.repository.insert(record)?;
        info!(
            activity_id = %stored.id,
            area_id = %stored.area_id,
            date = %stored.date,
            "genba activity recorded"
        );
        Ok(stored)
    }

    /// Stored activities matching the filter, in storage order.
    pub fn list(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityRecord>, ActivityServiceError> {
        let records = self.repository.list(filter.period)?;
        Ok(filter.apply(&records))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
