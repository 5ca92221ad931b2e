use super::super::domain::{ActivityRecord, ReportingPeriod};
use super::super::loader::{GenbaArea, UserProfile};

/// Storage abstraction so the service can be exercised in isolation.
pub trait ActivityRepository: Send + Sync {
    fn insert(&self, record: ActivityRecord) -> Result<ActivityRecord, RepositoryError>;
    fn list(
        &self,
        period: Option<ReportingPeriod>,
    ) -> Result<Vec<ActivityRecord>, RepositoryError>;
}

/// Lookup of the areas and people an activity can be attributed to.
pub trait GenbaDirectory: Send + Sync {
    fn area(&self, id: &str) -> Result<Option<GenbaArea>, RepositoryError>;
    fn user(&self, id: &str) -> Result<Option<UserProfile>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
