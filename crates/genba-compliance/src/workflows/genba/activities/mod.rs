//! Genba activity intake: validation, storage and the HTTP surface for it.

pub(crate) mod guard;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use guard::{ActivityGuard, ActivitySubmission, ValidationError};
pub use repository::{ActivityRepository, GenbaDirectory, RepositoryError};
pub use router::activity_router;
pub use service::{ActivityServiceError, GenbaActivityService};
