use async_trait::async_trait;
use uuid::Uuid;

use crate::api::application::models::{ApplicationStatus, JobApplication};
use crate::api::job::filters::JobPostingFilter;
use crate::api::job::models::{JobPosting, Location, LocationKey, NewJobPosting};

/// Storage-level failures, passed through to the caller unmodified
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate {0}")]
    Duplicate(&'static str),

    #[error("{0} disappeared during the operation")]
    Missing(&'static str),
}

/// Which postings a listing may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobScope {
    /// Every posting of one employer, active or not
    OwnedBy(Uuid),
    /// Active postings of every employer
    Active,
}

/// Which applications a listing may see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    BySeeker(Uuid),
    /// Applications to postings owned by this employer
    ByEmployer(Uuid),
    ByJob(Uuid),
}

/// Persistence interface for the job board
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap connectivity probe
    async fn ping(&self) -> Result<(), StoreError>;

    /// Atomically fetch the location with this exact key, inserting it first
    /// if absent. Concurrent callers with the same new key all get the same row.
    async fn get_or_create_location(&self, key: &LocationKey) -> Result<Location, StoreError>;

    async fn insert_job(&self, job: NewJobPosting) -> Result<JobPosting, StoreError>;

    async fn find_job(&self, id: Uuid) -> Result<Option<JobPosting>, StoreError>;

    /// Listing ordered newest first
    async fn list_jobs(
        &self,
        scope: JobScope,
        filter: &JobPostingFilter,
    ) -> Result<Vec<JobPosting>, StoreError>;

    /// Persist the mutable fields of a posting (everything but id, employer and
    /// created_at), bump `updated_at` and return the stored row
    async fn save_job(&self, job: &JobPosting) -> Result<JobPosting, StoreError>;

    /// Delete a posting and its applications. Its location is kept.
    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Fails with `Duplicate` when the seeker already applied to the job
    async fn insert_application(
        &self,
        job_id: Uuid,
        job_seeker: Uuid,
    ) -> Result<JobApplication, StoreError>;

    async fn find_application(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError>;

    /// Listing ordered newest first
    async fn list_applications(
        &self,
        scope: ApplicationScope,
    ) -> Result<Vec<JobApplication>, StoreError>;

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<JobApplication, StoreError>;
}
