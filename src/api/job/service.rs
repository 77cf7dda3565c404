use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::DeferredJson;
use crate::auth::permissions::{authorize, authorize_object, IsAuthenticated, IsEmployer, IsJobOwner};
use crate::auth::{Principal, Role};
use crate::db::store::{JobScope, Store};

use super::dto::{JobPostingInput, JobPostingView};
use super::filters::JobPostingFilter;
use super::models::JobPosting;
use super::serializer;

/// Job posting use cases, with role and ownership checks applied
pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// List postings visible to the caller.
    ///
    /// Employers see all of their own postings, active or not. Everyone else
    /// sees active postings of every employer.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &JobPostingFilter,
    ) -> Result<Vec<JobPostingView>, ApiError> {
        authorize(principal, &[&IsAuthenticated])?;

        let scope = match principal.user() {
            Some(user) if user.role == Role::Employer => JobScope::OwnedBy(user.id),
            _ => JobScope::Active,
        };
        debug!("Service: Listing jobs with scope={:?}, filter={:?}", scope, filter);

        let jobs = self.store.list_jobs(scope, filter).await?;
        Ok(jobs.into_iter().map(JobPostingView::from).collect())
    }

    /// Create a posting owned by the calling employer.
    ///
    /// The body is decoded only after the caller passed the role gates.
    pub async fn create(
        &self,
        principal: &Principal,
        body: DeferredJson<JobPostingInput>,
    ) -> Result<JobPostingView, ApiError> {
        authorize(principal, &[&IsAuthenticated, &IsEmployer])?;
        let employer = principal.user().ok_or(ApiError::Unauthorized)?;

        let input = body.decode()?;
        serializer::validate(&input, None, false)?;
        let job = serializer::create(self.store.as_ref(), employer, input).await?;

        info!(
            "Service: Job posting created id={} employer={} location={}",
            job.id, job.employer, job.location.id
        );
        Ok(job.into())
    }

    /// Fetch one posting. Employers may only fetch their own.
    pub async fn retrieve(&self, principal: &Principal, id: Uuid) -> Result<JobPostingView, ApiError> {
        authorize(principal, &[&IsAuthenticated])?;

        let job = self.get(id).await?;
        if principal.role() == Some(Role::Employer) {
            authorize_object(principal, &job, &[&IsJobOwner])?;
        }
        Ok(job.into())
    }

    /// Full (`partial == false`) or partial update by the owning employer.
    /// Ownership is settled before the body is looked at.
    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        body: DeferredJson<JobPostingInput>,
        partial: bool,
    ) -> Result<JobPostingView, ApiError> {
        let job = self.owned_job(principal, id).await?;

        let input = body.decode()?;
        serializer::validate(&input, Some(&job), partial)?;
        let job = serializer::update(self.store.as_ref(), job, input).await?;

        info!("Service: Job posting updated id={}", job.id);
        Ok(job.into())
    }

    /// Delete a posting owned by the caller. Its location row is kept.
    pub async fn delete(&self, principal: &Principal, id: Uuid) -> Result<(), ApiError> {
        let job = self.owned_job(principal, id).await?;

        if !self.store.delete_job(job.id).await? {
            return Err(ApiError::NotFound("Job posting"));
        }
        info!("Service: Job posting deleted id={}", job.id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<JobPosting, ApiError> {
        self.store
            .find_job(id)
            .await?
            .ok_or(ApiError::NotFound("Job posting"))
    }

    /// Gate for write operations: employer role first, then existence, then ownership
    async fn owned_job(&self, principal: &Principal, id: Uuid) -> Result<JobPosting, ApiError> {
        authorize(principal, &[&IsAuthenticated, &IsEmployer])?;
        let job = self.get(id).await?;
        authorize_object(principal, &job, &[&IsJobOwner])?;
        Ok(job)
    }
}
