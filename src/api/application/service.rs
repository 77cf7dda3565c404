use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::api::error::ApiError;
use crate::api::job::models::JobPosting;
use crate::api::validation::{error_with_message, DeferredJson, NON_FIELD_ERRORS};
use crate::auth::permissions::{authorize, authorize_any, IsAdminUser, IsAuthenticated, IsEmployer, IsJobSeeker};
use crate::auth::{Principal, Role};
use crate::db::store::{ApplicationScope, Store, StoreError};

use super::dto::{ApplicationStatusInput, ApplicationView, NewApplicationInput};
use super::models::{ApplicationStatus, JobApplication};

const OWN_JOB: &str = "You cannot apply to your own job.";
const ALREADY_APPLIED: &str = "You have already applied to this job.";
const UNKNOWN_JOB: &str = "Job posting does not exist.";
const ONLY_OWN_APPLICATIONS: &str = "You can only view your own applications.";
const ONLY_YOUR_JOBS: &str = "You can only view applications for your jobs.";

/// Lifecycle events announced to the parties of an application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationEvent {
    Submitted,
    Accepted,
}

impl ApplicationEvent {
    /// Event raised by a status change, if any. Only entering `accepted` counts.
    pub fn on_transition(previous: ApplicationStatus, current: ApplicationStatus) -> Option<Self> {
        (previous != ApplicationStatus::Accepted && current == ApplicationStatus::Accepted)
            .then_some(ApplicationEvent::Accepted)
    }

    fn verb(&self) -> &'static str {
        match self {
            ApplicationEvent::Submitted => "submitted",
            ApplicationEvent::Accepted => "accepted",
        }
    }
}

// Recorded as a log event; no email is sent.
fn notify(event: ApplicationEvent, application: &JobApplication, job: &JobPosting) {
    info!(
        "Notification: application {} by {} {} for \"{}\" ({})",
        application.id,
        application.job_seeker,
        event.verb(),
        job.title,
        job.id
    );
}

fn rejected(field: &'static str, code: &'static str, message: &'static str) -> ApiError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error_with_message(code, message));
    ApiError::Validation(errors)
}

pub struct ApplicationService {
    store: Arc<dyn Store>,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Applications visible to the caller's role.
    ///
    /// # Returns
    /// Seekers get their own, employers get those to postings they own,
    /// admins get every application. Newest first.
    pub async fn list(&self, principal: &Principal) -> Result<Vec<ApplicationView>, ApiError> {
        authorize(principal, &[&IsAuthenticated])?;
        let user = principal.user().ok_or(ApiError::Unauthorized)?;

        let scope = match user.role {
            Role::JobSeeker => ApplicationScope::BySeeker(user.id),
            Role::Employer => ApplicationScope::ByEmployer(user.id),
            Role::Admin => ApplicationScope::All,
        };

        let applications = self.store.list_applications(scope).await?;
        self.views(applications).await
    }

    /// Apply the calling job seeker to the posting named in the body
    pub async fn apply(
        &self,
        principal: &Principal,
        body: DeferredJson<NewApplicationInput>,
    ) -> Result<ApplicationView, ApiError> {
        authorize(principal, &[&IsAuthenticated, &IsJobSeeker])?;
        let seeker = principal.user().ok_or(ApiError::Unauthorized)?;

        let input = body.decode()?;
        input.validate()?;

        let job = self
            .store
            .find_job(input.job_id)
            .await?
            .ok_or_else(|| rejected("job_id", "does_not_exist", UNKNOWN_JOB))?;

        if job.employer == seeker.id {
            return Err(rejected(NON_FIELD_ERRORS, "own_job", OWN_JOB));
        }

        let application = match self.store.insert_application(job.id, seeker.id).await {
            Ok(application) => application,
            Err(StoreError::Duplicate(_)) => {
                return Err(rejected(NON_FIELD_ERRORS, "already_applied", ALREADY_APPLIED));
            }
            Err(StoreError::Missing(_)) => return Err(rejected("job_id", "does_not_exist", UNKNOWN_JOB)),
            Err(e) => return Err(e.into()),
        };

        notify(ApplicationEvent::Submitted, &application, &job);
        Ok(ApplicationView::new(application, job))
    }

    /// Fetch one application, restricted to the parties involved and admins
    pub async fn retrieve(&self, principal: &Principal, id: Uuid) -> Result<ApplicationView, ApiError> {
        authorize(principal, &[&IsAuthenticated])?;

        let (application, job) = self.get(id).await?;
        match principal.role() {
            Some(Role::JobSeeker) if principal.id() != Some(application.job_seeker) => {
                return Err(ApiError::Forbidden(ONLY_OWN_APPLICATIONS.to_string()));
            }
            Some(Role::Employer) if principal.id() != Some(job.employer) => {
                return Err(ApiError::Forbidden(ONLY_YOUR_JOBS.to_string()));
            }
            _ => {}
        }

        Ok(ApplicationView::new(application, job))
    }

    /// Change the review status. Employers may only touch applications to their postings.
    pub async fn set_status(
        &self,
        principal: &Principal,
        id: Uuid,
        body: DeferredJson<ApplicationStatusInput>,
    ) -> Result<ApplicationView, ApiError> {
        authorize(principal, &[&IsAuthenticated])?;
        authorize_any(principal, &[&IsEmployer, &IsAdminUser])?;

        let (application, job) = self.get(id).await?;
        if principal.role() == Some(Role::Employer) && principal.id() != Some(job.employer) {
            return Err(ApiError::Forbidden(ONLY_YOUR_JOBS.to_string()));
        }

        let input = body.decode()?;
        input.validate()?;

        let previous = application.status;
        let updated = self.store.set_application_status(application.id, input.status).await?;

        if let Some(event) = ApplicationEvent::on_transition(previous, updated.status) {
            notify(event, &updated, &job);
        }
        info!(
            "Service: Application {} status {} -> {}",
            updated.id, previous, updated.status
        );
        Ok(ApplicationView::new(updated, job))
    }

    /// Applications to one posting.
    ///
    /// Admins see all of them; an employer who does not own the posting gets
    /// an empty list.
    pub async fn list_for_job(
        &self,
        principal: &Principal,
        job_id: Uuid,
    ) -> Result<Vec<ApplicationView>, ApiError> {
        authorize(principal, &[&IsAuthenticated])?;
        authorize_any(principal, &[&IsEmployer, &IsAdminUser])?;

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or(ApiError::NotFound("Job posting"))?;

        if principal.role() == Some(Role::Employer) && principal.id() != Some(job.employer) {
            return Ok(Vec::new());
        }

        let applications = self.store.list_applications(ApplicationScope::ByJob(job.id)).await?;
        Ok(applications
            .into_iter()
            .map(|application| ApplicationView::new(application, job.clone()))
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<(JobApplication, JobPosting), ApiError> {
        let application = self
            .store
            .find_application(id)
            .await?
            .ok_or(ApiError::NotFound("Application"))?;

        let job = self.store.find_job(application.job_id).await?.ok_or_else(|| {
            warn!("Application {} references missing job {}", application.id, application.job_id);
            ApiError::NotFound("Job posting")
        })?;

        Ok((application, job))
    }

    async fn views(&self, applications: Vec<JobApplication>) -> Result<Vec<ApplicationView>, ApiError> {
        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            match self.store.find_job(application.job_id).await? {
                Some(job) => views.push(ApplicationView::new(application, job)),
                None => warn!("Skipping application {} with missing job {}", application.id, application.job_id),
            }
        }
        Ok(views)
    }
}
