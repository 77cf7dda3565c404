use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::job::dto::JobPostingView;

use super::models::{ApplicationStatus, JobApplication};
use crate::api::job::models::JobPosting;

#[derive(Debug, Deserialize, Validate)]
pub struct NewApplicationInput {
    pub job_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplicationStatusInput {
    pub status: ApplicationStatus,
}

/// Read shape of an application, with the posting nested
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    pub id: Uuid,
    pub job: JobPostingView,
    pub job_seeker: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

impl ApplicationView {
    pub fn new(application: JobApplication, job: JobPosting) -> Self {
        Self {
            id: application.id,
            job: job.into(),
            job_seeker: application.job_seeker,
            status: application.status,
            applied_at: application.applied_at,
        }
    }
}
