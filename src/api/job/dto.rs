use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::models::{Category, JobPosting, JobType, Location, LocationKey};

/// Client-facing write shape of a job posting.
///
/// Every field is optional at the deserialization level; which ones are
/// required depends on the write mode and is decided by the serializer.
/// Any `employer` value in the payload is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct JobPostingInput {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, message = "Description may not be blank"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, max = 99_999_999.99, message = "Salary must be between 0 and 99999999.99"))]
    pub salary: Option<f64>,

    pub category: Option<Category>,

    pub job_type: Option<JobType>,

    pub is_active: Option<bool>,

    #[validate(length(min = 1, max = 100, message = "Country must be between 1 and 100 characters"))]
    pub location_country: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City must be between 1 and 100 characters"))]
    pub location_city: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Address must be between 1 and 255 characters"))]
    pub location_address: Option<String>,
}

impl JobPostingInput {
    /// Number of flat location fields present in the payload
    pub fn location_fields_present(&self) -> usize {
        [
            self.location_country.is_some(),
            self.location_city.is_some(),
            self.location_address.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Remove the flat location fields, returning the key when all three were set
    pub fn take_location(&mut self) -> Option<LocationKey> {
        let country = self.location_country.take();
        let city = self.location_city.take();
        let address = self.location_address.take();

        match (country, city, address) {
            (Some(country), Some(city), Some(address)) => Some(LocationKey {
                country,
                city,
                address,
            }),
            _ => None,
        }
    }
}

/// Read shape of a job posting, with the location nested
#[derive(Debug, Serialize)]
pub struct JobPostingView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: f64,
    pub category: Category,
    pub location: Location,
    pub job_type: JobType,
    pub employer: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl From<JobPosting> for JobPostingView {
    fn from(job: JobPosting) -> Self {
        Self {
            id: job.id,
            title: job.title,
            description: job.description,
            salary: job.salary,
            category: job.category,
            location: job.location,
            job_type: job.job_type,
            employer: job.employer,
            created_at: job.created_at,
            updated_at: job.updated_at,
            is_active: job.is_active,
        }
    }
}
