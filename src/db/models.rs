use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::application::models::JobApplication;
use crate::api::job::models::{JobPosting, Location, UnknownVariant};

use super::store::StoreError;

fn decode_error(e: UnknownVariant) -> StoreError {
    StoreError::Database(sqlx::Error::Decode(Box::new(e)))
}

/// Database representation of a location
#[derive(Debug, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub country: String,
    pub city: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id,
            country: row.country,
            city: row.city,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

/// A job posting joined with its location
#[derive(Debug, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: f64,
    pub category: String,
    pub job_type: String,
    pub employer_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub location_id: Uuid,
    pub location_country: String,
    pub location_city: String,
    pub location_address: String,
    pub location_created_at: DateTime<Utc>,
}

impl TryFrom<JobPostingRow> for JobPosting {
    type Error = StoreError;

    fn try_from(row: JobPostingRow) -> Result<Self, Self::Error> {
        Ok(JobPosting {
            id: row.id,
            title: row.title,
            description: row.description,
            salary: row.salary,
            category: row.category.parse().map_err(decode_error)?,
            job_type: row.job_type.parse().map_err(decode_error)?,
            location: Location {
                id: row.location_id,
                country: row.location_country,
                city: row.location_city,
                address: row.location_address,
                created_at: row.location_created_at,
            },
            employer: row.employer_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Database representation of an application
#[derive(Debug, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_seeker_id: Uuid,
    pub status: String,
    pub applied_at: DateTime<Utc>,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = StoreError;

    fn try_from(row: JobApplicationRow) -> Result<Self, Self::Error> {
        Ok(JobApplication {
            id: row.id,
            job_id: row.job_id,
            job_seeker: row.job_seeker_id,
            status: row.status.parse().map_err(decode_error)?,
            applied_at: row.applied_at,
        })
    }
}
