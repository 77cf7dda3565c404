use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use crate::api::application::models::{ApplicationStatus, JobApplication};
use crate::api::job::filters::JobPostingFilter;
use crate::api::job::models::{JobPosting, Location, LocationKey, NewJobPosting};

use super::models::{JobApplicationRow, JobPostingRow, LocationRow};
use super::store::{ApplicationScope, JobScope, Store, StoreError};

const JOB_SELECT: &str = r#"
    SELECT j.id, j.title, j.description, j.salary::FLOAT8 AS salary, j.category, j.job_type,
           j.employer_id, j.is_active, j.created_at, j.updated_at,
           l.id AS location_id, l.country AS location_country, l.city AS location_city,
           l.address AS location_address, l.created_at AS location_created_at
    FROM job_postings j
    JOIN locations l ON l.id = j.location_id
"#;

const APPLICATION_COLUMNS: &str = "a.id, a.job_id, a.job_seeker_id, a.status, a.applied_at";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// PostgreSQL-backed store
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_job(&self, id: Uuid) -> Result<Option<JobPosting>, StoreError> {
        let row = sqlx::query_as::<_, JobPostingRow>(&format!("{} WHERE j.id = $1", JOB_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(JobPosting::try_from).transpose()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn get_or_create_location(&self, key: &LocationKey) -> Result<Location, StoreError> {
        let inserted = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO locations (id, country, city, address)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (country, city, address) DO NOTHING
            RETURNING id, country, city, address, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&key.country)
        .bind(&key.city)
        .bind(&key.address)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            debug!("Created location id={}", row.id);
            return Ok(row.into());
        }

        // Lost the insert: the row exists (possibly committed by a concurrent
        // request), so a fresh statement sees it.
        let existing = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, country, city, address, created_at
            FROM locations
            WHERE country = $1 AND city = $2 AND address = $3
            "#,
        )
        .bind(&key.country)
        .bind(&key.city)
        .bind(&key.address)
        .fetch_optional(&self.pool)
        .await?;

        existing
            .map(Location::from)
            .ok_or(StoreError::Missing("location"))
    }

    async fn insert_job(&self, job: NewJobPosting) -> Result<JobPosting, StoreError> {
        debug!(
            "Creating job posting: title={}, employer={}",
            job.title, job.employer
        );

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO job_postings
                (id, title, description, salary, category, job_type, location_id, employer_id, is_active)
            VALUES ($1, $2, $3, $4::NUMERIC, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.salary)
        .bind(job.category.as_str())
        .bind(job.job_type.as_str())
        .bind(job.location_id)
        .bind(job.employer)
        .bind(job.is_active)
        .fetch_one(&self.pool)
        .await?;

        debug!("Job posting created with id={}", id);
        self.fetch_job(id)
            .await?
            .ok_or(StoreError::Missing("job posting"))
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobPosting>, StoreError> {
        self.fetch_job(id).await
    }

    async fn list_jobs(
        &self,
        scope: JobScope,
        filter: &JobPostingFilter,
    ) -> Result<Vec<JobPosting>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(JOB_SELECT);

        match scope {
            JobScope::OwnedBy(employer) => {
                query.push(" WHERE j.employer_id = ").push_bind(employer);
            }
            JobScope::Active => {
                query.push(" WHERE j.is_active = TRUE");
            }
        }

        if let Some(title) = &filter.title {
            query
                .push(" AND POSITION(LOWER(")
                .push_bind(title.clone())
                .push(") IN LOWER(j.title)) > 0");
        }
        if let Some(description) = &filter.description {
            query
                .push(" AND POSITION(LOWER(")
                .push_bind(description.clone())
                .push(") IN LOWER(j.description)) > 0");
        }
        if let Some(category) = filter.category {
            query.push(" AND j.category = ").push_bind(category.as_str());
        }
        if let Some(country) = &filter.country {
            query.push(" AND l.country = ").push_bind(country.clone());
        }
        if let Some(city) = &filter.city {
            query.push(" AND l.city = ").push_bind(city.clone());
        }
        if let Some(salary) = filter.salary {
            query
                .push(" AND j.salary >= ")
                .push_bind(salary)
                .push("::NUMERIC");
        }

        query.push(" ORDER BY j.created_at DESC");

        let rows = query
            .build_query_as::<JobPostingRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(JobPosting::try_from).collect()
    }

    async fn save_job(&self, job: &JobPosting) -> Result<JobPosting, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE job_postings
            SET title = $2, description = $3, salary = $4::NUMERIC, category = $5,
                job_type = $6, location_id = $7, is_active = $8, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(job.id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(job.salary)
        .bind(job.category.as_str())
        .bind(job.job_type.as_str())
        .bind(job.location.id)
        .bind(job.is_active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing("job posting"));
        }

        self.fetch_job(job.id)
            .await?
            .ok_or(StoreError::Missing("job posting"))
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_application(
        &self,
        job_id: Uuid,
        job_seeker: Uuid,
    ) -> Result<JobApplication, StoreError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            INSERT INTO job_applications (id, job_id, job_seeker_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, job_id, job_seeker_id, status, applied_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_id)
        .bind(job_seeker)
        .bind(ApplicationStatus::default().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate("application")
            } else if is_foreign_key_violation(&e) {
                StoreError::Missing("job posting")
            } else {
                StoreError::Database(e)
            }
        })?;

        row.try_into()
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(&format!(
            "SELECT {} FROM job_applications a WHERE a.id = $1",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(JobApplication::try_from).transpose()
    }

    async fn list_applications(
        &self,
        scope: ApplicationScope,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {} FROM job_applications a",
            APPLICATION_COLUMNS
        ));

        match scope {
            ApplicationScope::All => {}
            ApplicationScope::BySeeker(seeker) => {
                query.push(" WHERE a.job_seeker_id = ").push_bind(seeker);
            }
            ApplicationScope::ByEmployer(employer) => {
                query
                    .push(" JOIN job_postings j ON j.id = a.job_id WHERE j.employer_id = ")
                    .push_bind(employer);
            }
            ApplicationScope::ByJob(job_id) => {
                query.push(" WHERE a.job_id = ").push_bind(job_id);
            }
        }

        query.push(" ORDER BY a.applied_at DESC");

        let rows = query
            .build_query_as::<JobApplicationRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(JobApplication::try_from).collect()
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<JobApplication, StoreError> {
        let row = sqlx::query_as::<_, JobApplicationRow>(
            r#"
            UPDATE job_applications SET status = $2
            WHERE id = $1
            RETURNING id, job_id, job_seeker_id, status, applied_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::Missing("application"))?.try_into()
    }
}
