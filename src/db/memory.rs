use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::application::models::{ApplicationStatus, JobApplication};
use crate::api::job::filters::JobPostingFilter;
use crate::api::job::models::{JobPosting, Location, LocationKey, NewJobPosting};

use super::store::{ApplicationScope, JobScope, Store, StoreError};

#[derive(Default)]
struct Tables {
    locations: Vec<Location>,
    jobs: Vec<JobPosting>,
    applications: Vec<JobApplication>,
}

/// In-process store with the same contract as `PgStore`, used by tests
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub async fn location_count(&self) -> usize {
        self.tables.lock().await.locations.len()
    }

    pub async fn job_count(&self) -> usize {
        self.tables.lock().await.jobs.len()
    }

    pub async fn application_count(&self) -> usize {
        self.tables.lock().await.applications.len()
    }
}

/// Newest first; insertion order breaks timestamp ties
fn newest_first<T: Clone>(rows: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T> {
    let mut rows: Vec<T> = rows.iter().rev().cloned().collect();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get_or_create_location(&self, key: &LocationKey) -> Result<Location, StoreError> {
        let mut tables = self.tables.lock().await;

        if let Some(existing) = tables.locations.iter().find(|l| l.key() == *key) {
            return Ok(existing.clone());
        }

        let location = Location {
            id: Uuid::new_v4(),
            country: key.country.clone(),
            city: key.city.clone(),
            address: key.address.clone(),
            created_at: Utc::now(),
        };
        tables.locations.push(location.clone());
        Ok(location)
    }

    async fn insert_job(&self, job: NewJobPosting) -> Result<JobPosting, StoreError> {
        let mut tables = self.tables.lock().await;

        let location = tables
            .locations
            .iter()
            .find(|l| l.id == job.location_id)
            .cloned()
            .ok_or(StoreError::Missing("location"))?;

        let now = Utc::now();
        let posting = JobPosting {
            id: Uuid::new_v4(),
            title: job.title,
            description: job.description,
            salary: job.salary,
            category: job.category,
            job_type: job.job_type,
            location,
            employer: job.employer,
            is_active: job.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.push(posting.clone());
        Ok(posting)
    }

    async fn find_job(&self, id: Uuid) -> Result<Option<JobPosting>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn list_jobs(
        &self,
        scope: JobScope,
        filter: &JobPostingFilter,
    ) -> Result<Vec<JobPosting>, StoreError> {
        let tables = self.tables.lock().await;
        let visible: Vec<JobPosting> = tables
            .jobs
            .iter()
            .filter(|job| match scope {
                JobScope::OwnedBy(employer) => job.employer == employer,
                JobScope::Active => job.is_active,
            })
            .filter(|job| filter.matches(job))
            .cloned()
            .collect();
        Ok(newest_first(&visible, |j| j.created_at))
    }

    async fn save_job(&self, job: &JobPosting) -> Result<JobPosting, StoreError> {
        let mut tables = self.tables.lock().await;

        let location = tables
            .locations
            .iter()
            .find(|l| l.id == job.location.id)
            .cloned()
            .ok_or(StoreError::Missing("location"))?;

        let stored = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or(StoreError::Missing("job posting"))?;

        stored.title = job.title.clone();
        stored.description = job.description.clone();
        stored.salary = job.salary;
        stored.category = job.category;
        stored.job_type = job.job_type;
        stored.location = location;
        stored.is_active = job.is_active;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.jobs.len();
        tables.jobs.retain(|j| j.id != id);
        let deleted = tables.jobs.len() != before;
        if deleted {
            tables.applications.retain(|a| a.job_id != id);
        }
        Ok(deleted)
    }

    async fn insert_application(
        &self,
        job_id: Uuid,
        job_seeker: Uuid,
    ) -> Result<JobApplication, StoreError> {
        let mut tables = self.tables.lock().await;

        if !tables.jobs.iter().any(|j| j.id == job_id) {
            return Err(StoreError::Missing("job posting"));
        }
        if tables
            .applications
            .iter()
            .any(|a| a.job_id == job_id && a.job_seeker == job_seeker)
        {
            return Err(StoreError::Duplicate("application"));
        }

        let application = JobApplication {
            id: Uuid::new_v4(),
            job_id,
            job_seeker,
            status: ApplicationStatus::default(),
            applied_at: Utc::now(),
        };
        tables.applications.push(application.clone());
        Ok(application)
    }

    async fn find_application(&self, id: Uuid) -> Result<Option<JobApplication>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn list_applications(
        &self,
        scope: ApplicationScope,
    ) -> Result<Vec<JobApplication>, StoreError> {
        let tables = self.tables.lock().await;
        let owns = |job_id: Uuid, employer: Uuid| {
            tables
                .jobs
                .iter()
                .any(|j| j.id == job_id && j.employer == employer)
        };

        let visible: Vec<JobApplication> = tables
            .applications
            .iter()
            .filter(|a| match scope {
                ApplicationScope::All => true,
                ApplicationScope::BySeeker(seeker) => a.job_seeker == seeker,
                ApplicationScope::ByEmployer(employer) => owns(a.job_id, employer),
                ApplicationScope::ByJob(job_id) => a.job_id == job_id,
            })
            .cloned()
            .collect();
        Ok(newest_first(&visible, |a| a.applied_at))
    }

    async fn set_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<JobApplication, StoreError> {
        let mut tables = self.tables.lock().await;
        let application = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::Missing("application"))?;
        application.status = status;
        Ok(application.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::job::models::{Category, JobType};
    use futures_util::future::join_all;

    fn key(city: &str) -> LocationKey {
        LocationKey {
            country: "NG".to_string(),
            city: city.to_string(),
            address: "12 Allen Ave".to_string(),
        }
    }

    async fn posting(store: &MemoryStore, employer: Uuid) -> JobPosting {
        let location = store.get_or_create_location(&key("Lagos")).await.unwrap();
        store
            .insert_job(NewJobPosting {
                title: "Backend Engineer".to_string(),
                description: "Build APIs".to_string(),
                salary: 100.0,
                category: Category::Tech,
                job_type: JobType::Contract,
                location_id: location.id,
                employer,
                is_active: true,
            })
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn get_or_create_is_idempotent() {
        let store = MemoryStore::default();
        let a = store.get_or_create_location(&key("Lagos")).await.unwrap();
        let b = store.get_or_create_location(&key("Lagos")).await.unwrap();
        let c = store.get_or_create_location(&key("Abuja")).await.unwrap();

        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(store.location_count().await, 2);
    }

    #[actix_web::test]
    async fn duplicate_application_is_rejected() {
        let store = MemoryStore::default();
        let job = posting(&store, Uuid::new_v4()).await;
        let seeker = Uuid::new_v4();

        store.insert_application(job.id, seeker).await.unwrap();
        assert!(matches!(
            store.insert_application(job.id, seeker).await,
            Err(StoreError::Duplicate(_))
        ));
    }

    #[actix_web::test]
    async fn deleting_a_job_cascades_to_applications_but_not_location() {
        let store = MemoryStore::default();
        let job = posting(&store, Uuid::new_v4()).await;
        store.insert_application(job.id, Uuid::new_v4()).await.unwrap();

        assert!(store.delete_job(job.id).await.unwrap());
        assert!(!store.delete_job(job.id).await.unwrap());
        assert_eq!(store.application_count().await, 0);
        assert_eq!(store.location_count().await, 1);
    }

    #[actix_web::test]
    async fn listing_is_newest_first() {
        let store = MemoryStore::default();
        let employer = Uuid::new_v4();
        let first = posting(&store, employer).await;
        let second = posting(&store, employer).await;

        let listed = store
            .list_jobs(JobScope::OwnedBy(employer), &JobPostingFilter::default())
            .await
            .unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[actix_web::test]
    async fn concurrent_get_or_create_converges_on_one_row() {
        let store = MemoryStore::default();
        let fresh = key("Ibadan");

        let results = join_all((0..16).map(|_| store.get_or_create_location(&fresh))).await;
        let ids: Vec<Uuid> = results.into_iter().map(|r| r.unwrap().id).collect();

        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.location_count().await, 1);
    }
}
