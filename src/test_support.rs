//! Fixtures shared by unit and handler tests.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    web, App,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::application::ApplicationService;
use crate::api::job::models::{Category, JobPosting, JobType, Location, LocationKey, NewJobPosting};
use crate::api::job::JobService;
use crate::api::{configure, validation};
use crate::auth::token::Claims;
use crate::auth::{Role, TokenVerifier};
use crate::db::memory::MemoryStore;
use crate::db::store::Store;

const TEST_SECRET: &str = "test-signing-secret";

pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(TEST_SECRET, None)
}

pub fn mint_token(id: Uuid, role: Role) -> String {
    let claims = Claims {
        sub: id,
        role,
        exp: Utc::now().timestamp() + 3600,
        email: None,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}

/// A posting that never touched a store
pub fn sample_posting(owner: Uuid) -> JobPosting {
    let now = Utc::now();
    JobPosting {
        id: Uuid::new_v4(),
        title: "Backend Engineer".to_string(),
        description: "Ship Rust services for the jobs platform".to_string(),
        salary: 120_000.0,
        category: Category::Tech,
        job_type: JobType::FullTime,
        location: Location {
            id: Uuid::new_v4(),
            country: "NG".to_string(),
            city: "Lagos".to_string(),
            address: "12 Allen Ave".to_string(),
            created_at: now,
        },
        employer: owner,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Caller identity for handler tests
#[derive(Debug, Clone, Copy)]
pub struct TestUser(pub Uuid, pub Role);

pub fn bearer(user: &TestUser) -> (header::HeaderName, String) {
    (
        header::AUTHORIZATION,
        format!("Bearer {}", mint_token(user.0, user.1)),
    )
}

/// The HTTP surface wired to an in-memory store
pub struct TestApp {
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::default()),
        }
    }

    pub fn employer(&self) -> TestUser {
        TestUser(Uuid::new_v4(), Role::Employer)
    }

    pub fn job_seeker(&self) -> TestUser {
        TestUser(Uuid::new_v4(), Role::JobSeeker)
    }

    pub fn admin(&self) -> TestUser {
        TestUser(Uuid::new_v4(), Role::Admin)
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let store: Arc<dyn Store> = self.store.clone();

        App::new()
            .app_data(web::Data::from(store.clone()))
            .app_data(web::Data::new(verifier()))
            .app_data(web::Data::new(JobService::new(store.clone())))
            .app_data(web::Data::new(ApplicationService::new(store)))
            .app_data(validation::query_config())
            .configure(configure)
    }

    /// Store a posting at NG / Lagos / 12 Allen Ave, bypassing the HTTP layer
    pub async fn create_job(&self, employer: &TestUser, title: &str, is_active: bool) -> JobPosting {
        let location = self
            .store
            .get_or_create_location(&LocationKey {
                country: "NG".to_string(),
                city: "Lagos".to_string(),
                address: "12 Allen Ave".to_string(),
            })
            .await
            .unwrap();

        self.store
            .insert_job(NewJobPosting {
                title: title.to_string(),
                description: "Build and run the jobs API".to_string(),
                salary: 95_000.0,
                category: Category::Tech,
                job_type: JobType::FullTime,
                location_id: location.id,
                employer: employer.0,
                is_active,
            })
            .await
            .unwrap()
    }
}
