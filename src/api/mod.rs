use actix_web::web::ServiceConfig;

pub mod application;
pub mod error;
pub mod health;
pub mod job;
pub mod validation;

/// Register every HTTP route of the service
pub fn configure(config: &mut ServiceConfig) {
    config
        .configure(health::health_config)
        .configure(job::handlers::job_config)
        .configure(application::handlers::application_config);
}
