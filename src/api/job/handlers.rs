use actix_web::{
    delete, get, patch, post, put,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use actix_web_validator::Query;
use uuid::Uuid;

use crate::api::application::handlers::list_job_applications;
use crate::api::error::ApiError;
use crate::api::validation::DeferredJson;
use crate::auth::Principal;

use super::dto::JobPostingInput;
use super::filters::JobPostingFilter;
use super::service::JobService;

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    principal: Principal,
    filter: Query<JobPostingFilter>,
) -> Result<HttpResponse, ApiError> {
    let jobs = service.list(&principal, &filter).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[post("")]
async fn create_job(
    service: Data<JobService>,
    principal: Principal,
    body: DeferredJson<JobPostingInput>,
) -> Result<HttpResponse, ApiError> {
    let job = service.create(&principal, body).await?;
    Ok(HttpResponse::Created().json(job))
}

#[get("/{id}")]
async fn retrieve_job(
    service: Data<JobService>,
    principal: Principal,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job = service.retrieve(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[put("/{id}")]
async fn replace_job(
    service: Data<JobService>,
    principal: Principal,
    path: Path<Uuid>,
    body: DeferredJson<JobPostingInput>,
) -> Result<HttpResponse, ApiError> {
    let job = service
        .update(&principal, path.into_inner(), body, false)
        .await?;
    Ok(HttpResponse::Ok().json(job))
}

#[patch("/{id}")]
async fn patch_job(
    service: Data<JobService>,
    principal: Principal,
    path: Path<Uuid>,
    body: DeferredJson<JobPostingInput>,
) -> Result<HttpResponse, ApiError> {
    let job = service
        .update(&principal, path.into_inner(), body, true)
        .await?;
    Ok(HttpResponse::Ok().json(job))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    principal: Principal,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    service.delete(&principal, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/jobs")
            .service(list_jobs)
            .service(create_job)
            .service(list_job_applications)
            .service(retrieve_job)
            .service(replace_job)
            .service(patch_job)
            .service(delete_job),
    );
}
