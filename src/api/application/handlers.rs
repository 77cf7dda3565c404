use actix_web::{
    get, patch, post, put,
    web::{scope, Data, Path, ServiceConfig},
    HttpResponse,
};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::validation::DeferredJson;
use crate::auth::Principal;

use super::dto::{ApplicationStatusInput, NewApplicationInput};
use super::service::ApplicationService;

#[get("")]
async fn list_applications(
    service: Data<ApplicationService>,
    principal: Principal,
) -> Result<HttpResponse, ApiError> {
    let applications = service.list(&principal).await?;
    Ok(HttpResponse::Ok().json(applications))
}

#[post("")]
async fn create_application(
    service: Data<ApplicationService>,
    principal: Principal,
    body: DeferredJson<NewApplicationInput>,
) -> Result<HttpResponse, ApiError> {
    let application = service.apply(&principal, body).await?;
    Ok(HttpResponse::Created().json(application))
}

#[get("/{id}")]
async fn retrieve_application(
    service: Data<ApplicationService>,
    principal: Principal,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let application = service.retrieve(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(application))
}

#[put("/{id}")]
async fn replace_application_status(
    service: Data<ApplicationService>,
    principal: Principal,
    path: Path<Uuid>,
    body: DeferredJson<ApplicationStatusInput>,
) -> Result<HttpResponse, ApiError> {
    let application = service
        .set_status(&principal, path.into_inner(), body)
        .await?;
    Ok(HttpResponse::Ok().json(application))
}

#[patch("/{id}")]
async fn patch_application_status(
    service: Data<ApplicationService>,
    principal: Principal,
    path: Path<Uuid>,
    body: DeferredJson<ApplicationStatusInput>,
) -> Result<HttpResponse, ApiError> {
    let application = service
        .set_status(&principal, path.into_inner(), body)
        .await?;
    Ok(HttpResponse::Ok().json(application))
}

/// Registered under the `/api/jobs` scope
#[get("/{id}/applications")]
pub async fn list_job_applications(
    service: Data<ApplicationService>,
    principal: Principal,
    path: Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let applications = service.list_for_job(&principal, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(applications))
}

pub fn application_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/applications")
            .service(list_applications)
            .service(create_application)
            .service(retrieve_application)
            .service(replace_application_status)
            .service(patch_application_status),
    );
}
