//! Translation between the flat write shape of a job posting and the stored
//! posting with its normalized location.
//!
//! Clients send `location_country`, `location_city` and `location_address`;
//! these are resolved to a shared `Location` row by get-or-create on the exact
//! triple. The acting principal always becomes the employer on creation.

use tracing::debug;
use validator::{Validate, ValidationErrors};

use crate::api::error::ApiError;
use crate::api::validation::{error_with_message, NON_FIELD_ERRORS};
use crate::auth::principal::AuthenticatedUser;
use crate::db::store::Store;

use super::dto::JobPostingInput;
use super::models::{JobPosting, NewJobPosting};

const LOCATION_REQUIRED_ON_CREATE: &str =
    "All location fields (country, city, address) are required for creating a job posting.";
const LOCATION_TOGETHER_ON_UPDATE: &str = "All location fields must be provided together for an update.";
const FIELD_REQUIRED: &str = "This field is required.";

/// Validate a payload for creation (`instance` is `None`) or update.
///
/// With `partial` set only the fields present are checked; otherwise the
/// posting's own required fields must all be there. Location fields are
/// all-or-nothing: mandatory on creation, optional but grouped on update.
pub fn validate(
    input: &JobPostingInput,
    instance: Option<&JobPosting>,
    partial: bool,
) -> Result<(), ValidationErrors> {
    let mut errors = match input.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if !partial {
        let missing = [
            ("title", input.title.is_none()),
            ("description", input.description.is_none()),
            ("salary", input.salary.is_none()),
            ("category", input.category.is_none()),
            ("job_type", input.job_type.is_none()),
        ];
        for (field, is_missing) in missing {
            if is_missing {
                errors.add(field, error_with_message("required", FIELD_REQUIRED));
            }
        }
    }

    let present = input.location_fields_present();
    match instance {
        None if present != 3 => {
            errors.add(
                NON_FIELD_ERRORS,
                error_with_message("location_required", LOCATION_REQUIRED_ON_CREATE),
            );
        }
        Some(_) if present == 1 || present == 2 => {
            errors.add(
                NON_FIELD_ERRORS,
                error_with_message("location_together", LOCATION_TOGETHER_ON_UPDATE),
            );
        }
        _ => {}
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ApiError> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(field, error_with_message("required", FIELD_REQUIRED));
        ApiError::Validation(errors)
    })
}

/// Create a posting from a validated payload, owned by `employer`
pub async fn create(
    store: &dyn Store,
    employer: &AuthenticatedUser,
    mut input: JobPostingInput,
) -> Result<JobPosting, ApiError> {
    let key = match input.take_location() {
        Some(key) => key,
        None => {
            let mut errors = ValidationErrors::new();
            errors.add(
                NON_FIELD_ERRORS,
                error_with_message("location_required", LOCATION_REQUIRED_ON_CREATE),
            );
            return Err(ApiError::Validation(errors));
        }
    };

    let location = store.get_or_create_location(&key).await?;
    debug!("Resolved location {} for new posting", location.id);

    let new_job = NewJobPosting {
        title: required(input.title, "title")?,
        description: required(input.description, "description")?,
        salary: required(input.salary, "salary")?,
        category: required(input.category, "category")?,
        job_type: required(input.job_type, "job_type")?,
        location_id: location.id,
        employer: employer.id,
        is_active: input.is_active.unwrap_or(true),
    };

    Ok(store.insert_job(new_job).await?)
}

/// Apply a validated payload to an existing posting and persist it.
///
/// The location is only reassigned when all three location fields are given.
pub async fn update(
    store: &dyn Store,
    mut instance: JobPosting,
    mut input: JobPostingInput,
) -> Result<JobPosting, ApiError> {
    if let Some(key) = input.take_location() {
        if key != instance.location.key() {
            let location = store.get_or_create_location(&key).await?;
            debug!(
                "Posting {} moves from location {} to {}",
                instance.id, instance.location.id, location.id
            );
            instance.location = location;
        }
    }

    if let Some(title) = input.title {
        instance.title = title;
    }
    if let Some(description) = input.description {
        instance.description = description;
    }
    if let Some(salary) = input.salary {
        instance.salary = salary;
    }
    if let Some(category) = input.category {
        instance.category = category;
    }
    if let Some(job_type) = input.job_type {
        instance.job_type = job_type;
    }
    if let Some(is_active) = input.is_active {
        instance.is_active = is_active;
    }

    Ok(store.save_job(&instance).await?)
}
