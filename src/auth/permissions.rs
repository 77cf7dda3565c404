use crate::api::error::ApiError;
use crate::api::job::models::JobPosting;

use super::principal::{Principal, Role};

/// A composable access gate.
///
/// `has_permission` runs per request before any object is loaded;
/// `has_object_permission` runs once the target object is known. Both
/// default to allowing, so a gate only overrides the level it cares about.
/// Gates never fail: a missing identity or a role mismatch is just `false`.
pub trait Permission<T: ?Sized = ()> {
    fn has_permission(&self, _principal: &Principal) -> bool {
        true
    }

    fn has_object_permission(&self, _principal: &Principal, _object: &T) -> bool {
        true
    }
}

pub struct IsAuthenticated;

pub struct IsAdminUser;

/// Allow only employers to post and manage jobs
pub struct IsEmployer;

/// Allow only job seekers to apply for jobs
pub struct IsJobSeeker;

/// Allow only the employer who posted the job to edit or delete it
pub struct IsJobOwner;

fn has_role(principal: &Principal, role: Role) -> bool {
    principal.role() == Some(role)
}

impl<T: ?Sized> Permission<T> for IsAuthenticated {
    fn has_permission(&self, principal: &Principal) -> bool {
        principal.is_authenticated()
    }
}

impl<T: ?Sized> Permission<T> for IsAdminUser {
    fn has_permission(&self, principal: &Principal) -> bool {
        has_role(principal, Role::Admin)
    }
}

impl<T: ?Sized> Permission<T> for IsEmployer {
    fn has_permission(&self, principal: &Principal) -> bool {
        has_role(principal, Role::Employer)
    }
}

impl<T: ?Sized> Permission<T> for IsJobSeeker {
    fn has_permission(&self, principal: &Principal) -> bool {
        has_role(principal, Role::JobSeeker)
    }
}

impl Permission<JobPosting> for IsJobOwner {
    fn has_object_permission(&self, principal: &Principal, job: &JobPosting) -> bool {
        principal.id() == Some(job.employer)
    }
}

/// Evaluate request-level gates in order (AND).
///
/// Anonymous callers get `Unauthorized` as soon as any gate denies; an
/// authenticated caller that fails a gate gets `Forbidden`.
pub fn authorize(principal: &Principal, gates: &[&dyn Permission]) -> Result<(), ApiError> {
    if gates.iter().all(|gate| gate.has_permission(principal)) {
        return Ok(());
    }
    Err(denied(principal))
}

/// Request-level OR over gates, for endpoints open to more than one role
pub fn authorize_any(principal: &Principal, gates: &[&dyn Permission]) -> Result<(), ApiError> {
    if gates.iter().any(|gate| gate.has_permission(principal)) {
        return Ok(());
    }
    Err(denied(principal))
}

/// Object-level gates (AND) against an already loaded object
pub fn authorize_object<T: ?Sized>(
    principal: &Principal,
    object: &T,
    gates: &[&dyn Permission<T>],
) -> Result<(), ApiError> {
    if gates
        .iter()
        .all(|gate| gate.has_object_permission(principal, object))
    {
        return Ok(());
    }
    Err(denied(principal))
}

fn denied(principal: &Principal) -> ApiError {
    if principal.is_authenticated() {
        ApiError::forbidden()
    } else {
        ApiError::Unauthorized
    }
}
