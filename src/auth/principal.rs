use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use uuid::Uuid;

use super::token::TokenVerifier;

/// Closed set of roles a principal can hold
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employer,
    JobSeeker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employer => "employer",
            Role::JobSeeker => "job_seeker",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller, as asserted by a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
    pub email: Option<String>,
}

/// The entity making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl Principal {
    #[cfg(test)]
    pub fn authenticated(id: Uuid, role: Role) -> Self {
        Principal::Authenticated(AuthenticatedUser {
            id,
            role,
            email: None,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated(_))
    }

    pub fn id(&self) -> Option<Uuid> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user.id),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user.role),
        }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user),
        }
    }

    /// Resolve the principal from the `Authorization: Bearer <jwt>` header.
    ///
    /// Missing, malformed or expired tokens all resolve to `Anonymous`; the
    /// permission gates turn that into a 401.
    fn resolve(req: &HttpRequest) -> Self {
        let Some(value) = req.headers().get(header::AUTHORIZATION) else {
            return Principal::Anonymous;
        };

        let Some(token) = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            debug!("Ignoring malformed Authorization header");
            return Principal::Anonymous;
        };

        let Some(verifier) = req.app_data::<web::Data<TokenVerifier>>() else {
            warn!("No token verifier registered; treating request as anonymous");
            return Principal::Anonymous;
        };

        match verifier.verify(token) {
            Ok(claims) => Principal::Authenticated(AuthenticatedUser {
                id: claims.sub,
                role: claims.role,
                email: claims.email,
            }),
            Err(e) => {
                debug!("Rejected bearer token: {}", e);
                Principal::Anonymous
            }
        }
    }
}

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Principal::resolve(req)))
    }
}
