use actix_web::{dev::Payload, web::Bytes, FromRequest, HttpRequest, HttpResponse};
use futures_util::future::LocalBoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use std::borrow::Cow;
use std::marker::PhantomData;
use validator::{ValidationError, ValidationErrors};

use super::error::ApiError;

/// Key for errors that span several fields
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
}

/// Build a `ValidationError` carrying a human readable message
pub fn error_with_message(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Render field errors as `{field: {"errors": [messages]}}`
pub fn field_errors_json(validation_errors: &ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();

    for (field, errors) in validation_errors.field_errors() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Validation error in field: {}", field))
            })
            .collect();
        fields.insert(field.to_string(), serde_json::json!({"errors": messages}));
    }

    serde_json::Value::Object(fields)
}

pub fn validation_failed(validation_errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        fields: field_errors_json(validation_errors),
    })
}

pub fn request_rejected(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Request validation failed".to_string(),
        fields: serde_json::json!({"message": message}),
    })
}

/// Client-facing message for a body or query string that failed to deserialize
pub fn deserialize_message(err_string: &str) -> String {
    if err_string.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload".to_string()
    } else if err_string.contains("unknown variant") {
        "Invalid enum value. Check allowed values for this field".to_string()
    } else if err_string.contains("missing field") {
        err_string.to_string()
    } else {
        "Invalid request format".to_string()
    }
}

fn extractor_error(err: actix_web_validator::Error) -> actix_web::Error {
    let response = match err {
        actix_web_validator::Error::Validate(validation_errors) => validation_failed(&validation_errors),
        actix_web_validator::Error::Deserialize(de_err) => request_rejected(&deserialize_message(&de_err.to_string())),
        _ => request_rejected("Validation error"),
    };

    actix_web::error::InternalError::from_response("", response).into()
}

/// A JSON body that is buffered by the extractor but decoded only on demand.
///
/// Write endpoints run their permission gates and object lookup before
/// calling [`DeferredJson::decode`], so a caller without access never learns
/// anything from payload errors.
pub struct DeferredJson<T> {
    body: Bytes,
    _target: PhantomData<T>,
}

impl<T: DeserializeOwned> DeferredJson<T> {
    pub fn from_bytes(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            _target: PhantomData,
        }
    }

    /// Deserialize the buffered body. Field rules are left to the caller.
    pub fn decode(self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ApiError::BadRequest(deserialize_message(&e.to_string())))
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for DeferredJson<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = Bytes::from_request(req, payload);
        Box::pin(async move { Ok(DeferredJson::from_bytes(body.await?)) })
    }
}

/// QueryConfig with the project-wide error envelope
pub fn query_config() -> actix_web_validator::QueryConfig {
    actix_web_validator::QueryConfig::default().error_handler(|err, _req| extractor_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", error_with_message("required", "This field is required."));
        errors.add(NON_FIELD_ERRORS, error_with_message("location", "Bad location"));

        let json = field_errors_json(&errors);
        assert_eq!(json["title"]["errors"][0], "This field is required.");
        assert_eq!(json[NON_FIELD_ERRORS]["errors"][0], "Bad location");
    }

    #[test]
    fn falls_back_to_generic_message() {
        let mut errors = ValidationErrors::new();
        errors.add("salary", ValidationError::new("range"));

        let json = field_errors_json(&errors);
        assert_eq!(json["salary"]["errors"][0], "Validation error in field: salary");
    }

    #[derive(Debug, serde::Deserialize)]
    struct StatusBody {
        #[allow(dead_code)]
        status: crate::api::application::models::ApplicationStatus,
    }

    fn rejection(body: &'static [u8]) -> String {
        match DeferredJson::<StatusBody>::from_bytes(body).decode() {
            Err(ApiError::BadRequest(message)) => message,
            other => panic!("expected a rejected body, got {:?}", other),
        }
    }

    #[test]
    fn deferred_body_decodes_on_demand() {
        let body = DeferredJson::<StatusBody>::from_bytes(&br#"{"status": "accepted"}"#[..]);
        assert!(body.decode().is_ok());
    }

    #[test]
    fn deferred_body_errors_use_client_messages() {
        assert_eq!(rejection(b""), "Request body is empty. Expected JSON payload");
        assert_eq!(
            rejection(br#"{"status": "hired"}"#),
            "Invalid enum value. Check allowed values for this field"
        );
        assert!(rejection(b"{}").contains("missing field"));
        assert_eq!(rejection(b"not json"), "Invalid request format");
    }
}
