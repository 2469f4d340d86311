// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Shown to users when a collaborator (database, auth provider) fails.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Something went wrong on our side. Please try again, or contact support if it keeps happening.";

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No longer available: {0}")]
    Gone(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Malformed request body at {field}: {message}")]
    MalformedBody { field: String, message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::Gone(msg) => (StatusCode::GONE, "gone", Some(msg.clone())),
            AppError::Validation(errors) => {
                fields = Some(field_messages(errors));
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed", None)
            }
            AppError::MalformedBody { field, message } => {
                fields = Some(BTreeMap::from([(field.clone(), vec![message.clone()])]));
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed", None)
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    Some(GENERIC_FAILURE_MESSAGE.to_string()),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some(GENERIC_FAILURE_MESSAGE.to_string()),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

const JSON_DATA_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                let (field, message) = split_data_error(&err.body_text());
                AppError::MalformedBody { field, message }
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

/// Split a body deserialization error into `(path, message)`.
///
/// The path uses the same `entries[0].distance_km` form as validation
/// errors; failures on the document itself use `__all__`.
fn split_data_error(text: &str) -> (String, String) {
    let detail = text.strip_prefix(JSON_DATA_PREFIX).unwrap_or(text);
    let detail = match detail.rfind(" at line ") {
        Some(pos) => &detail[..pos],
        None => detail,
    };

    if let Some((path, message)) = detail.split_once(": ") {
        let is_path = !path.is_empty()
            && path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'));
        if is_path {
            return (path.to_string(), message.to_string());
        }
    }
    ("__all__".to_string(), detail.to_string())
}

/// Flatten nested validation errors into `path -> messages`.
///
/// Paths look like `entries[1].distance_km`; struct-level errors use `__all__`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    collect_messages(errors, None, &mut out);
    out
}

fn collect_messages(
    errors: &ValidationErrors,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(path).or_insert_with(Vec::new);
                messages.extend(list.iter().map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, Some(&path), out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    let item_path = format!("{}[{}]", path, index);
                    collect_messages(inner, Some(&item_path), out);
                }
            }
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
