use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use std::fmt;

/// Errors surfaced by the API, each mapped to an HTTP status and an `{"error": ...}` body
#[derive(Debug, Clone, PartialEq)]
pub enum BusinessError {
    /// Missing, malformed or out-of-range input (400 Bad Request)
    ValidationError { field: String, message: String },
    /// Resource not found (404 Not Found)
    NotFound { resource: String, id: String },
    /// No route or an unparseable path (404 Not Found)
    UnknownRoute,
    /// Unique key collision (400 Bad Request, clients treat it as a validation failure)
    Duplicate { resource: String, field: String },
    /// Store or serialization failure (500 Internal Server Error)
    InternalError { message: String },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationError { message, .. } => f.write_str(message),
            BusinessError::NotFound { resource, id } => {
                write!(f, "{} with id '{id}' not found", capitalize(resource))
            }
            BusinessError::UnknownRoute => f.write_str("Resource not found"),
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{} with this {field} already exists", capitalize(resource))
            }
            BusinessError::InternalError { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for BusinessError {}

impl BusinessError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BusinessError::ValidationError { .. } | BusinessError::Duplicate { .. } => {
                StatusCode::BAD_REQUEST
            }
            BusinessError::NotFound { .. } | BusinessError::UnknownRoute => {
                StatusCode::NOT_FOUND
            }
            BusinessError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internals go to the log, never to the client
        let message = if let BusinessError::InternalError { message } = &self {
            tracing::error!("{message}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JsonRejection> for BusinessError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => BusinessError::ValidationError {
                field: "body".to_string(),
                message: format!("Invalid request body: {}", err.body_text()),
            },
            JsonRejection::JsonSyntaxError(_) => BusinessError::ValidationError {
                field: "body".to_string(),
                message: "Invalid JSON body".to_string(),
            },
            _ => BusinessError::ValidationError {
                field: "body".to_string(),
                message: "Request body is required".to_string(),
            },
        }
    }
}

/// A path that does not parse (e.g. a non-integer id) addresses no resource at all
impl From<PathRejection> for BusinessError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameters: {rejection}");
        BusinessError::UnknownRoute
    }
}

/// Map store errors to business errors, using `context` as the resource name
pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return BusinessError::Duplicate {
            resource: context.replace('_', " "),
            field: "name".to_string(),
        };
    }

    match err {
        DbErr::RecordNotFound(msg) => BusinessError::NotFound {
            resource: context.replace('_', " "),
            id: extract_id_from_message(&msg),
        },
        _ => BusinessError::InternalError {
            message: format!("{context}: {err}"),
        },
    }
}

/// Pull an id out of messages like "microplate with id '4' not found"
fn extract_id_from_message(msg: &str) -> String {
    msg.find(" id '")
        .map(|start| &msg[start + 5..])
        .and_then(|rest| rest.find('\'').map(|end| rest[..end].to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::BusinessError::ValidationError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

#[macro_export]
macro_rules! duplicate_resource {
    ($resource:expr, $field:expr) => {
        $crate::common::errors::BusinessError::Duplicate {
            resource: $resource.to_string(),
            field: $field.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        map_db_error(self, context)
    }
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;
