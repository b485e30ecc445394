//! # API Errors
//!
//! Maps catalog failures onto HTTP responses:
//!
//! | Failure                        | Status | Body                                |
//! |--------------------------------|--------|-------------------------------------|
//! | validation, malformed body     | 400    | `{"errors": ["validation errors"]}` |
//! | unknown id                     | 404    | `{"error": "<entity> not found"}`   |
//! | storage or serialization fault | 500    | plain text, details only in logs    |

use super::types::{ErrorResponse, ValidationErrorResponse};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cosmos_core::{CosmosError, ValidationError};

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// A field failed validation.
    Validation(ValidationError),
    /// The body was not a JSON document of the expected shape.
    MalformedBody(String),
    /// The addressed row does not exist.
    NotFound(&'static str),
    /// Storage or serialization failure.
    Internal(CosmosError),
}

impl From<CosmosError> for ApiError {
    fn from(err: CosmosError) -> Self {
        match err {
            CosmosError::Validation(err) => Self::Validation(err),
            CosmosError::ScientistNotFound(_) => Self::NotFound("scientist"),
            CosmosError::PlanetNotFound(_) => Self::NotFound("planet"),
            other => Self::Internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(err) => {
                tracing::debug!("Validation failed: {}", err);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorResponse::default()),
                )
                    .into_response()
            }
            Self::MalformedBody(reason) => {
                tracing::debug!("Rejected request body: {}", reason);
                (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorResponse::default()),
                )
                    .into_response()
            }
            Self::NotFound(entity) => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(entity))).into_response()
            }
            Self::Internal(err) => {
                tracing::error!("Catalog failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use cosmos_core::{PlanetId, ScientistId};

    #[test]
    fn catalog_errors_map_to_statuses() {
        let cases = [
            (
                CosmosError::Validation(ValidationError::Empty { field: "name" }),
                StatusCode::BAD_REQUEST,
            ),
            (
                CosmosError::ScientistNotFound(ScientistId(3)),
                StatusCode::NOT_FOUND,
            ),
            (CosmosError::PlanetNotFound(PlanetId(3)), StatusCode::NOT_FOUND),
            (
                CosmosError::IoError("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn not_found_names_the_entity() {
        match ApiError::from(CosmosError::ScientistNotFound(ScientistId(1))) {
            ApiError::NotFound(entity) => assert_eq!(entity, "scientist"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
