//! Coded error responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{RegistreError, ValidationError};

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const BAD_REQUEST: &str = "BAD_REQUEST";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const STORE_ERROR: &str = "STORE_ERROR";

const STORE_ERROR_MESSAGE: &str = "internal storage error";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    BadRequest(String),
    NotFound(String),
    /// Persistence or runtime failure. Details are logged, never returned.
    Store,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(e) => ErrorBody {
                code: VALIDATION_ERROR.to_string(),
                message: e.to_string(),
                field: Some(e.field().to_string()),
            },
            Self::BadRequest(message) => ErrorBody {
                code: BAD_REQUEST.to_string(),
                message: message.clone(),
                field: None,
            },
            Self::NotFound(message) => ErrorBody {
                code: NOT_FOUND.to_string(),
                message: message.clone(),
                field: None,
            },
            Self::Store => ErrorBody {
                code: STORE_ERROR.to_string(),
                message: STORE_ERROR_MESSAGE.to_string(),
                field: None,
            },
        }
    }
}

impl From<RegistreError> for ApiError {
    fn from(err: RegistreError) -> Self {
        match err {
            RegistreError::Validation(e) => Self::Validation(e),
            e @ RegistreError::NotFound { .. } => Self::NotFound(e.to_string()),
            RegistreError::Database(e) => {
                tracing::error!(error = %e, "Storage failure");
                Self::Store
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
