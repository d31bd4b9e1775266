use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Authentication credentials were not provided.")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[source] DieselError),

    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("blocking task failed: {0}")]
    Blocking(#[from] BlockingError),

    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    pub(crate) fn not_found(what: &str, id: i32) -> Self {
        ApiError::NotFound(format!("{what} {id} does not exist."))
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ApiError::NotFound("Not found.".to_string()),
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::ForeignKeyViolation,
                info,
            ) => ApiError::Validation(info.message().to_string()),
            other => ApiError::Database(other),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Database(_)
            | ApiError::Pool(_)
            | ApiError::Blocking(_)
            | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let reason = if status.is_server_error() {
            log::error!("{self}");
            "Internal server error.".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "reason": reason }))
    }
}
