use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use derive_more::derive::{Display, Error as DeriveMoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError{
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Cant bind to the Socket")]
    SocketBind,
    #[error("Cant connect to the DB")]
    DbConnect,
    #[error("Cant run the DB migrations")]
    Migrate,
    #[error("Cant start the server")]
    ServerStart,
}

fn default_status() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Error returned to the client as `{"error": "..."}`.
#[derive(Debug, Display, DeriveMoreError, Serialize, Deserialize)]
#[display("error :{}", error)]
pub struct CustomError{
    pub error: String,
    #[serde(skip, default = "default_status")]
    pub status: StatusCode,
}

impl CustomError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        CustomError { error: error.into(), status }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn unauthorized(error: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, error)
    }

    pub fn forbidden(error: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl ResponseError for CustomError{
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(self)
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }
}

/// Logs a persistence failure and hides it behind a generic message.
pub fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> CustomError {
    move |e| {
        tracing::error!(error = %e, "{}", context);
        CustomError::internal(context)
    }
}
