use crate::registry::RegistryError;
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;

/// HTTP-boundary error taxonomy. Every fallible handler branch maps to
/// exactly one of these, which in turn maps to exactly one status code —
/// handlers never build `HttpResponse::build(..)` error bodies by hand.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("unknown experiment {0:?}")]
    UnknownExperiment(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("experiment {0:?} already exists")]
    AlreadyExists(String),

    #[error("state store unavailable")]
    StateStoreUnavailable(#[source] redis::RedisError),

    #[error("registry unavailable")]
    RegistryUnavailable(#[source] tokio_postgres::Error),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => AppError::UnknownExperiment(id),
            StoreError::Unavailable(e) => AppError::StateStoreUnavailable(e),
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::AlreadyExists(id) => AppError::AlreadyExists(id),
            RegistryError::Unavailable(e) => AppError::RegistryUnavailable(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownExperiment(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::StateStoreUnavailable(_) | AppError::RegistryUnavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
            return HttpResponse::build(status).json(ErrorBody {
                error: "internal error",
            });
        }
        HttpResponse::build(status).json(ErrorBody {
            error: &self.to_string(),
        })
    }
}
