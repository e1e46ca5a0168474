use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jurisdesk_core::errors::Error as CoreError;
use jurisdesk_core::ledger::LedgerError;
use jurisdesk_court_data::LookupError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        ApiError::Core(err.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        CoreError::Lookup(LookupError::InvalidFormat { .. }) => StatusCode::BAD_REQUEST,
        CoreError::Lookup(LookupError::NotFound { .. }) => StatusCode::NOT_FOUND,
        CoreError::Lookup(LookupError::AllSourcesFailed { .. }) => StatusCode::BAD_GATEWAY,
        CoreError::Ledger(LedgerError::LedgerNotFound(_) | LedgerError::EntryNotFound { .. }) => {
            StatusCode::NOT_FOUND
        }
        CoreError::Ledger(LedgerError::AlreadyExists(_)) => StatusCode::CONFLICT,
        CoreError::Ledger(LedgerError::InvalidAmount(_)) => StatusCode::BAD_REQUEST,
        CoreError::Database(_)
        | CoreError::Repository(_)
        | CoreError::Serialization(_)
        | CoreError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_map_to_distinct_statuses() {
        let invalid = ApiError::from(LookupError::InvalidFormat {
            input: "1".to_string(),
            reason: "too short".to_string(),
        });
        let missing = ApiError::from(LookupError::NotFound {
            case_number: "x".to_string(),
        });
        let failed = ApiError::from(LookupError::AllSourcesFailed {
            case_number: "x".to_string(),
            failures: vec![],
        });

        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(failed.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_ledger_errors() {
        let conflict = ApiError::from(CoreError::from(LedgerError::AlreadyExists("c".into())));
        let missing = ApiError::from(CoreError::from(LedgerError::EntryNotFound {
            case_id: "c".into(),
            entry_id: "e".into(),
        }));
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}
