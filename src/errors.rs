use axum::http::StatusCode;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<crate::form::FormError> for AppError {
    fn from(err: crate::form::FormError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<crate::models::UnknownVariant> for AppError {
    fn from(err: crate::models::UnknownVariant) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Rejected task input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Failure of the underlying key-value storage. Never escapes the persistence
/// adapter; it is logged and the board carries on in memory.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage payload is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("unsupported schema version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u64, supported: u64 },
    #[error("unrecognized storage layout")]
    UnrecognizedLayout,
}
