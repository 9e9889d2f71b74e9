//! Error types for the Divvy service layer.
//!
//! Everything a host needs to map onto an HTTP status lives in one enum.
//! Upload and extraction failures keep their own typed errors and funnel
//! in via `From`.

use crate::receipt::ExtractionError;
use crate::upload::UploadError;

/// Service layer errors.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Authentication failed: token expired")]
    TokenExpired,

    #[error("Rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("Receipt extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience alias for service results.
pub type ServiceResult<T> = Result<T, ServiceError>;
