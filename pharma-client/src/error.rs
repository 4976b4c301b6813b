//! Client error types

use http::StatusCode;
use pharma_printer::PrintError;
use shared::error::{AppError, ErrorCode};
use shared::order::TransitionError;
use thiserror::Error;

/// Coarse classification shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure or non-2xx response
    Network,
    /// Rejected locally before any request
    Validation,
    /// Missing or rejected credentials
    Authentication,
    /// Warehouse is not trusted for the mutation
    Authorization,
    /// Lookup yielded no record
    NotFound,
    /// Local I/O, configuration or encoding failure
    Internal,
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the API
    #[error("API error {status}: {body}")]
    Api { status: StatusCode, body: String },

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or token rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Login refused
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Warehouse is not allowed to modify its catalog
    #[error("Warehouse is not trusted to modify medicines")]
    NotTrusted,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] AppError),

    /// Status change refused by the state machine
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// Import file repeats medicine ids
    #[error("Duplicate medicine ids in upload: {0:?}")]
    DuplicateIds(Vec<i64>),

    /// Status update request failed, local record unchanged
    #[error("Order status update failed: {0}")]
    UpdateFailed(#[source] Box<ClientError>),

    /// Another update of the same record is still running
    #[error("Operation already in progress: {0}")]
    Busy(String),

    /// Spreadsheet could not be read
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Printer error
    #[error("Print error: {0}")]
    Print(#[from] PrintError),
}

impl ClientError {
    /// Map onto the user-facing error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Http(_) | Self::Api { .. } | Self::InvalidResponse(_) => ErrorKind::Network,
            Self::Unauthorized | Self::InvalidCredentials => ErrorKind::Authentication,
            Self::NotTrusted => ErrorKind::Authorization,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_)
            | Self::InvalidTransition(_)
            | Self::DuplicateIds(_)
            | Self::Busy(_)
            | Self::Spreadsheet(_) => ErrorKind::Validation,
            Self::UpdateFailed(inner) => inner.kind(),
            Self::Serialization(_) | Self::Config(_) | Self::Io(_) | Self::Print(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Unified error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) | Self::Api { .. } | Self::InvalidResponse(_) => ErrorCode::NetworkError,
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::InvalidCredentials => ErrorCode::InvalidCredentials,
            Self::NotTrusted => ErrorCode::WarehouseNotTrusted,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(e) => e.code,
            Self::InvalidTransition(e) => e.code(),
            Self::DuplicateIds(_) => ErrorCode::DuplicateMedicineIds,
            Self::UpdateFailed(_) => ErrorCode::StatusUpdateFailed,
            Self::Busy(_) => ErrorCode::StatusUpdateInProgress,
            Self::Spreadsheet(_) => ErrorCode::InvalidFormat,
            Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::InternalError,
            Self::Print(PrintError::Connection(_) | PrintError::Timeout(_)) => {
                ErrorCode::PrinterNotAvailable
            }
            Self::Print(_) => ErrorCode::PrintFailed,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
