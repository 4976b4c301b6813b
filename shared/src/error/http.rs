//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code that corresponds to this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::WarehouseNotFound
            | Self::OrderNotFound
            | Self::MedicineNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::MedicineAlreadyInCatalog | Self::StatusUpdateInProgress => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::WarehouseNotTrusted => StatusCode::FORBIDDEN,

            // 422 Unprocessable (business rule rejected)
            Self::InvalidStatusTransition
            | Self::OrderStatusTerminal
            | Self::CancelNotAllowed
            | Self::DuplicateMedicineIds
            | Self::DrugFlagMismatch => StatusCode::UNPROCESSABLE_ENTITY,

            // 502 Bad Gateway (upstream API refused the request)
            Self::StatusUpdateFailed => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError | Self::PrinterNotAvailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError | Self::PrintFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
