//! Unified error codes for the warehouse dashboard
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Warehouse errors
//! - 4xxx: Order errors
//! - 6xxx: Medicine catalog and import errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize as
/// plain numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,

    // ==================== 2xxx: Permission ====================
    /// Warehouse is not trusted to modify its catalog
    WarehouseNotTrusted = 2002,

    // ==================== 3xxx: Warehouse ====================
    /// Warehouse not found
    WarehouseNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Requested status does not follow the current one
    InvalidStatusTransition = 4002,
    /// Order is in a terminal status
    OrderStatusTerminal = 4003,
    /// Order can only be cancelled while in Ordered status
    CancelNotAllowed = 4004,
    /// Status update request was rejected
    StatusUpdateFailed = 4005,
    /// A status update is already in flight
    StatusUpdateInProgress = 4006,

    // ==================== 6xxx: Medicine ====================
    /// Medicine not found
    MedicineNotFound = 6001,
    /// Quantity outside 0..=9999
    QuantityOutOfRange = 6002,
    /// Discount outside 0..=100
    DiscountOutOfRange = 6003,
    /// Upload contains the same medicine id more than once
    DuplicateMedicineIds = 6004,
    /// Upload drug flag differs from the server record
    DrugFlagMismatch = 6005,
    /// Uploaded medicine is already in the catalog
    MedicineAlreadyInCatalog = 6006,

    // ==================== 65xx: File Upload ====================
    /// Upload has no usable rows
    EmptyFile = 6502,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Printer not available
    PrinterNotAvailable = 9201,
    /// Print operation failed
    PrintFailed = 9202,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",

            // Permission
            ErrorCode::WarehouseNotTrusted => "Warehouse is not trusted to modify medicines",

            // Warehouse
            ErrorCode::WarehouseNotFound => "Warehouse not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::InvalidStatusTransition => "Order cannot move back or skip to this status",
            ErrorCode::OrderStatusTerminal => "Order is in a final status",
            ErrorCode::CancelNotAllowed => "Only new orders can be cancelled",
            ErrorCode::StatusUpdateFailed => "Failed to update order status",
            ErrorCode::StatusUpdateInProgress => "A status update is already in progress",

            // Medicine
            ErrorCode::MedicineNotFound => "Medicine not found",
            ErrorCode::QuantityOutOfRange => "Quantity must be between 0 and 9999",
            ErrorCode::DiscountOutOfRange => "Discount must be between 0 and 100",
            ErrorCode::DuplicateMedicineIds => "Upload contains duplicate medicine ids",
            ErrorCode::DrugFlagMismatch => "Drug flag differs from the server record",
            ErrorCode::MedicineAlreadyInCatalog => "Medicine already exists in the warehouse",

            // File Upload
            ErrorCode::EmptyFile => "Upload has no rows to import",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::PrinterNotAvailable => "Printer not available",
            ErrorCode::PrintFailed => "Print operation failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Permission
            2002 => Ok(ErrorCode::WarehouseNotTrusted),

            // Warehouse
            3001 => Ok(ErrorCode::WarehouseNotFound),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::InvalidStatusTransition),
            4003 => Ok(ErrorCode::OrderStatusTerminal),
            4004 => Ok(ErrorCode::CancelNotAllowed),
            4005 => Ok(ErrorCode::StatusUpdateFailed),
            4006 => Ok(ErrorCode::StatusUpdateInProgress),

            // Medicine
            6001 => Ok(ErrorCode::MedicineNotFound),
            6002 => Ok(ErrorCode::QuantityOutOfRange),
            6003 => Ok(ErrorCode::DiscountOutOfRange),
            6004 => Ok(ErrorCode::DuplicateMedicineIds),
            6005 => Ok(ErrorCode::DrugFlagMismatch),
            6006 => Ok(ErrorCode::MedicineAlreadyInCatalog),

            // File Upload
            6502 => Ok(ErrorCode::EmptyFile),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9201 => Ok(ErrorCode::PrinterNotAvailable),
            9202 => Ok(ErrorCode::PrintFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::WarehouseNotTrusted.code(), 2002);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::DuplicateMedicineIds.code(), 6004);
        assert_eq!(ErrorCode::NetworkError.code(), 9003);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }

    #[test]
    fn test_try_from_every_known_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::RequiredField,
            ErrorCode::WarehouseNotTrusted,
            ErrorCode::CancelNotAllowed,
            ErrorCode::MedicineAlreadyInCatalog,
            ErrorCode::PrintFailed,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(5001), Err(InvalidErrorCode(5001)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");

        let parsed: ErrorCode = serde_json::from_str("6004").unwrap();
        assert_eq!(parsed, ErrorCode::DuplicateMedicineIds);

        let result: Result<ErrorCode, _> = serde_json::from_str("10000");
        assert!(result.is_err());
    }

    #[test]
    fn test_display_and_message() {
        assert_eq!(format!("{}", ErrorCode::InternalError), "9001");
        assert_eq!(ErrorCode::OrderNotFound.message(), "Order not found");
        assert_eq!(
            format!("{}", InvalidErrorCode(999)),
            "invalid error code: 999"
        );
    }
}
