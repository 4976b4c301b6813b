//! Client-related types
//!
//! Request/response types of the login endpoint and the warehouse
//! descriptor a session carries.

use serde::{Deserialize, Serialize};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request (`POST /Warehouse/login`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub warehouse: WarehouseRef,
}

/// Warehouse descriptor returned at login and kept in the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WarehouseRef {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Error body of a rejected login
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoginErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
