//! Shared types for the pharmacy warehouse dashboard
//!
//! Wire models exchanged with the warehouse REST API, the order status
//! state machine, and the unified error system used by every crate.

pub mod client;
pub mod error;
pub mod models;
pub mod order;
pub mod response;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{OrderStatus, TransitionError};
