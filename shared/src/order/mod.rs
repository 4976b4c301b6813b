//! Order lifecycle
//!
//! - [`OrderStatus`]: the closed set of statuses an order can be in
//! - [`TransitionError`]: why a requested status change was refused

pub mod status;

// Re-exports
pub use status::{OrderStatus, TransitionError, TransitionRejection};
