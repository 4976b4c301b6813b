//! Order controllers
//!
//! - [`OrderBoard`]: the warehouse's order list, kept in sync with the API
//! - [`OrderDetail`]: one order, with status updates

pub mod board;
pub mod detail;

// Re-exports
pub use board::{OrderBoard, SyncOutcome, paginate, total_pages};
pub use detail::{OrderDetail, format_order_date};
