//! Data models
//!
//! Wire shapes of the warehouse REST API. Field names follow the API's
//! camelCase JSON; all ids are `i64`.

pub mod invoice;
pub mod medicine;
pub mod order;
pub mod warehouse;

// Re-exports
pub use invoice::*;
pub use medicine::*;
pub use order::*;
pub use warehouse::*;
