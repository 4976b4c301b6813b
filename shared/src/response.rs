//! API Response types
//!
//! The orders endpoint answers either `{ "result": [...] }` or a bare
//! array; [`ListEnvelope`] accepts both.

use serde::{Deserialize, Serialize};

/// List payload in either of its two wire shapes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Wrapped { result: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Wrapped { result } => result,
            ListEnvelope::Bare(items) => items,
        }
    }
}
