//! Authenticated session context
//!
//! Built once at login and passed to every privileged call. Nothing in the
//! library mutates a session after it is created.

use serde::{Deserialize, Serialize};
use shared::client::{LoginResponse, WarehouseRef};
use std::env;
use std::fs;
use std::path::Path;

use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub warehouse: WarehouseRef,
}

impl Session {
    pub fn new(token: impl Into<String>, warehouse_id: i64) -> Self {
        Self {
            token: token.into(),
            warehouse: WarehouseRef {
                id: warehouse_id,
                name: None,
            },
        }
    }

    pub fn warehouse_id(&self) -> i64 {
        self.warehouse.id
    }

    pub fn token(&self) -> Option<&str> {
        Some(self.token.as_str())
    }

    /// Build from `PHARMA_TOKEN` and `PHARMA_WAREHOUSE_ID`
    pub fn from_env() -> ClientResult<Self> {
        let token = env::var("PHARMA_TOKEN")
            .map_err(|_| ClientError::Config("PHARMA_TOKEN is not set".into()))?;
        let id = env::var("PHARMA_WAREHOUSE_ID")
            .map_err(|_| ClientError::Config("PHARMA_WAREHOUSE_ID is not set".into()))?
            .parse()
            .map_err(|_| ClientError::Config("PHARMA_WAREHOUSE_ID must be an integer".into()))?;
        Ok(Self::new(token, id))
    }

    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> ClientResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.token,
            warehouse: resp.warehouse,
        }
    }
}
