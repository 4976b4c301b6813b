//! Application context
//!
//! Holds what every view controller needs: the API, the signed-in session,
//! the shared notification bus and the configuration.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::api::{PharmaApi, WarehouseApi};
use crate::bus::NotificationBus;
use crate::catalog::MedicineCatalog;
use crate::orders::{OrderBoard, OrderDetail};
use crate::validation::{validate_email, validate_password};
use crate::{ClientConfig, ClientResult, Session};

/// Validate credentials and sign in
///
/// Nothing is sent when the email or password is malformed.
#[instrument(skip(api, password))]
pub async fn login(api: &dyn WarehouseApi, email: &str, password: &str) -> ClientResult<Session> {
    let email = email.trim();
    validate_email(email)?;
    validate_password(password)?;

    let session = Session::from(api.login(email, password).await?);
    info!(warehouse_id = session.warehouse_id(), "Signed in");
    Ok(session)
}

/// Shared state for one signed-in warehouse
#[derive(Clone)]
pub struct AppContext {
    pub api: Arc<dyn WarehouseApi>,
    pub session: Session,
    pub bus: NotificationBus,
    pub config: ClientConfig,
}

impl AppContext {
    pub fn new(api: Arc<dyn WarehouseApi>, session: Session, config: ClientConfig) -> Self {
        Self {
            api,
            session,
            bus: NotificationBus::new(),
            config,
        }
    }

    /// Context over the real HTTP API
    pub fn connect(config: ClientConfig, session: Session) -> ClientResult<Self> {
        config.validate()?;
        let api: Arc<dyn WarehouseApi> = Arc::new(PharmaApi::from_config(&config)?);
        Ok(Self::new(api, session, config))
    }

    pub fn order_board(&self) -> OrderBoard {
        OrderBoard::new(Arc::clone(&self.api), self.session.clone(), self.config.page_size)
    }

    pub fn order_detail(&self) -> OrderDetail {
        OrderDetail::new(Arc::clone(&self.api), self.session.clone(), self.bus.clone())
    }

    pub fn catalog(&self) -> MedicineCatalog {
        MedicineCatalog::new(
            Arc::clone(&self.api),
            self.session.clone(),
            self.config.page_size,
            self.config.bulk_submit_policy,
        )
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("warehouse_id", &self.session.warehouse_id())
            .field("bus", &self.bus)
            .field("config", &self.config)
            .finish()
    }
}
