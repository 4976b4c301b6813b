//! Pharma Client - warehouse dashboard core
//!
//! Typed access to the warehouse REST API plus the controllers behind the
//! dashboard views.
//!
//! # Module layout
//!
//! ```text
//! pharma-client/src/
//! ├── api.rs        # WarehouseApi trait, one method per endpoint
//! ├── http.rs       # HttpClient over reqwest
//! ├── session.rs    # explicit login context
//! ├── bus.rs        # order notification bus
//! ├── orders/       # order list sync, order detail and status updates
//! ├── catalog/      # medicine catalog, filters, spreadsheet import
//! ├── invoice.rs    # invoice composition and rendering
//! └── context.rs    # AppContext and login
//! ```

pub mod api;
pub mod bus;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod invoice;
pub mod logger;
pub mod orders;
pub mod session;
pub mod validation;

pub use api::{PharmaApi, WarehouseApi};
pub use bus::{Delivery, NotificationBus, OrderUpdated, Subscription};
pub use catalog::{ImportReport, ImportWarning, MedicineCatalog, UploadRow};
pub use config::{BulkSubmitPolicy, ClientConfig};
pub use context::{AppContext, login};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use http::{HttpClient, NetworkHttpClient};
pub use invoice::{
    EscPosInvoiceRenderer, Invoice, InvoiceRenderer, TextInvoiceRenderer, print_invoice,
};
pub use logger::{cleanup_old_logs, init_logger, init_logger_with_file};
pub use orders::{OrderBoard, OrderDetail, SyncOutcome};
pub use session::Session;

// Re-export shared types for convenience
pub use shared::client::{LoginResponse, WarehouseRef};
pub use shared::models::{Medicine, Order, Warehouse};
pub use shared::order::OrderStatus;
