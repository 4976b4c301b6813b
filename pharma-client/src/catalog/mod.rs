//! Warehouse medicine catalog
//!
//! [`MedicineCatalog`] owns one page of the remote catalog (the snapshot),
//! the filtered view shown to the user, and the warehouse trust flag that
//! gates mutations. Spreadsheet import lives in [`import`] and [`sheet`].

pub mod filter;
pub mod import;
pub mod sheet;

use shared::models::{Medicine, MedicineDetail, MedicineUpdate};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::WarehouseApi;
use crate::config::BulkSubmitPolicy;
use crate::validation::{validate_discount, validate_quantity};
use crate::{ClientError, ClientResult, Session};

// Re-exports
pub use filter::{apply_filters, compare_names};
pub use import::{ImportReport, ImportWarning, UploadRow};
pub use sheet::{parse_json_rows, parse_workbook};

/// Catalog controller for the session's warehouse
pub struct MedicineCatalog {
    api: Arc<dyn WarehouseApi>,
    session: Session,
    page_size: usize,
    policy: BulkSubmitPolicy,
    page: u32,
    total_pages: u32,
    total_count: u64,
    /// Snapshot of the loaded page
    all: Vec<Medicine>,
    /// Filtered and sorted view of `all`
    displayed: Vec<Medicine>,
    search: String,
    drug_filter: Option<i32>,
    trusted: bool,
}

impl MedicineCatalog {
    pub fn new(
        api: Arc<dyn WarehouseApi>,
        session: Session,
        page_size: usize,
        policy: BulkSubmitPolicy,
    ) -> Self {
        Self {
            api,
            session,
            page_size: page_size.max(1),
            policy,
            page: 1,
            total_pages: 1,
            total_count: 0,
            all: Vec::new(),
            displayed: Vec::new(),
            search: String::new(),
            drug_filter: None,
            trusted: false,
        }
    }

    // ========== Loading ==========

    /// Replace the snapshot with page `page` of the remote catalog
    ///
    /// On failure the snapshot and counters keep their previous values.
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn load_page(&mut self, page: u32) -> ClientResult<usize> {
        let page = page.max(1);
        let fetched = self
            .api
            .medicine_page(&self.session, page, self.page_size)
            .await?;

        self.page = page;
        self.total_pages = fetched.total_pages.max(1);
        self.total_count = fetched.total_count;
        self.all = fetched.items;
        self.apply();
        info!(page, count = self.all.len(), total = self.total_count, "Medicines loaded");
        Ok(self.all.len())
    }

    /// Load the next page; `false` when already on the last one
    pub async fn next_page(&mut self) -> ClientResult<bool> {
        if self.page >= self.total_pages {
            return Ok(false);
        }
        self.load_page(self.page + 1).await?;
        Ok(true)
    }

    /// Load the previous page; `false` when already on the first one
    pub async fn prev_page(&mut self) -> ClientResult<bool> {
        if self.page <= 1 {
            return Ok(false);
        }
        self.load_page(self.page - 1).await?;
        Ok(true)
    }

    // ========== Filters ==========

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.apply();
    }

    /// `None` shows every category
    pub fn set_drug_filter(&mut self, drug: Option<i32>) {
        self.drug_filter = drug;
        self.apply();
    }

    /// Recompute the displayed view from the snapshot
    pub fn apply(&mut self) {
        self.displayed = apply_filters(&self.all, &self.search, self.drug_filter);
    }

    // ========== Trust ==========

    /// Re-read the warehouse trust flag
    ///
    /// A failed fetch leaves the warehouse untrusted.
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn refresh_trust(&mut self) -> bool {
        self.trusted = match self.api.warehouse(&self.session).await {
            Ok(warehouse) => warehouse.is_trusted,
            Err(e) => {
                warn!(error = %e, "Failed to fetch warehouse trust flag");
                false
            }
        };
        self.trusted
    }

    fn ensure_trusted(&self) -> ClientResult<()> {
        if self.trusted {
            Ok(())
        } else {
            Err(ClientError::NotTrusted)
        }
    }

    // ========== Mutations ==========

    /// Delete a medicine from the warehouse catalog
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn delete(&mut self, medicine_id: i64) -> ClientResult<()> {
        self.ensure_trusted()?;
        self.api.delete_medicine(&self.session, medicine_id).await?;

        self.all.retain(|m| m.medicine_id != medicine_id);
        self.displayed.retain(|m| m.medicine_id != medicine_id);
        self.total_count = self.total_count.saturating_sub(1);
        info!(medicine_id, total = self.total_count, "Medicine deleted");
        Ok(())
    }

    /// Current stock line of one medicine, for the edit form
    pub async fn fetch_detail(&self, medicine_id: i64) -> ClientResult<MedicineDetail> {
        self.api.medicine_detail(&self.session, medicine_id).await
    }

    /// Set quantity and discount of one medicine; returns the server's message
    #[instrument(skip(self), fields(warehouse_id = self.session.warehouse_id()))]
    pub async fn edit(&mut self, medicine_id: i64, quantity: i64, discount: f64) -> ClientResult<String> {
        self.ensure_trusted()?;
        validate_quantity(quantity)?;
        validate_discount(discount)?;

        let message = self
            .api
            .update_medicine(&self.session, medicine_id, MedicineUpdate { quantity, discount })
            .await?;

        if let Some(record) = self.all.iter_mut().find(|m| m.medicine_id == medicine_id) {
            record.quantity = quantity;
            record.discount = discount;
            record.compute_final_price();
            self.apply();
        }
        info!(medicine_id, quantity, discount, "Medicine updated");
        Ok(message)
    }

    // ========== Accessors ==========

    pub fn all(&self) -> &[Medicine] {
        &self.all
    }

    pub fn displayed(&self) -> &[Medicine] {
        &self.displayed
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn drug_filter(&self) -> Option<i32> {
        self.drug_filter
    }

    pub fn is_trusted(&self) -> bool {
        self.trusted
    }

    pub fn policy(&self) -> BulkSubmitPolicy {
        self.policy
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
