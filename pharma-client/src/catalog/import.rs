//! Bulk import reconciliation
//!
//! Rows marked `IsExist = 1` are checked for repeated ids, resolved against
//! the authoritative medicine record (all lookups run concurrently and are
//! joined), merged into the snapshot and submitted in one bulk request.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{BulkUpdateItem, Medicine, final_price};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

use super::MedicineCatalog;
use crate::config::BulkSubmitPolicy;
use crate::validation::{validate_discount, validate_quantity};
use crate::{ClientError, ClientResult};

/// One parsed spreadsheet row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRow {
    #[serde(rename = "ID")]
    pub medicine_id: i64,
    #[serde(rename = "Quantity", default)]
    pub quantity: i64,
    #[serde(rename = "Discount", default)]
    pub discount: f64,
    /// Category flag as written in the file
    #[serde(default)]
    pub drug: Option<i32>,
    #[serde(rename = "IsExist", default)]
    pub is_exist: i64,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_name_en: Option<String>,
}

impl UploadRow {
    pub fn exists(&self) -> bool {
        self.is_exist == 1
    }

    fn to_bulk_item(&self) -> BulkUpdateItem {
        BulkUpdateItem {
            medicine_id: self.medicine_id,
            quantity: self.quantity,
            discount: self.discount,
        }
    }
}

/// Non-fatal findings reported alongside a successful import
#[derive(Debug, Clone, PartialEq)]
pub enum ImportWarning {
    /// File and server disagree on the category flag
    DrugMismatch { medicine_id: i64, file: i32, server: i32 },
    /// Row updates a medicine already in the snapshot
    AlreadyInCatalog { medicine_id: i64 },
}

impl ImportWarning {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DrugMismatch { .. } => ErrorCode::DrugFlagMismatch,
            Self::AlreadyInCatalog { .. } => ErrorCode::MedicineAlreadyInCatalog,
        }
    }
}

impl std::fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DrugMismatch { medicine_id, file, server } => write!(
                f,
                "medicine {medicine_id}: drug flag differs (file: {file}, server: {server})"
            ),
            Self::AlreadyInCatalog { medicine_id } => {
                write!(f, "medicine {medicine_id} is already in the warehouse")
            }
        }
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Ids merged into the snapshot, in file order
    pub accepted: Vec<i64>,
    pub appended: usize,
    pub updated: usize,
    /// Ids whose authoritative record could not be fetched
    pub dropped: Vec<i64>,
    pub warnings: Vec<ImportWarning>,
    /// Set when the bulk submit failed under the advisory policy
    pub submit_warning: Option<String>,
    /// Whether the merged rows differ from the snapshot they replaced
    pub changed: bool,
}

/// Ids occurring more than once, each reported once, in first-repeat order
pub fn duplicate_ids(rows: &[UploadRow]) -> Vec<i64> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for row in rows {
        if !seen.insert(row.medicine_id) && reported.insert(row.medicine_id) {
            dups.push(row.medicine_id);
        }
    }
    dups
}

/// Whether `incoming` differs from `existing` in size, membership, quantity,
/// discount or price
pub fn has_changes(incoming: &[Medicine], existing: &[Medicine]) -> bool {
    if incoming.len() != existing.len() {
        return true;
    }
    incoming.iter().any(|new| {
        match existing.iter().find(|old| old.medicine_id == new.medicine_id) {
            None => true,
            Some(old) => {
                old.quantity != new.quantity
                    || old.discount != new.discount
                    || old.price != new.price
            }
        }
    })
}

impl MedicineCatalog {
    /// Reconcile parsed rows with the catalog and submit them
    ///
    /// Fails without touching the snapshot when no row is marked as
    /// existing, when ids repeat, or when a quantity or discount is out of
    /// range. Rows whose medicine lookup fails are dropped.
    #[instrument(skip(self, rows), fields(warehouse_id = self.session.warehouse_id(), rows = rows.len()))]
    pub async fn import_rows(&mut self, rows: Vec<UploadRow>) -> ClientResult<ImportReport> {
        let rows: Vec<UploadRow> = rows.into_iter().filter(UploadRow::exists).collect();
        if rows.is_empty() {
            return Err(AppError::with_message(ErrorCode::EmptyFile, "no rows marked IsExist = 1").into());
        }

        let dups = duplicate_ids(&rows);
        if !dups.is_empty() {
            warn!(ids = ?dups, "Import rejected: repeated medicine ids");
            return Err(ClientError::DuplicateIds(dups));
        }

        for row in &rows {
            validate_quantity(row.quantity)
                .and_then(|_| validate_discount(row.discount))
                .map_err(|e| e.with_detail("medicineId", row.medicine_id))?;
        }

        let lookups = join_all(
            rows.iter()
                .map(|row| self.api.medicine_info(&self.session, row.medicine_id)),
        )
        .await;

        let mut report = ImportReport::default();
        let mut resolved = Vec::with_capacity(rows.len());
        for (row, lookup) in rows.iter().zip(lookups) {
            let info = match lookup {
                Ok(info) => info,
                Err(e) => {
                    warn!(medicine_id = row.medicine_id, error = %e, "Medicine lookup failed, row dropped");
                    report.dropped.push(row.medicine_id);
                    continue;
                }
            };

            if let Some(file) = row.drug
                && file != info.drug
            {
                warn!(medicine_id = row.medicine_id, file, server = info.drug, "Drug flag mismatch");
                report.warnings.push(ImportWarning::DrugMismatch {
                    medicine_id: row.medicine_id,
                    file,
                    server: info.drug,
                });
            }

            let existing = self.all.iter().find(|m| m.medicine_id == row.medicine_id);
            if existing.is_some() {
                report.warnings.push(ImportWarning::AlreadyInCatalog {
                    medicine_id: row.medicine_id,
                });
            }

            let mut record = existing.cloned().unwrap_or_else(|| Medicine {
                medicine_id: row.medicine_id,
                english_medicine_name: None,
                arabic_medicine_name: None,
                drug: info.drug,
                price: info.price,
                quantity: 0,
                discount: 0.0,
                final_price: info.price,
                extra: Default::default(),
            });
            if row.product_name.is_some() {
                record.arabic_medicine_name = row.product_name.clone();
            }
            if row.product_name_en.is_some() {
                record.english_medicine_name = row.product_name_en.clone();
            }
            record.drug = row.drug.unwrap_or(info.drug);
            record.price = info.price;
            record.quantity = row.quantity;
            record.discount = row.discount;
            record.final_price = final_price(info.price, row.discount);
            resolved.push(record);
        }

        report.changed = has_changes(&resolved, &self.all);

        let snapshot = (self.all.clone(), self.total_count);
        for record in resolved {
            report.accepted.push(record.medicine_id);
            match self.all.iter_mut().find(|m| m.medicine_id == record.medicine_id) {
                Some(slot) => {
                    slot.merge_from(&record);
                    report.updated += 1;
                }
                None => {
                    self.all.push(record);
                    self.total_count += 1;
                    report.appended += 1;
                }
            }
        }
        self.apply();

        let items: Vec<BulkUpdateItem> = rows.iter().map(UploadRow::to_bulk_item).collect();
        if let Err(e) = self.api.bulk_update_medicines(&self.session, &items).await {
            match self.policy {
                BulkSubmitPolicy::Advisory => {
                    warn!(error = %e, "Bulk update rejected, keeping local merge");
                    report.submit_warning = Some(e.to_string());
                }
                BulkSubmitPolicy::Strict => {
                    warn!(error = %e, "Bulk update rejected, rolling back");
                    (self.all, self.total_count) = snapshot;
                    self.apply();
                    return Err(e);
                }
            }
        }

        info!(
            accepted = report.accepted.len(),
            appended = report.appended,
            updated = report.updated,
            dropped = report.dropped.len(),
            warnings = report.warnings.len(),
            "Import finished"
        );
        Ok(report)
    }

    /// Parse a workbook and import its rows
    pub async fn import_spreadsheet(&mut self, bytes: &[u8]) -> ClientResult<ImportReport> {
        let rows = super::parse_workbook(bytes)?;
        self.import_rows(rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> UploadRow {
        UploadRow {
            medicine_id: id,
            quantity: 5,
            discount: 10.0,
            drug: Some(1),
            is_exist: 1,
            product_name: None,
            product_name_en: None,
        }
    }

    fn med(id: i64, quantity: i64, price: f64) -> Medicine {
        Medicine {
            medicine_id: id,
            english_medicine_name: None,
            arabic_medicine_name: None,
            drug: 1,
            price,
            quantity,
            discount: 0.0,
            final_price: price,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_duplicate_ids_reported_once() {
        let rows = vec![row(1), row(2), row(1), row(3), row(2), row(1)];
        assert_eq!(duplicate_ids(&rows), vec![1, 2]);
        assert!(duplicate_ids(&[row(1), row(2)]).is_empty());
    }

    #[test]
    fn test_upload_row_from_sheet_json() {
        let json = r#"{"ID": 7, "Quantity": 3, "Discount": 12.5, "drug": 0, "IsExist": 1,
                       "product_name": "كريم", "product_name_en": "Cream"}"#;
        let r: UploadRow = serde_json::from_str(json).unwrap();
        assert_eq!(r.medicine_id, 7);
        assert_eq!(r.drug, Some(0));
        assert!(r.exists());
        assert_eq!(r.product_name_en.as_deref(), Some("Cream"));
    }

    #[test]
    fn test_has_changes() {
        let a = vec![med(1, 5, 10.0)];
        assert!(!has_changes(&a, &[med(1, 5, 10.0)]));
        assert!(has_changes(&a, &[med(1, 6, 10.0)]));
        assert!(has_changes(&a, &[med(2, 5, 10.0)]));
        assert!(has_changes(&a, &[]));
    }

    #[test]
    fn test_warning_display() {
        let w = ImportWarning::DrugMismatch { medicine_id: 4, file: 0, server: 1 };
        assert_eq!(w.to_string(), "medicine 4: drug flag differs (file: 0, server: 1)");
        assert_eq!(w.code(), ErrorCode::DrugFlagMismatch);
        assert_eq!(
            ImportWarning::AlreadyInCatalog { medicine_id: 4 }.code().code(),
            6006
        );
    }
}
