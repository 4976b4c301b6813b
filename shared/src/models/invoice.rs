//! Invoice Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Invoice line (`GET /Order/getAllOrderDetailsForAdminDashboard/{id}`)
///
/// Money fields are decimals; the API spells "discount" as `Disccount`
/// in two field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub medicine_name: String,
    #[serde(default)]
    pub arabic_medicine_name: String,
    #[serde(default)]
    pub medicine_image: Option<String>,
    #[serde(default)]
    pub medicine_price: Decimal,
    #[serde(default)]
    pub quantity: i64,
    #[serde(rename = "totalPriceBeforeDisccount", default)]
    pub total_before_discount: Decimal,
    #[serde(rename = "totalPriceAfterDisccount", default)]
    pub total_after_discount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub pharmacy_name: String,
    #[serde(rename = "wareHouseName", default)]
    pub warehouse_name: String,
    #[serde(default)]
    pub pharmacy_number: String,
    #[serde(default)]
    pub pharmacy_address: String,
}

/// Invoice endpoint envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InvoiceResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Vec<InvoiceItem>,
}
