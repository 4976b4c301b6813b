//! Medicine Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inclusive quantity bounds for a catalog record
pub const QUANTITY_RANGE: (i64, i64) = (0, 9999);
/// Inclusive discount bounds (percent)
pub const DISCOUNT_RANGE: (f64, f64) = (0.0, 100.0);

/// `price * (1 - discount / 100)`
pub fn final_price(price: f64, discount: f64) -> f64 {
    price * (1.0 - discount / 100.0)
}

/// Catalog category flag (`drug` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrugCategory {
    Cosmetic,
    Pharmaceutical,
}

impl DrugCategory {
    pub fn from_flag(flag: i32) -> Option<Self> {
        match flag {
            0 => Some(Self::Cosmetic),
            1 => Some(Self::Pharmaceutical),
            _ => None,
        }
    }

    pub const fn flag(self) -> i32 {
        match self {
            Self::Cosmetic => 0,
            Self::Pharmaceutical => 1,
        }
    }

    /// Arabic display label
    pub const fn label_ar(self) -> &'static str {
        match self {
            Self::Cosmetic => "مستحضرات تجميل",
            Self::Pharmaceutical => "دواء",
        }
    }
}

/// Warehouse catalog record
///
/// Fields the dashboard does not interpret are kept in `extra` so a merge
/// never drops them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub medicine_id: i64,
    #[serde(default)]
    pub english_medicine_name: Option<String>,
    #[serde(default)]
    pub arabic_medicine_name: Option<String>,
    /// 0 = cosmetic, 1 = pharmaceutical
    #[serde(default)]
    pub drug: i32,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: i64,
    /// Percent, 0..=100
    #[serde(default)]
    pub discount: f64,
    #[serde(rename = "finalprice", default)]
    pub final_price: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Medicine {
    pub fn category(&self) -> Option<DrugCategory> {
        DrugCategory::from_flag(self.drug)
    }

    /// Recompute `final_price` from `price` and `discount`
    pub fn compute_final_price(&mut self) {
        self.final_price = final_price(self.price, self.discount);
    }

    /// Copy every interpreted field of `update` over `self`, keeping
    /// extra fields that `update` does not carry
    pub fn merge_from(&mut self, update: &Medicine) {
        self.english_medicine_name = update.english_medicine_name.clone();
        self.arabic_medicine_name = update.arabic_medicine_name.clone();
        self.drug = update.drug;
        self.price = update.price;
        self.quantity = update.quantity;
        self.discount = update.discount;
        self.final_price = update.final_price;
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// One page of the remote catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MedicinePage {
    #[serde(default)]
    pub items: Vec<Medicine>,
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u64,
}

fn default_total_pages() -> u32 {
    1
}

/// Authoritative medicine record (`GET /Warehouse/GetMedicine/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MedicineInfo {
    pub price: f64,
    #[serde(default)]
    pub drug: i32,
}

/// Warehouse-specific stock line (`GET /WarehouseMedicine/GetMedicineById`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MedicineDetail {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
}

impl MedicineDetail {
    /// `discount`, else `discountPercentage`, else 0
    pub fn effective_discount(&self) -> f64 {
        self.discount.or(self.discount_percentage).unwrap_or(0.0)
    }
}

/// Body of `PUT /WarehouseMedicine/UpdateMedicine/{id}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MedicineUpdate {
    pub quantity: i64,
    pub discount: f64,
}

/// Element of the bulk update body
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateItem {
    pub medicine_id: i64,
    pub quantity: i64,
    pub discount: f64,
}
