//! Warehouse Model

use serde::{Deserialize, Serialize};

/// Warehouse record (`GET /Warehouse/Getbyid/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub governate: String,
    /// Whether the warehouse may edit and delete catalog records
    #[serde(default)]
    pub is_trusted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "wareHouseAreas", default)]
    pub areas: Vec<WarehouseArea>,
}

/// Delivery area served by a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseArea {
    pub area_name: String,
    /// Minimum order value for the area
    #[serde(rename = "minmumPrice", default)]
    pub minimum_price: f64,
}
