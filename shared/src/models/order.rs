//! Order Model

use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// Order placed by a pharmacy against a warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i64,
    #[serde(default)]
    pub total_price: f64,
    #[serde(default)]
    pub quantity: i64,
    pub status: OrderStatus,
    #[serde(default)]
    pub pharmacy_id: i64,
    #[serde(default)]
    pub pharmacy_name: String,
    /// ISO 8601 timestamp, absent on some API responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default)]
    pub medicines: Vec<OrderItem>,
}

/// Line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub medicine_id: i64,
    pub quantity: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medicine_name: Option<String>,
}
