use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{orders::Fulfillment, products::ItemCondition};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub category_id: String,
    pub title: String,
    pub description: Option<String>,
    pub condition: ItemCondition,
    pub price: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityStatus {
    InStock,
    LowStock,
    OutOfStock,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Availability {
    pub product_id: String,
    pub region_code: String,
    pub status: AvailabilityStatus,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockEntry {
    pub product_id: String,
    pub region_code: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i32,
    pub price_snapshot: i64,
    pub condition_snapshot: ItemCondition,
    pub subtotal: i64,
}

/// Cart contents as shown to the shopper. `naive_total` is never billed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartView {
    pub cart_id: Option<Uuid>,
    pub lines: Vec<CartLine>,
    pub total_quantity: i32,
    pub naive_total: i64,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            cart_id: None,
            lines: Vec::new(),
            total_quantity: 0,
            naive_total: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub session_id: String,
    pub user_id: Option<Uuid>,
    pub region_code: String,
    pub fulfillment: Fulfillment,
    pub customer_name: String,
    pub customer_email: String,
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: i32,
    pub price: i64,
    pub condition: ItemCondition,
    pub subtotal: i64,
}

/// Outcome of a successful placement. Only `server_total` was charged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub server_total: i64,
    pub client_total: i64,
}
