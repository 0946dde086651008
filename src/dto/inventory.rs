use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::StockEntry;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertStockRequest {
    pub product_id: String,
    pub region: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct StockList {
    #[schema(value_type = Vec<StockEntry>)]
    pub items: Vec<StockEntry>,
}
