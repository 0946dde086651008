use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: String,
    /// Values below 1 are treated as 1; values above the remaining capacity are clamped.
    pub quantity: i32,
}
