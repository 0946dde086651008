//! Per-product, per-region stock counts.
//!
//! Every function takes any [`ConnectionTrait`] so callers can run them on the
//! pool or inside an open transaction.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, OnConflict},
};

use crate::{
    entity::stock_entries::{
        ActiveModel as StockActive, Column as StockCol, Entity as StockEntries,
        Model as StockModel,
    },
    error::{AppError, AppResult},
    models::{Availability, AvailabilityStatus, StockEntry},
    services::catalog_service,
};

/// Quantity at or above which a product is reported as in stock.
pub const IN_STOCK_THRESHOLD: i32 = 5;

/// A missing row means nothing is stocked there.
pub async fn get_quantity<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
    region_code: &str,
) -> AppResult<i32> {
    let entry = StockEntries::find_by_id((product_id.to_string(), region_code.to_string()))
        .one(db)
        .await?;
    Ok(entry.map_or(0, |e| e.quantity))
}

/// Subtract `amount` in a single conditional UPDATE.
///
/// The `quantity >= amount` guard is evaluated by the store against the row it
/// is about to write, so two concurrent callers can never both pass it on a
/// stale value. Zero affected rows means the stock was not there.
pub async fn decrement<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
    region_code: &str,
    amount: i32,
) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::BadRequest("amount must be greater than 0".into()));
    }

    let result = StockEntries::update_many()
        .col_expr(StockCol::Quantity, Expr::col(StockCol::Quantity).sub(amount))
        .filter(StockCol::ProductId.eq(product_id))
        .filter(StockCol::RegionCode.eq(region_code))
        .filter(StockCol::Quantity.gte(amount))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        tracing::debug!(product_id, region_code, amount, "conditional decrement matched no row");
        return Err(AppError::InsufficientStock(product_id.to_string()));
    }
    Ok(())
}

/// Administrative override: set the quantity, creating the row if needed.
pub async fn upsert<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
    region_code: &str,
    quantity: i32,
) -> AppResult<StockEntry> {
    let region_code = region_code.trim();
    if region_code.is_empty() {
        return Err(AppError::BadRequest("region is required".into()));
    }
    if quantity < 0 {
        return Err(AppError::BadRequest("quantity must not be negative".into()));
    }
    catalog_service::get_product(db, product_id).await?;

    StockEntries::insert(StockActive {
        product_id: Set(product_id.to_string()),
        region_code: Set(region_code.to_string()),
        quantity: Set(quantity),
    })
    .on_conflict(
        OnConflict::columns([StockCol::ProductId, StockCol::RegionCode])
            .update_column(StockCol::Quantity)
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    Ok(StockEntry {
        product_id: product_id.to_string(),
        region_code: region_code.to_string(),
        quantity,
    })
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> AppResult<Vec<StockEntry>> {
    let rows = StockEntries::find()
        .order_by_asc(StockCol::ProductId)
        .order_by_asc(StockCol::RegionCode)
        .all(db)
        .await?
        .into_iter()
        .map(stock_from_entity)
        .collect();
    Ok(rows)
}

pub async fn availability<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
    region_code: &str,
) -> AppResult<Availability> {
    catalog_service::get_purchasable_product(db, product_id).await?;
    let quantity = get_quantity(db, product_id, region_code).await?;
    Ok(Availability {
        product_id: product_id.to_string(),
        region_code: region_code.to_string(),
        status: classify(quantity),
        quantity,
    })
}

pub fn classify(quantity: i32) -> AvailabilityStatus {
    match quantity {
        q if q >= IN_STOCK_THRESHOLD => AvailabilityStatus::InStock,
        q if q > 0 => AvailabilityStatus::LowStock,
        _ => AvailabilityStatus::OutOfStock,
    }
}

fn stock_from_entity(model: StockModel) -> StockEntry {
    StockEntry {
        product_id: model.product_id,
        region_code: model.region_code,
        quantity: model.quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_availability() {
        assert_eq!(classify(0), AvailabilityStatus::OutOfStock);
        assert_eq!(classify(1), AvailabilityStatus::LowStock);
        assert_eq!(classify(4), AvailabilityStatus::LowStock);
        assert_eq!(classify(5), AvailabilityStatus::InStock);
        assert_eq!(classify(80), AvailabilityStatus::InStock);
    }
}
