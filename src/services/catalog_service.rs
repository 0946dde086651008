use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    entity::products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    routes::params::Pagination,
    state::AppState,
};

/// Authoritative product lookup. Inactive products are still returned.
pub async fn get_product<C: ConnectionTrait>(db: &C, product_id: &str) -> AppResult<ProductModel> {
    Products::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)
}

/// Lookup for shopper-facing paths, where an inactive product does not exist.
pub async fn get_purchasable_product<C: ConnectionTrait>(
    db: &C,
    product_id: &str,
) -> AppResult<ProductModel> {
    let product = get_product(db, product_id).await?;
    if !product.active {
        return Err(AppError::NotFound);
    }
    Ok(product)
}

pub async fn list_active(state: &AppState, pagination: &Pagination) -> AppResult<(Vec<Product>, i64)> {
    let (_, limit, offset) = pagination.normalize();
    let finder = Products::find()
        .filter(ProdCol::Active.eq(true))
        .order_by_desc(ProdCol::CreatedAt)
        .order_by_asc(ProdCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    Ok((items, total))
}

pub fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        category_id: model.category_id,
        title: model.title,
        description: model.description,
        condition: model.condition,
        price: model.price,
        active: model.active,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
