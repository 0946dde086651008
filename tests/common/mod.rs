#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, sea_query::Expr,
};
use storefront_orders::{
    db::{create_orm_conn, run_migrations},
    dto::orders::PlaceOrderRequest,
    entity::{
        cart_lines::{Column as CartLineCol, Entity as CartLines},
        products::{self, ActiveModel as ProductActive, ItemCondition},
    },
    services::stock_ledger,
    state::AppState,
};

pub const REGION: &str = "20742";
pub const TEST_SECRET: &str = "test-secret";

/// Fresh in-memory store with the schema applied.
///
/// The pool holds a single connection, so transactions never overlap. Tests
/// that need real contention use [`setup_shared_state`].
pub async fn setup_state() -> anyhow::Result<AppState> {
    state_for("sqlite::memory:").await
}

/// Removes the database file when the test ends.
pub struct TempDb {
    path: PathBuf,
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

/// File-backed store whose pool hands out several connections at once.
pub async fn setup_shared_state() -> anyhow::Result<(AppState, TempDb)> {
    let path = std::env::temp_dir().join(format!("storefront-{}.db", uuid::Uuid::new_v4()));
    let guard = TempDb { path: path.clone() };
    let state = state_for(&format!("sqlite://{}?mode=rwc", path.display())).await?;
    Ok((state, guard))
}

async fn state_for(url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(url).await?;
    run_migrations(&orm).await?;
    Ok(AppState {
        orm,
        jwt_secret: Arc::from(TEST_SECRET),
    })
}

pub async fn create_product(state: &AppState, id: &str, price: i64) -> anyhow::Result<()> {
    create_product_with(state, id, price, ItemCondition::SecondHand, true).await
}

pub async fn create_product_with(
    state: &AppState,
    id: &str,
    price: i64,
    condition: ItemCondition,
    active: bool,
) -> anyhow::Result<()> {
    ProductActive {
        id: Set(id.to_string()),
        category_id: Set("retro-consoles".into()),
        title: Set(format!("Product {id}")),
        description: Set(None),
        condition: Set(condition),
        price: Set(price),
        active: Set(active),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(())
}

/// Admin-side price change.
pub async fn set_price(state: &AppState, id: &str, price: i64) -> anyhow::Result<()> {
    products::Entity::update_many()
        .col_expr(products::Column::Price, Expr::value(price))
        .filter(products::Column::Id.eq(id))
        .exec(&state.orm)
        .await?;
    Ok(())
}

pub async fn set_stock(state: &AppState, id: &str, region: &str, qty: i32) -> anyhow::Result<()> {
    stock_ledger::upsert(&state.orm, id, region, qty).await?;
    Ok(())
}

pub async fn stock_of(state: &AppState, id: &str, region: &str) -> anyhow::Result<i32> {
    Ok(stock_ledger::get_quantity(&state.orm, id, region).await?)
}

/// Simulates a forged snapshot written straight into the cart store.
pub async fn forge_snapshot(state: &AppState, product_id: &str, price: i64) -> anyhow::Result<()> {
    CartLines::update_many()
        .col_expr(CartLineCol::PriceSnapshot, Expr::value(price))
        .filter(CartLineCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;
    Ok(())
}

pub fn place_request(region: &str) -> PlaceOrderRequest {
    PlaceOrderRequest {
        region: region.to_string(),
        fulfillment: Some("delivery".into()),
        name: "Tester".into(),
        email: "t@example.com".into(),
    }
}
