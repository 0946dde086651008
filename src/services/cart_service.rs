use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    entity::{
        cart_lines::{
            ActiveModel as CartLineActive, Column as CartLineCol, Entity as CartLines,
            Model as CartLineModel,
        },
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
    },
    error::{AppError, AppResult},
    middleware::session::Shopper,
    models::{CartLine, CartView},
    services::catalog_service,
    state::AppState,
};

/// Upper bound on units across all lines of one cart.
pub const MAX_CART_UNITS: i32 = 10;

fn cart_key(shopper: &Shopper) -> Condition {
    match shopper.user_id {
        Some(user_id) => Condition::all().add(CartCol::UserId.eq(user_id)),
        None => Condition::all()
            .add(CartCol::SessionId.eq(shopper.session_id.as_str()))
            .add(CartCol::UserId.is_null()),
    }
}

/// The cart currently addressed by this shopper, if one exists.
pub async fn find_cart<C: ConnectionTrait>(db: &C, shopper: &Shopper) -> AppResult<Option<CartModel>> {
    Ok(Carts::find().filter(cart_key(shopper)).one(db).await?)
}

/// Take the write lock on the shopper's cart by touching it.
///
/// Must be the first statement of a transaction: Postgres holds the row lock
/// until commit and SQLite takes its writer lock before any read, so two
/// transactions on the same cart never interleave. Returns `false` when the
/// shopper has no cart.
pub async fn lock_cart<C: ConnectionTrait>(db: &C, shopper: &Shopper) -> AppResult<bool> {
    let updated_at: DateTimeWithTimeZone = Utc::now().into();
    let result = Carts::update_many()
        .col_expr(CartCol::UpdatedAt, Expr::value(updated_at))
        .filter(cart_key(shopper))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

async fn ensure_cart<C: ConnectionTrait>(db: &C, shopper: &Shopper) -> AppResult<CartModel> {
    if let Some(cart) = find_cart(db, shopper).await? {
        return Ok(cart);
    }

    let now = Utc::now();
    let (session_id, user_id) = match shopper.user_id {
        Some(user_id) => (None, Some(user_id)),
        None => (Some(shopper.session_id.clone()), None),
    };
    let created = CartActive {
        id: Set(Uuid::new_v4()),
        session_id: Set(session_id),
        user_id: Set(user_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await;

    match created {
        Ok(cart) => {
            tracing::debug!(cart_id = %cart.id, session_id = %shopper.session_id, "cart created");
            Ok(cart)
        }
        // Lost a race against a concurrent first add for the same key.
        Err(err) => find_cart(db, shopper).await?.ok_or(AppError::OrmError(err)),
    }
}

/// Lines of a cart in the order they were first added.
pub async fn cart_lines<C: ConnectionTrait>(db: &C, cart_id: Uuid) -> AppResult<Vec<CartLineModel>> {
    Ok(CartLines::find()
        .filter(CartLineCol::CartId.eq(cart_id))
        .order_by_asc(CartLineCol::Position)
        .all(db)
        .await?)
}

/// How many of `requested` units fit next to `current_total` under the cap.
pub fn clamp_to_capacity(current_total: i32, requested: i32) -> AppResult<i32> {
    let remaining = MAX_CART_UNITS - current_total;
    if remaining <= 0 {
        return Err(AppError::CartFull);
    }
    Ok(requested.min(remaining))
}

pub async fn add_to_cart(
    state: &AppState,
    shopper: &Shopper,
    product_id: &str,
    quantity: i32,
) -> AppResult<CartView> {
    let quantity = quantity.max(1);
    let product = catalog_service::get_purchasable_product(&state.orm, product_id).await?;
    let cart = ensure_cart(&state.orm, shopper).await?;

    let txn = state.orm.begin().await?;

    // Serialises concurrent adds to the same cart so the cap holds.
    if !lock_cart(&txn, shopper).await? {
        return Err(AppError::NotFound);
    }

    let lines = cart_lines(&txn, cart.id).await?;
    let current_total: i32 = lines.iter().map(|l| l.quantity).sum();
    let granted = clamp_to_capacity(current_total, quantity)?;
    if granted < quantity {
        tracing::info!(
            cart_id = %cart.id,
            requested = quantity,
            granted,
            "add clamped to cart capacity"
        );
    }

    let now = Utc::now();
    match lines.iter().find(|l| l.product_id == product.id) {
        Some(existing) => {
            let new_quantity = existing.quantity + granted;
            let mut active: CartLineActive = existing.clone().into();
            active.quantity = Set(new_quantity);
            active.price_snapshot = Set(product.price);
            active.condition_snapshot = Set(product.condition);
            active.update(&txn).await?;
        }
        None => {
            let position = lines.iter().map(|l| l.position).max().unwrap_or(0) + 1;
            CartLines::insert(CartLineActive {
                cart_id: Set(cart.id),
                product_id: Set(product.id.clone()),
                quantity: Set(granted),
                price_snapshot: Set(product.price),
                condition_snapshot: Set(product.condition),
                position: Set(position),
                added_at: Set(now.into()),
            })
            .exec_without_returning(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    tracing::debug!(product_id = %product.id, quantity = granted, "cart line added");
    view_cart(state, shopper).await
}

pub async fn view_cart(state: &AppState, shopper: &Shopper) -> AppResult<CartView> {
    let Some(cart) = find_cart(&state.orm, shopper).await? else {
        return Ok(CartView::empty());
    };
    let lines = cart_lines(&state.orm, cart.id).await?;
    Ok(build_view(cart.id, lines))
}

pub async fn remove_line(state: &AppState, shopper: &Shopper, product_id: &str) -> AppResult<CartView> {
    let cart = find_cart(&state.orm, shopper)
        .await?
        .ok_or(AppError::NotFound)?;

    let result = CartLines::delete_many()
        .filter(CartLineCol::CartId.eq(cart.id))
        .filter(CartLineCol::ProductId.eq(product_id))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    view_cart(state, shopper).await
}

/// Empty the shopper's cart. The cart row itself is kept.
pub async fn clear(state: &AppState, shopper: &Shopper) -> AppResult<()> {
    if let Some(cart) = find_cart(&state.orm, shopper).await? {
        clear_lines(&state.orm, cart.id).await?;
    }
    Ok(())
}

pub async fn clear_lines<C: ConnectionTrait>(db: &C, cart_id: Uuid) -> AppResult<u64> {
    let result = CartLines::delete_many()
        .filter(CartLineCol::CartId.eq(cart_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn touch_cart<C: ConnectionTrait>(db: &C, cart: CartModel) -> AppResult<CartModel> {
    let mut active: CartActive = cart.into();
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(db).await?)
}

fn build_view(cart_id: Uuid, lines: Vec<CartLineModel>) -> CartView {
    let lines: Vec<CartLine> = lines
        .into_iter()
        .map(|line| CartLine {
            subtotal: line.price_snapshot * i64::from(line.quantity),
            product_id: line.product_id,
            quantity: line.quantity,
            price_snapshot: line.price_snapshot,
            condition_snapshot: line.condition_snapshot,
        })
        .collect();

    CartView {
        cart_id: Some(cart_id),
        total_quantity: lines.iter().map(|l| l.quantity).sum(),
        naive_total: lines.iter().map(|l| l.subtotal).sum(),
        lines,
    }
}
