use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderWithLines, PlaceOrderRequest},
    entity::{
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Fulfillment,
            Model as OrderModel, STATUS_PLACED,
        },
        order_lines::{
            ActiveModel as OrderLineActive, Column as OrderLineCol, Entity as OrderLines,
            Model as OrderLineModel,
        },
        products::ItemCondition,
    },
    error::{AppError, AppResult},
    middleware::session::Shopper,
    models::{Order, OrderLine, PlacedOrder},
    services::{cart_service, catalog_service, stock_ledger},
    state::AppState,
};

/// A cart line after repricing against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: String,
    pub quantity: i32,
    pub price: i64,
    pub condition: ItemCondition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

/// Checked placement input.
#[derive(Debug, Clone)]
struct Placement {
    region_code: String,
    fulfillment: Fulfillment,
    contact: Contact,
}

fn validate(request: PlaceOrderRequest) -> AppResult<Placement> {
    let region_code = request.region.trim().to_string();
    if region_code.is_empty() {
        return Err(AppError::BadRequest("region is required".into()));
    }
    let name = request.name.trim().to_string();
    let email = request.email.trim().to_string();
    if name.is_empty() || email.is_empty() {
        return Err(AppError::BadRequest("contact name and email are required".into()));
    }
    let fulfillment = request
        .fulfillment
        .as_deref()
        .map_or(Fulfillment::Delivery, Fulfillment::parse_or_default);

    Ok(Placement {
        region_code,
        fulfillment,
        contact: Contact { name, email },
    })
}

/// Convert the shopper's cart into an immutable order.
///
/// Everything after validation runs in one transaction: if any line cannot be
/// reserved, the decrements already applied for earlier lines are rolled back
/// together with the order rows.
pub async fn place_order(
    state: &AppState,
    shopper: &Shopper,
    request: PlaceOrderRequest,
) -> AppResult<PlacedOrder> {
    let placement = validate(request)?;

    let txn = state.orm.begin().await?;
    match place_within(&txn, shopper, &placement).await {
        Ok(placed) => {
            txn.commit().await?;
            if placed.server_total != placed.client_total {
                tracing::warn!(
                    order_id = %placed.order_id,
                    server_total = placed.server_total,
                    client_total = placed.client_total,
                    "cart snapshot total differs from charged total"
                );
            }
            tracing::info!(
                order_id = %placed.order_id,
                session_id = %shopper.session_id,
                region = %placement.region_code,
                total = placed.server_total,
                "order placed"
            );
            Ok(placed)
        }
        Err(err) => {
            tracing::warn!(
                session_id = %shopper.session_id,
                region = %placement.region_code,
                error = %err,
                "order placement aborted"
            );
            txn.rollback().await?;
            Err(err)
        }
    }
}

async fn place_within(
    txn: &DatabaseTransaction,
    shopper: &Shopper,
    placement: &Placement,
) -> AppResult<PlacedOrder> {
    // A second submit of the same cart waits here until the first commits.
    if !cart_service::lock_cart(txn, shopper).await? {
        return Err(AppError::EmptyCart);
    }
    let cart = cart_service::find_cart(txn, shopper)
        .await?
        .ok_or(AppError::EmptyCart)?;
    let lines = cart_service::cart_lines(txn, cart.id).await?;
    if lines.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let mut priced = Vec::with_capacity(lines.len());
    let mut server_total: i64 = 0;
    let mut client_total: i64 = 0;
    for line in &lines {
        let available = stock_ledger::get_quantity(txn, &line.product_id, &placement.region_code).await?;
        if available < line.quantity {
            return Err(AppError::InsufficientStock(line.product_id.clone()));
        }

        let product = catalog_service::get_product(txn, &line.product_id).await?;
        let quantity = i64::from(line.quantity);
        client_total += line.price_snapshot * quantity;
        server_total += product.price * quantity;
        priced.push(PricedLine {
            product_id: product.id,
            quantity: line.quantity,
            price: product.price,
            condition: product.condition,
        });
    }

    reserve_stock(txn, &placement.region_code, &priced).await?;

    let order_id = Uuid::new_v4();
    OrderActive {
        id: Set(order_id),
        session_id: Set(shopper.session_id.clone()),
        user_id: Set(shopper.user_id),
        region_code: Set(placement.region_code.clone()),
        fulfillment: Set(placement.fulfillment),
        customer_name: Set(placement.contact.name.clone()),
        customer_email: Set(placement.contact.email.clone()),
        total: Set(server_total),
        status: Set(STATUS_PLACED.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?;

    for line in &priced {
        OrderLines::insert(OrderLineActive {
            order_id: Set(order_id),
            product_id: Set(line.product_id.clone()),
            quantity: Set(line.quantity),
            price: Set(line.price),
            condition: Set(line.condition),
        })
        .exec_without_returning(txn)
        .await?;
    }

    cart_service::clear_lines(txn, cart.id).await?;

    Ok(PlacedOrder {
        order_id,
        server_total,
        client_total,
    })
}

/// Apply one conditional decrement per line, stopping at the first shortfall.
///
/// Lines decremented before the failure stay decremented on `db`; callers that
/// need all-or-nothing must pass a transaction and roll it back.
pub async fn reserve_stock<C: ConnectionTrait>(
    db: &C,
    region_code: &str,
    lines: &[PricedLine],
) -> AppResult<()> {
    for line in lines {
        stock_ledger::decrement(db, &line.product_id, region_code, line.quantity).await?;
    }
    Ok(())
}

/// Fetch an order for the session that placed it or the user that owns it.
///
/// Anyone else gets `NotFound` so order ids cannot be probed.
pub async fn get_order(state: &AppState, shopper: &Shopper, id: Uuid) -> AppResult<OrderWithLines> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let same_session = order.session_id == shopper.session_id;
    let same_user = order.user_id.is_some() && order.user_id == shopper.user_id;
    if !same_session && !same_user {
        tracing::warn!(order_id = %id, session_id = %shopper.session_id, "order access denied");
        return Err(AppError::NotFound);
    }

    load_with_lines(state, order).await
}

pub async fn load_with_lines(state: &AppState, order: OrderModel) -> AppResult<OrderWithLines> {
    let lines = OrderLines::find()
        .filter(OrderLineCol::OrderId.eq(order.id))
        .order_by_asc(OrderLineCol::ProductId)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_line_from_entity)
        .collect();

    Ok(OrderWithLines {
        order: order_from_entity(order),
        lines,
    })
}

/// Orders owned by the user; falls back to orders placed from this session.
pub async fn order_history(state: &AppState, shopper: &Shopper) -> AppResult<Vec<Order>> {
    if let Some(user_id) = shopper.user_id {
        let owned = Orders::find()
            .filter(OrderCol::UserId.eq(user_id))
            .order_by_desc(OrderCol::CreatedAt)
            .all(&state.orm)
            .await?;
        if !owned.is_empty() {
            return Ok(owned.into_iter().map(order_from_entity).collect());
        }
    }

    let by_session = Orders::find()
        .filter(OrderCol::SessionId.eq(shopper.session_id.as_str()))
        .order_by_desc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;
    Ok(by_session.into_iter().map(order_from_entity).collect())
}

/// The only mutation an order accepts after placement.
pub async fn update_status(state: &AppState, id: Uuid, status: &str) -> AppResult<Order> {
    let status = status.trim();
    if status.is_empty() {
        return Err(AppError::BadRequest("status is required".into()));
    }

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(status.to_string());
    let order = active.update(&state.orm).await?;
    Ok(order_from_entity(order))
}

pub fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        session_id: model.session_id,
        user_id: model.user_id,
        region_code: model.region_code,
        fulfillment: model.fulfillment,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        total: model.total,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn order_line_from_entity(model: OrderLineModel) -> OrderLine {
    OrderLine {
        subtotal: model.price * i64::from(model.quantity),
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        condition: model.condition,
    }
}
