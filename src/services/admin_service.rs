use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    dto::{
        inventory::{StockList, UpsertStockRequest},
        orders::{OrderList, OrderWithLines, UpdateOrderStatusRequest},
    },
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, StockEntry},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{order_service, stock_ledger},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(OrderCol::Status.eq(status.clone()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;
    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_service::order_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithLines>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = order_service::load_with_lines(state, order).await?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let order = order_service::update_status(state, id, &payload.status).await?;

    tracing::info!(
        admin_id = %user.user_id,
        order_id = %order.id,
        status = %order.status,
        "order status updated"
    );
    Ok(ApiResponse::success(
        "Order status updated",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn upsert_stock(
    state: &AppState,
    user: &AuthUser,
    payload: UpsertStockRequest,
) -> AppResult<ApiResponse<StockEntry>> {
    ensure_admin(user)?;
    let entry = stock_ledger::upsert(
        &state.orm,
        &payload.product_id,
        &payload.region,
        payload.quantity,
    )
    .await?;

    tracing::info!(
        admin_id = %user.user_id,
        product_id = %entry.product_id,
        region = %entry.region_code,
        quantity = entry.quantity,
        "stock saved"
    );
    Ok(ApiResponse::success("Stock saved", entry, Some(Meta::empty())))
}

pub async fn list_stock(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StockList>> {
    ensure_admin(user)?;
    let items = stock_ledger::list_all(&state.orm).await?;
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Inventory",
        StockList { items },
        Some(Meta::unpaged(total)),
    ))
}
