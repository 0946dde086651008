use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderList, OrderWithLines, PlaceOrderRequest},
    error::AppResult,
    middleware::{
        auth::AuthUser,
        session::{SessionId, Shopper},
    },
    models::PlacedOrder,
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(place_order))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    params(("x-session-id" = String, Header, description = "Session id")),
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed at current catalog prices", body = ApiResponse<PlacedOrder>),
        (status = 400, description = "Missing region or contact"),
        (status = 409, description = "Could not place order"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<ApiResponse<PlacedOrder>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    let placed = order_service::place_order(&state, &shopper, payload).await?;
    Ok(Json(ApiResponse::success(
        "Order placed",
        placed,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(("x-session-id" = String, Header, description = "Session id")),
    responses(
        (status = 200, description = "Orders of the current user or session", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    let items = order_service::order_history(&state, &shopper).await?;
    let total = items.len() as i64;
    Ok(Json(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::unpaged(total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID"),
        ("x-session-id" = String, Header, description = "Session id"),
    ),
    responses(
        (status = 200, description = "Order with its priced lines", body = ApiResponse<OrderWithLines>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    let data = order_service::get_order(&state, &shopper, id).await?;
    Ok(Json(ApiResponse::ok(data)))
}
