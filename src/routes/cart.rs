use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::{
    dto::cart::AddToCartRequest,
    error::AppResult,
    middleware::{
        auth::AuthUser,
        session::{SessionId, Shopper},
    },
    models::CartView,
    response::{ApiResponse, Meta},
    services::{cart_merge::{self, MergeOutcome}, cart_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).post(add_to_cart).delete(clear_cart))
        .route("/merge", post(merge_cart))
        .route("/{product_id}", delete(remove_from_cart))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(("x-session-id" = String, Header, description = "Session id")),
    responses(
        (status = 200, description = "Cart lines with display-only total", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    let view = cart_service::view_cart(&state, &shopper).await?;
    Ok(Json(ApiResponse::ok(view)))
}

#[utoipa::path(
    post,
    path = "/api/cart",
    params(("x-session-id" = String, Header, description = "Session id")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line added or incremented", body = ApiResponse<CartView>),
        (status = 404, description = "Unknown or inactive product"),
        (status = 409, description = "Cart limit reached"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    let view =
        cart_service::add_to_cart(&state, &shopper, &payload.product_id, payload.quantity).await?;
    Ok(Json(ApiResponse::success("Added to cart", view, None)))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    params(("x-session-id" = String, Header, description = "Session id")),
    responses(
        (status = 200, description = "All lines removed", body = ApiResponse<serde_json::Value>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    cart_service::clear(&state, &shopper).await?;
    Ok(Json(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart/{product_id}",
    params(
        ("product_id" = String, Path, description = "Product ID"),
        ("x-session-id" = String, Header, description = "Session id"),
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>),
        (status = 404, description = "Cart line not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    session: SessionId,
    user: Option<AuthUser>,
    Path(product_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let shopper = Shopper::from_parts(session, user.as_ref());
    let view = cart_service::remove_line(&state, &shopper, &product_id).await?;
    Ok(Json(ApiResponse::success("Removed from cart", view, None)))
}

#[utoipa::path(
    post,
    path = "/api/cart/merge",
    params(("x-session-id" = String, Header, description = "Pre-login session id")),
    responses(
        (status = 200, description = "Anonymous cart folded into the user's cart", body = ApiResponse<MergeOutcome>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn merge_cart(
    State(state): State<AppState>,
    session: SessionId,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MergeOutcome>>> {
    let outcome = cart_merge::merge_on_login(&state, user.user_id, &session.0).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}
