use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::products::{AvailabilityQuery, ProductList},
    error::AppResult,
    models::{Availability, Product},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{catalog_service, stock_ledger},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
        .route("/{id}/availability", get(get_availability))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List active products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let (page, limit, _) = pagination.normalize();
    let (items, total) = catalog_service::list_active(&state, &pagination).await?;
    Ok(Json(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(Meta::new(page, limit, total)),
    )))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<Product>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let product = catalog_service::get_purchasable_product(&state.orm, &id).await?;
    Ok(Json(ApiResponse::ok(catalog_service::product_from_entity(
        product,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/availability",
    params(
        ("id" = String, Path, description = "Product ID"),
        ("region" = String, Query, description = "Region code"),
    ),
    responses(
        (status = 200, description = "Stock status in a region", body = ApiResponse<Availability>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Products"
)]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<ApiResponse<Availability>>> {
    let availability = stock_ledger::availability(&state.orm, &id, query.region.trim()).await?;
    Ok(Json(ApiResponse::ok(availability)))
}
