use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::AddToCartRequest,
        inventory::{StockList, UpsertStockRequest},
        orders::{OrderList, OrderWithLines, PlaceOrderRequest, UpdateOrderStatusRequest},
        products::ProductList,
    },
    entity::{orders::Fulfillment, products::ItemCondition},
    models::{
        Availability, AvailabilityStatus, CartLine, CartView, Order, OrderLine, PlacedOrder,
        Product, StockEntry,
    },
    response::{ApiResponse, Meta},
    routes::{admin, cart, health, orders, params, products},
    services::cart_merge::MergeOutcome,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        products::list_products,
        products::get_product,
        products::get_availability,
        cart::view_cart,
        cart::add_to_cart,
        cart::clear_cart,
        cart::remove_from_cart,
        cart::merge_cart,
        orders::place_order,
        orders::list_orders,
        orders::get_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_stock,
        admin::upsert_stock
    ),
    components(
        schemas(
            Product,
            ItemCondition,
            Fulfillment,
            Availability,
            AvailabilityStatus,
            StockEntry,
            CartLine,
            CartView,
            Order,
            OrderLine,
            PlacedOrder,
            MergeOutcome,
            AddToCartRequest,
            PlaceOrderRequest,
            UpdateOrderStatusRequest,
            UpsertStockRequest,
            ProductList,
            StockList,
            OrderList,
            OrderWithLines,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<CartView>,
            ApiResponse<PlacedOrder>,
            ApiResponse<OrderWithLines>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog and availability"),
        (name = "Cart", description = "Session cart and login merge"),
        (name = "Orders", description = "Order placement and history"),
        (name = "Admin", description = "Stock and order administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
