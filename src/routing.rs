//! Application router configuration.

use axum::{
    Json, Router,
    routing::{get, put},
};
use serde_json::json;

use crate::{
    AppState, category, endpoints, order, product,
    stores::{CategoryStore, OrderStore, ProductStore},
};

/// Return a router with all the app's routes, backed by the stores in
/// `state`.
pub fn build_router<C, P, O>(state: AppState<C, P, O>) -> Router
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: ProductStore + Clone + Send + Sync + 'static,
    O: OrderStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::CATEGORIES,
            get(category::get_categories::<C>).post(category::create_category::<C>),
        )
        .route(
            endpoints::CATEGORY,
            get(category::get_category::<C>)
                .put(category::update_category::<C>)
                .delete(category::delete_category::<C>),
        )
        .route(
            endpoints::PRODUCTS,
            get(product::get_products::<P>).post(product::create_product::<P>),
        )
        .route(
            endpoints::PRODUCTS_BY_CATEGORY,
            get(product::get_products_by_category::<P>),
        )
        .route(
            endpoints::PRODUCT,
            get(product::get_product::<P>)
                .put(product::update_product::<P>)
                .delete(product::delete_product::<P>),
        )
        .route(
            endpoints::ORDERS,
            get(order::get_orders::<O>).post(order::create_order::<O>),
        )
        .route(endpoints::ORDER_STATUS, put(order::update_order_status::<O>))
        .route(
            endpoints::ORDER,
            get(order::get_order::<O>).delete(order::delete_order::<O>),
        )
        .with_state(state)
}

/// A route handler reporting that the server is up.
async fn get_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
