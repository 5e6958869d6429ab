//! The order endpoints: listing, fetching, creating, updating the status of
//! and deleting customer orders.
//!
//! The store returns orders without their line items; the handlers here
//! attach them with one item query per order. At this scale the extra round
//! trips are cheaper than maintaining a batched join.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    error::ApiError,
    models::{DatabaseID, NewOrderItem, Order, OrderItem},
    state::OrderState,
    stores::OrderStore,
};

/// The fields accepted when creating an order.
#[derive(Debug, Deserialize)]
pub struct OrderData {
    items: Option<Vec<NewOrderItem>>,
    total_price: Option<f64>,
}

/// The fields accepted when updating an order's status.
#[derive(Debug, Deserialize)]
pub struct OrderStatusData {
    status: Option<String>,
}

/// An order with its line items attached, as served by the order read
/// endpoints.
#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    /// The order fields, flattened into the top-level object.
    #[serde(flatten)]
    pub order: Order,
    /// The order's line items.
    pub items: Vec<OrderItem>,
}

/// A route handler for listing all orders, most recent first, each with its
/// line items attached.
pub async fn get_orders<O>(
    State(state): State<OrderState<O>>,
) -> Result<Json<Vec<OrderWithItems>>, ApiError>
where
    O: OrderStore + Clone + Send + Sync + 'static,
{
    let orders = state
        .order_store
        .get_all()
        .await
        .map_err(|error| ApiError::store("getting orders", error))?;

    let mut orders_with_items = Vec::with_capacity(orders.len());
    for order in orders {
        let items = state
            .order_store
            .get_items(order.id)
            .await
            .map_err(|error| ApiError::store("getting order items", error))?;
        orders_with_items.push(OrderWithItems { order, items });
    }

    Ok(Json(orders_with_items))
}

/// A route handler for getting an order by its database ID, with its line
/// items attached.
pub async fn get_order<O>(
    State(state): State<OrderState<O>>,
    Path(order_id): Path<DatabaseID>,
) -> Result<Json<OrderWithItems>, ApiError>
where
    O: OrderStore + Clone + Send + Sync + 'static,
{
    let order = state
        .order_store
        .get(order_id)
        .await
        .map_err(|error| ApiError::store("getting order", error))?
        .ok_or(ApiError::NotFound("Order not found"))?;

    let items = state
        .order_store
        .get_items(order_id)
        .await
        .map_err(|error| ApiError::store("getting order items", error))?;

    Ok(Json(OrderWithItems { order, items }))
}

/// A route handler for creating a new order with its line items.
pub async fn create_order<O>(
    State(state): State<OrderState<O>>,
    Json(data): Json<OrderData>,
) -> Result<Response, ApiError>
where
    O: OrderStore + Clone + Send + Sync + 'static,
{
    let (Some(items), Some(total_price)) = (data.items, data.total_price) else {
        return Err(ApiError::Validation(
            "Missing required fields: items, total_price".to_owned(),
        ));
    };

    let id = state
        .order_store
        .create(total_price, &items)
        .await
        .map_err(|error| ApiError::store("creating order", error))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Order created successfully" })),
    )
        .into_response())
}

/// A route handler for updating the status of an order.
///
/// Any status string is accepted; an unknown `order_id` is a no-op, not an
/// error.
pub async fn update_order_status<O>(
    State(state): State<OrderState<O>>,
    Path(order_id): Path<DatabaseID>,
    Json(data): Json<OrderStatusData>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    O: OrderStore + Clone + Send + Sync + 'static,
{
    let Some(status) = data.status else {
        return Err(ApiError::Validation(
            "Missing required field: status".to_owned(),
        ));
    };

    state
        .order_store
        .update_status(order_id, &status)
        .await
        .map_err(|error| ApiError::store("updating order status", error))?;

    Ok(Json(json!({ "message": "Order status updated successfully" })))
}

/// A route handler for deleting an order and all of its line items.
pub async fn delete_order<O>(
    State(state): State<OrderState<O>>,
    Path(order_id): Path<DatabaseID>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    O: OrderStore + Clone + Send + Sync + 'static,
{
    state
        .order_store
        .delete(order_id)
        .await
        .map_err(|error| ApiError::store("deleting order", error))?;

    Ok(Json(json!({ "message": "Order deleted successfully" })))
}

#[cfg(test)]
mod order_endpoint_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{build_router, models::DatabaseID, stores::sqlite::create_app_state};

    fn get_test_server() -> TestServer {
        let connection = Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(connection).expect("Could not initialize database.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    /// Set up a category and a product, returning the product's ID.
    async fn create_menu(server: &TestServer) -> DatabaseID {
        let category_id = server
            .post("/categories")
            .content_type("application/json")
            .json(&json!({ "name": "Pizze" }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap();

        server
            .post("/products")
            .content_type("application/json")
            .json(&json!({ "name": "Margherita", "price": 7.5, "category_id": category_id }))
            .await
            .json::<Value>()["id"]
            .as_i64()
            .unwrap()
    }

    async fn create_order(server: &TestServer, product_id: DatabaseID) -> DatabaseID {
        let response = server
            .post("/orders")
            .content_type("application/json")
            .json(&json!({
                "items": [{ "product_id": product_id, "quantity": 2, "unit_price": 7.5 }],
                "total_price": 15.0,
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_pending_order_with_items() {
        let server = get_test_server();
        let product_id = create_menu(&server).await;
        let order_id = create_order(&server, product_id).await;

        let response = server.get(&format!("/orders/{order_id}")).await;

        response.assert_status_ok();
        let order = response.json::<Value>();
        assert_eq!(order["status"], "pending");
        assert_eq!(order["total_price"], 15.0);
        assert_eq!(order["order_number"], 1);

        let items = order["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["quantity"], 2);
        assert_eq!(items[0]["unit_price"], 7.5);
        assert_eq!(items[0]["name"], "Margherita");
    }

    #[tokio::test]
    async fn create_with_missing_fields_returns_400() {
        let server = get_test_server();

        let response = server
            .post("/orders")
            .content_type("application/json")
            .json(&json!({ "total_price": 15.0 }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "Missing required fields: items, total_price"
        );
    }

    #[tokio::test]
    async fn get_with_unknown_id_returns_404() {
        let server = get_test_server();

        let response = server.get("/orders/999999").await;

        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"], "Order not found");
    }

    #[tokio::test]
    async fn list_attaches_items_to_every_order() {
        let server = get_test_server();
        let product_id = create_menu(&server).await;
        create_order(&server, product_id).await;
        create_order(&server, product_id).await;

        let response = server.get("/orders").await;

        response.assert_status_ok();
        let orders = response.json::<Value>();
        let orders = orders.as_array().unwrap();
        assert_eq!(orders.len(), 2);
        assert!(
            orders
                .iter()
                .all(|order| order["items"].as_array().unwrap().len() == 1)
        );
    }

    #[tokio::test]
    async fn update_status_changes_status_and_updated_at() {
        let server = get_test_server();
        let product_id = create_menu(&server).await;
        let order_id = create_order(&server, product_id).await;
        let before = server.get(&format!("/orders/{order_id}")).await.json::<Value>();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let response = server
            .put(&format!("/orders/{order_id}/status"))
            .content_type("application/json")
            .json(&json!({ "status": "completed" }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            "Order status updated successfully"
        );

        let after = server.get(&format!("/orders/{order_id}")).await.json::<Value>();
        assert_eq!(after["status"], "completed");
        assert!(
            after["updated_at"].as_str().unwrap() > before["updated_at"].as_str().unwrap(),
            "updated_at should advance on a status change"
        );
    }

    #[tokio::test]
    async fn update_status_without_status_returns_400() {
        let server = get_test_server();

        let response = server
            .put("/orders/1/status")
            .content_type("application/json")
            .json(&json!({}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"],
            "Missing required field: status"
        );
    }

    #[tokio::test]
    async fn delete_removes_the_order_and_its_items() {
        let server = get_test_server();
        let product_id = create_menu(&server).await;
        let order_id = create_order(&server, product_id).await;

        let response = server.delete(&format!("/orders/{order_id}")).await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>()["message"],
            "Order deleted successfully"
        );
        server
            .get(&format!("/orders/{order_id}"))
            .await
            .assert_status_not_found();

        let orders = server.get("/orders").await.json::<Value>();
        assert!(orders.as_array().unwrap().is_empty());
    }
}
