//! Defines the order store trait.

use async_trait::async_trait;

use crate::{
    Error,
    models::{DatabaseID, NewOrderItem, Order, OrderItem},
};

/// Creates and retrieves customer orders and their line items.
///
/// Order creation and deletion span several statements; implementations must
/// run each as a single transaction so a failure can never leave an order
/// with a partial item set or orphaned items without an order.
#[async_trait]
pub trait OrderStore {
    /// Get all orders, most recent first, without their items.
    ///
    /// Attaching items is the caller's responsibility via [Self::get_items].
    async fn get_all(&self) -> Result<Vec<Order>, Error>;

    /// Get an order by its ID, or `None` if no such order exists.
    async fn get(&self, order_id: DatabaseID) -> Result<Option<Order>, Error>;

    /// Get the line items of an order joined with their product names and
    /// descriptions, sorted by item ID.
    async fn get_items(&self, order_id: DatabaseID) -> Result<Vec<OrderItem>, Error>;

    /// Create a new order with the given line items and return its ID.
    ///
    /// The order is assigned the next order number (one more than the highest
    /// ever assigned, starting from one), status `"pending"` and the current
    /// time as both `created_at` and `updated_at`.
    async fn create(&self, total_price: f64, items: &[NewOrderItem]) -> Result<DatabaseID, Error>;

    /// Set an order's status and refresh its `updated_at` timestamp,
    /// returning the number of affected rows. An unknown `order_id` affects
    /// zero rows and is not an error.
    async fn update_status(&self, order_id: DatabaseID, status: &str) -> Result<u64, Error>;

    /// Delete an order and all of its line items, returning the number of
    /// deleted order rows.
    async fn delete(&self, order_id: DatabaseID) -> Result<u64, Error>;
}
