//! Implements a PostgreSQL backed order store.
//!
//! The composite operations run inside a sqlx transaction, so the order
//! number read, the order insert and every item insert commit or roll back
//! as one unit.

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::{
    Error,
    models::{DatabaseID, NewOrderItem, Order, OrderItem},
    stores::OrderStore,
};

/// Creates and retrieves customer orders to/from a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Create a new order store with a PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn get_all(&self) -> Result<Vec<Order>, Error> {
        sqlx::query_as(
            "SELECT id, order_number, status, total_price, created_at, updated_at
             FROM orders
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::from)
    }

    async fn get(&self, order_id: DatabaseID) -> Result<Option<Order>, Error> {
        sqlx::query_as(
            "SELECT id, order_number, status, total_price, created_at, updated_at
             FROM orders
             WHERE id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::from)
    }

    async fn get_items(&self, order_id: DatabaseID) -> Result<Vec<OrderItem>, Error> {
        sqlx::query_as(
            "SELECT oi.id, oi.product_id, oi.quantity, oi.unit_price, p.name, p.description
             FROM order_items oi
             LEFT JOIN products p ON oi.product_id = p.id
             WHERE oi.order_id = $1
             ORDER BY oi.id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::from)
    }

    async fn create(&self, total_price: f64, items: &[NewOrderItem]) -> Result<DatabaseID, Error> {
        let mut transaction = self.pool.begin().await?;

        // Computed inside the transaction; a concurrent creation that read
        // the same maximum is rejected by the UNIQUE constraint on
        // order_number when the second one commits.
        let (order_number,): (i64,) =
            sqlx::query_as("SELECT COALESCE(MAX(order_number), 0) + 1 FROM orders")
                .fetch_one(&mut *transaction)
                .await?;

        let now = OffsetDateTime::now_utc();
        let (order_id,): (DatabaseID,) = sqlx::query_as(
            "INSERT INTO orders (order_number, status, total_price, created_at, updated_at)
             VALUES ($1, 'pending', $2, $3, $4)
             RETURNING id",
        )
        .bind(order_number)
        .bind(total_price)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *transaction)
        .await?;

        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *transaction)
            .await?;
        }

        transaction.commit().await?;

        Ok(order_id)
    }

    async fn update_status(&self, order_id: DatabaseID, status: &str) -> Result<u64, Error> {
        let result = sqlx::query("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status)
            .bind(OffsetDateTime::now_utc())
            .bind(order_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, order_id: DatabaseID) -> Result<u64, Error> {
        let mut transaction = self.pool.begin().await?;

        // Items first; the transaction makes the pair atomic.
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *transaction)
            .await?;
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(result.rows_affected())
    }
}
