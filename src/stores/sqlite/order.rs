//! Implements a SQLite backed order store.
//!
//! Order creation and deletion span several statements and run inside a
//! transaction: the order number read, the order insert and every item
//! insert commit or roll back as one unit.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewOrderItem, Order, OrderItem},
    stores::OrderStore,
};

/// Creates and retrieves customer orders to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteOrderStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteOrderStore {
    /// Create a new order store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl OrderStore for SQLiteOrderStore {
    async fn get_all(&self) -> Result<Vec<Order>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, order_number, status, total_price, created_at, updated_at
                 FROM orders
                 ORDER BY created_at DESC",
            )?
            .query_map([], Self::map_row)?
            .map(|maybe_order| maybe_order.map_err(Error::from))
            .collect()
    }

    async fn get(&self, order_id: DatabaseID) -> Result<Option<Order>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, order_number, status, total_price, created_at, updated_at
                 FROM orders
                 WHERE id = :id",
            )?
            .query_row(&[(":id", &order_id)], Self::map_row)
            .optional()
            .map_err(Error::from)
    }

    async fn get_items(&self, order_id: DatabaseID) -> Result<Vec<OrderItem>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT oi.id, oi.product_id, oi.quantity, oi.unit_price, p.name, p.description
                 FROM order_items oi
                 LEFT JOIN products p ON oi.product_id = p.id
                 WHERE oi.order_id = :order_id
                 ORDER BY oi.id",
            )?
            .query_map(&[(":order_id", &order_id)], |row| {
                Ok(OrderItem {
                    id: row.get(0)?,
                    product_id: row.get(1)?,
                    quantity: row.get(2)?,
                    unit_price: row.get(3)?,
                    name: row.get(4)?,
                    description: row.get(5)?,
                })
            })?
            .map(|maybe_item| maybe_item.map_err(Error::from))
            .collect()
    }

    async fn create(&self, total_price: f64, items: &[NewOrderItem]) -> Result<DatabaseID, Error> {
        let mut connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let transaction = connection.transaction()?;

        // Computed inside the transaction so concurrent creations cannot
        // observe the same maximum. Numbers are never reused: the maximum
        // only grows while any order exists.
        let order_number: i64 = transaction.query_row(
            "SELECT COALESCE(MAX(order_number), 0) + 1 FROM orders",
            [],
            |row| row.get(0),
        )?;

        let now = OffsetDateTime::now_utc();
        transaction.execute(
            "INSERT INTO orders (order_number, status, total_price, created_at, updated_at)
             VALUES (?1, 'pending', ?2, ?3, ?4)",
            (order_number, total_price, now, now),
        )?;
        let order_id = transaction.last_insert_rowid();

        for item in items {
            transaction.execute(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
                 VALUES (?1, ?2, ?3, ?4)",
                (order_id, item.product_id, item.quantity, item.unit_price),
            )?;
        }

        transaction.commit()?;

        Ok(order_id)
    }

    async fn update_status(&self, order_id: DatabaseID, status: &str) -> Result<u64, Error> {
        let rows = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
                (status, OffsetDateTime::now_utc(), order_id),
            )?;

        Ok(rows as u64)
    }

    async fn delete(&self, order_id: DatabaseID) -> Result<u64, Error> {
        let mut connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;
        let transaction = connection.transaction()?;

        // Items first: an order row must never outlive losing its items
        // half-way, and the transaction makes the pair atomic.
        transaction.execute("DELETE FROM order_items WHERE order_id = ?1", [order_id])?;
        let rows = transaction.execute("DELETE FROM orders WHERE id = ?1", [order_id])?;

        transaction.commit()?;

        Ok(rows as u64)
    }
}

impl CreateTable for SQLiteOrderStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS orders (
                id INTEGER PRIMARY KEY,
                order_number INTEGER NOT NULL UNIQUE,
                status TEXT NOT NULL DEFAULT 'pending',
                total_price REAL NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            (),
        )?;

        connection.execute(
            "CREATE TABLE IF NOT EXISTS order_items (
                id INTEGER PRIMARY KEY,
                order_id INTEGER NOT NULL,
                product_id INTEGER NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1,
                unit_price REAL NOT NULL,
                FOREIGN KEY(order_id) REFERENCES orders(id),
                FOREIGN KEY(product_id) REFERENCES products(id)
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteOrderStore {
    type ReturnType = Order;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Self::ReturnType {
            id: row.get(offset)?,
            order_number: row.get(offset + 1)?,
            status: row.get(offset + 2)?,
            total_price: row.get(offset + 3)?,
            created_at: row.get(offset + 4)?,
            updated_at: row.get(offset + 5)?,
        })
    }
}

#[cfg(test)]
mod order_tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{DatabaseID, NewOrderItem},
        stores::{ProductStore, sqlite::SQLiteProductStore},
    };

    use super::{OrderStore, SQLiteOrderStore};

    async fn get_test_store() -> (SQLiteOrderStore, DatabaseID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let product_id = SQLiteProductStore::new(connection.clone())
            .create(&crate::models::NewProduct {
                name: "Margherita".to_owned(),
                description: "Tomato, mozzarella, basil".to_owned(),
                price: 7.5,
                category_id: 1,
                image_url: String::new(),
            })
            .await
            .unwrap();

        (SQLiteOrderStore::new(connection), product_id)
    }

    fn two_margherite(product_id: DatabaseID) -> Vec<NewOrderItem> {
        vec![NewOrderItem {
            product_id,
            quantity: 2,
            unit_price: 7.5,
        }]
    }

    #[tokio::test]
    async fn create_order_starts_pending_with_order_number_one() {
        let (store, product_id) = get_test_store().await;

        let id = store.create(15.0, &two_margherite(product_id)).await.unwrap();
        let order = store.get(id).await.unwrap().unwrap();

        assert_eq!(order.order_number, 1);
        assert_eq!(order.status, "pending");
        assert_eq!(order.total_price, 15.0);
        assert_eq!(order.created_at, order.updated_at);
    }

    #[tokio::test]
    async fn order_numbers_increase_and_are_never_reused() {
        let (store, product_id) = get_test_store().await;
        let items = two_margherite(product_id);

        let first = store.create(15.0, &items).await.unwrap();
        let second = store.create(15.0, &items).await.unwrap();
        let third = store.create(15.0, &items).await.unwrap();

        assert_eq!(store.get(first).await.unwrap().unwrap().order_number, 1);
        assert_eq!(store.get(second).await.unwrap().unwrap().order_number, 2);
        assert_eq!(store.get(third).await.unwrap().unwrap().order_number, 3);

        // Deleting an order must not free its number for reuse.
        store.delete(second).await.unwrap();
        let fourth = store.create(15.0, &items).await.unwrap();

        assert_eq!(store.get(fourth).await.unwrap().unwrap().order_number, 4);
    }

    #[tokio::test]
    async fn get_items_joins_product_fields() {
        let (store, product_id) = get_test_store().await;
        let id = store.create(15.0, &two_margherite(product_id)).await.unwrap();

        let items = store.get_items(id).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, product_id);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].unit_price, 7.5);
        assert_eq!(items[0].name.as_deref(), Some("Margherita"));
        assert_eq!(
            items[0].description.as_deref(),
            Some("Tomato, mozzarella, basil")
        );
    }

    #[tokio::test]
    async fn get_all_returns_most_recent_first() {
        let (store, product_id) = get_test_store().await;
        let items = two_margherite(product_id);

        let first = store.create(15.0, &items).await.unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let second = store.create(22.5, &items).await.unwrap();

        let orders = store.get_all().await.unwrap();

        let ids: Vec<DatabaseID> = orders.iter().map(|order| order.id).collect();
        assert_eq!(ids, [second, first]);
    }

    #[tokio::test]
    async fn get_order_with_unknown_id_returns_none() {
        let (store, _) = get_test_store().await;

        assert_eq!(store.get(999_999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_status_refreshes_updated_at() {
        let (store, product_id) = get_test_store().await;
        let id = store.create(15.0, &two_margherite(product_id)).await.unwrap();
        let before = store.get(id).await.unwrap().unwrap();

        std::thread::sleep(Duration::from_millis(5));
        let rows = store.update_status(id, "completed").await.unwrap();

        assert_eq!(rows, 1);
        let after = store.get(id).await.unwrap().unwrap();
        assert_eq!(after.status, "completed");
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn update_status_with_unknown_id_is_a_noop() {
        let (store, _) = get_test_store().await;

        let rows = store.update_status(999_999, "completed").await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn delete_order_also_deletes_its_items() {
        let (store, product_id) = get_test_store().await;
        let id = store.create(15.0, &two_margherite(product_id)).await.unwrap();

        let rows = store.delete(id).await.unwrap();

        assert_eq!(rows, 1);
        assert_eq!(store.get(id).await.unwrap(), None);
        assert_eq!(store.get_items(id).await.unwrap(), []);
    }
}
