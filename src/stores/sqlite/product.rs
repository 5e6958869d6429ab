//! Implements a SQLite backed product store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, NewProduct, Product, ProductListing},
    stores::ProductStore,
};

/// Creates and retrieves products to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteProductStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteProductStore {
    /// Create a new product store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProductStore for SQLiteProductStore {
    async fn get_all(&self) -> Result<Vec<ProductListing>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT p.id, p.name, p.description, p.price, p.image_url, p.category_id,
                        c.name AS category_name
                 FROM products p
                 LEFT JOIN categories c ON p.category_id = c.id
                 ORDER BY c.name, p.name",
            )?
            .query_map([], |row| {
                Ok(ProductListing {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    price: row.get(3)?,
                    image_url: row.get(4)?,
                    category_id: row.get(5)?,
                    category_name: row.get(6)?,
                })
            })?
            .map(|maybe_product| maybe_product.map_err(Error::from))
            .collect()
    }

    async fn get_by_category(&self, category_id: DatabaseID) -> Result<Vec<Product>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, description, price, image_url, category_id
                 FROM products
                 WHERE category_id = :category_id
                 ORDER BY name",
            )?
            .query_map(&[(":category_id", &category_id)], Self::map_row)?
            .map(|maybe_product| maybe_product.map_err(Error::from))
            .collect()
    }

    async fn get(&self, product_id: DatabaseID) -> Result<Option<Product>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare(
                "SELECT id, name, description, price, image_url, category_id
                 FROM products
                 WHERE id = :id",
            )?
            .query_row(&[(":id", &product_id)], Self::map_row)
            .optional()
            .map_err(Error::from)
    }

    async fn create(&self, product: &NewProduct) -> Result<DatabaseID, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection.execute(
            "INSERT INTO products (name, description, price, category_id, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &product.name,
                &product.description,
                product.price,
                product.category_id,
                &product.image_url,
            ),
        )?;

        Ok(connection.last_insert_rowid())
    }

    async fn update(&self, product_id: DatabaseID, product: &NewProduct) -> Result<u64, Error> {
        let rows = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE products
                 SET name = ?1, description = ?2, price = ?3, category_id = ?4, image_url = ?5
                 WHERE id = ?6",
                (
                    &product.name,
                    &product.description,
                    product.price,
                    product.category_id,
                    &product.image_url,
                    product_id,
                ),
            )?;

        Ok(rows as u64)
    }

    async fn delete(&self, product_id: DatabaseID) -> Result<u64, Error> {
        let rows = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute("DELETE FROM products WHERE id = ?1", [product_id])?;

        Ok(rows as u64)
    }
}

impl CreateTable for SQLiteProductStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                price REAL NOT NULL,
                image_url TEXT NOT NULL DEFAULT '',
                category_id INTEGER NOT NULL,
                FOREIGN KEY(category_id) REFERENCES categories(id)
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteProductStore {
    type ReturnType = Product;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Self::ReturnType {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            price: row.get(offset + 3)?,
            image_url: row.get(offset + 4)?,
            category_id: row.get(offset + 5)?,
        })
    }
}

#[cfg(test)]
mod product_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{DatabaseID, NewProduct},
        stores::{CategoryStore, sqlite::SQLiteCategoryStore},
    };

    use super::{ProductStore, SQLiteProductStore};

    async fn get_test_store() -> (SQLiteProductStore, DatabaseID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let category_id = SQLiteCategoryStore::new(connection.clone())
            .create("Pizze", "")
            .await
            .unwrap();

        (SQLiteProductStore::new(connection), category_id)
    }

    fn margherita(category_id: DatabaseID) -> NewProduct {
        NewProduct {
            name: "Margherita".to_owned(),
            description: "Tomato, mozzarella, basil".to_owned(),
            price: 7.5,
            category_id,
            image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn create_and_get_product_round_trips() {
        let (store, category_id) = get_test_store().await;
        let new_product = margherita(category_id);

        let id = store.create(&new_product).await.unwrap();
        let product = store.get(id).await.unwrap().unwrap();

        assert_eq!(product.name, new_product.name);
        assert_eq!(product.description, new_product.description);
        assert_eq!(product.price, new_product.price);
        assert_eq!(product.category_id, category_id);
        assert_eq!(product.image_url, "");
    }

    #[tokio::test]
    async fn get_product_with_unknown_id_returns_none() {
        let (store, _) = get_test_store().await;

        assert_eq!(store.get(999_999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_all_joins_category_name_and_sorts() {
        let (store, category_id) = get_test_store().await;
        store
            .create(&NewProduct {
                name: "Quattro Formaggi".to_owned(),
                ..margherita(category_id)
            })
            .await
            .unwrap();
        store.create(&margherita(category_id)).await.unwrap();

        let listings = store.get_all().await.unwrap();

        let names: Vec<&str> = listings
            .iter()
            .map(|listing| listing.name.as_str())
            .collect();
        assert_eq!(names, ["Margherita", "Quattro Formaggi"]);
        assert!(
            listings
                .iter()
                .all(|listing| listing.category_name.as_deref() == Some("Pizze"))
        );
    }

    #[tokio::test]
    async fn get_by_category_only_returns_that_category() {
        let (store, category_id) = get_test_store().await;
        store.create(&margherita(category_id)).await.unwrap();

        let products = store.get_by_category(category_id).await.unwrap();
        assert_eq!(products.len(), 1);

        let other = store.get_by_category(category_id + 1).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn update_product_changes_fields() {
        let (store, category_id) = get_test_store().await;
        let id = store.create(&margherita(category_id)).await.unwrap();

        let rows = store
            .update(
                id,
                &NewProduct {
                    price: 8.0,
                    ..margherita(category_id)
                },
            )
            .await
            .unwrap();

        assert_eq!(rows, 1);
        assert_eq!(store.get(id).await.unwrap().unwrap().price, 8.0);
    }

    #[tokio::test]
    async fn update_product_with_unknown_id_is_a_noop() {
        let (store, category_id) = get_test_store().await;

        let rows = store.update(999_999, &margherita(category_id)).await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn delete_product_removes_the_row() {
        let (store, category_id) = get_test_store().await;
        let id = store.create(&margherita(category_id)).await.unwrap();

        let rows = store.delete(id).await.unwrap();

        assert_eq!(rows, 1);
        assert_eq!(store.get(id).await.unwrap(), None);
    }
}
