//! Implements a PostgreSQL backed product store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    Error,
    models::{DatabaseID, NewProduct, Product, ProductListing},
    stores::ProductStore,
};

/// Creates and retrieves products to/from a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Create a new product store with a PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn get_all(&self) -> Result<Vec<ProductListing>, Error> {
        sqlx::query_as(
            "SELECT p.id, p.name, p.description, p.price, p.image_url, p.category_id,
                    c.name AS category_name
             FROM products p
             LEFT JOIN categories c ON p.category_id = c.id
             ORDER BY c.name, p.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::from)
    }

    async fn get_by_category(&self, category_id: DatabaseID) -> Result<Vec<Product>, Error> {
        sqlx::query_as(
            "SELECT id, name, description, price, image_url, category_id
             FROM products
             WHERE category_id = $1
             ORDER BY name",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::from)
    }

    async fn get(&self, product_id: DatabaseID) -> Result<Option<Product>, Error> {
        sqlx::query_as(
            "SELECT id, name, description, price, image_url, category_id
             FROM products
             WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::from)
    }

    async fn create(&self, product: &NewProduct) -> Result<DatabaseID, Error> {
        let (id,): (DatabaseID,) = sqlx::query_as(
            "INSERT INTO products (name, description, price, category_id, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category_id)
        .bind(&product.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, product_id: DatabaseID, product: &NewProduct) -> Result<u64, Error> {
        let result = sqlx::query(
            "UPDATE products
             SET name = $1, description = $2, price = $3, category_id = $4, image_url = $5
             WHERE id = $6",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.category_id)
        .bind(&product.image_url)
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, product_id: DatabaseID) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
