//! Implements a PostgreSQL backed category store.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    Error,
    models::{Category, DatabaseID},
    stores::CategoryStore,
};

/// Creates and retrieves menu categories to/from a PostgreSQL database.
#[derive(Debug, Clone)]
pub struct PostgresCategoryStore {
    pool: PgPool,
}

impl PostgresCategoryStore {
    /// Create a new category store with a PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn get_all(&self) -> Result<Vec<Category>, Error> {
        sqlx::query_as("SELECT id, name, description FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(Error::from)
    }

    async fn get(&self, category_id: DatabaseID) -> Result<Option<Category>, Error> {
        sqlx::query_as("SELECT id, name, description FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::from)
    }

    async fn create(&self, name: &str, description: &str) -> Result<DatabaseID, Error> {
        let (id,): (DatabaseID,) =
            sqlx::query_as("INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id")
                .bind(name)
                .bind(description)
                .fetch_one(&self.pool)
                .await?;

        Ok(id)
    }

    async fn update(
        &self,
        category_id: DatabaseID,
        name: &str,
        description: &str,
    ) -> Result<u64, Error> {
        let result = sqlx::query("UPDATE categories SET name = $1, description = $2 WHERE id = $3")
            .bind(name)
            .bind(description)
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, category_id: DatabaseID) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
