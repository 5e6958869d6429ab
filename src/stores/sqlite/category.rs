//! Implements a SQLite backed category store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Category, DatabaseID},
    stores::CategoryStore,
};

/// Creates and retrieves menu categories to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CategoryStore for SQLiteCategoryStore {
    async fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare("SELECT id, name, description FROM categories ORDER BY name")?
            .query_map([], Self::map_row)?
            .map(|maybe_category| maybe_category.map_err(Error::from))
            .collect()
    }

    async fn get(&self, category_id: DatabaseID) -> Result<Option<Category>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .prepare("SELECT id, name, description FROM categories WHERE id = :id")?
            .query_row(&[(":id", &category_id)], Self::map_row)
            .optional()
            .map_err(Error::from)
    }

    async fn create(&self, name: &str, description: &str) -> Result<DatabaseID, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection.execute(
            "INSERT INTO categories (name, description) VALUES (?1, ?2)",
            (name, description),
        )?;

        Ok(connection.last_insert_rowid())
    }

    async fn update(
        &self,
        category_id: DatabaseID,
        name: &str,
        description: &str,
    ) -> Result<u64, Error> {
        let rows = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute(
                "UPDATE categories SET name = ?1, description = ?2 WHERE id = ?3",
                (name, description, category_id),
            )?;

        Ok(rows as u64)
    }

    async fn delete(&self, category_id: DatabaseID) -> Result<u64, Error> {
        let rows = self
            .connection
            .lock()
            .map_err(|_| Error::DatabaseLock)?
            .execute("DELETE FROM categories WHERE id = ?1", [category_id])?;

        Ok(rows as u64)
    }
}

impl CreateTable for SQLiteCategoryStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT ''
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteCategoryStore {
    type ReturnType = Category;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Self::ReturnType {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
        })
    }
}

#[cfg(test)]
mod category_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{Error, db::initialize};

    use super::{CategoryStore, SQLiteCategoryStore};

    fn get_test_store() -> SQLiteCategoryStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteCategoryStore::new(Arc::new(Mutex::new(connection)))
    }

    #[tokio::test]
    async fn create_category_returns_new_id() {
        let store = get_test_store();

        let id = store.create("Antipasti", "Starters").await.unwrap();

        assert!(id > 0);
    }

    #[tokio::test]
    async fn create_category_with_duplicate_name_fails() {
        let store = get_test_store();
        store.create("Antipasti", "").await.unwrap();

        let result = store.create("Antipasti", "again").await;

        assert!(matches!(result, Err(Error::Constraint(_))));
    }

    #[tokio::test]
    async fn get_category_succeeds() {
        let store = get_test_store();
        let id = store.create("Pizze", "Wood-fired").await.unwrap();

        let category = store.get(id).await.unwrap().unwrap();

        assert_eq!(category.id, id);
        assert_eq!(category.name, "Pizze");
        assert_eq!(category.description, "Wood-fired");
    }

    #[tokio::test]
    async fn get_category_with_unknown_id_returns_none() {
        let store = get_test_store();

        let category = store.get(999_999).await.unwrap();

        assert_eq!(category, None);
    }

    #[tokio::test]
    async fn get_all_is_sorted_by_name() {
        let store = get_test_store();
        store.create("Pizze", "").await.unwrap();
        store.create("Antipasti", "").await.unwrap();
        store.create("Dolci", "").await.unwrap();

        let categories = store.get_all().await.unwrap();

        let names: Vec<&str> = categories
            .iter()
            .map(|category| category.name.as_str())
            .collect();
        assert_eq!(names, ["Antipasti", "Dolci", "Pizze"]);
    }

    #[tokio::test]
    async fn update_category_changes_fields() {
        let store = get_test_store();
        let id = store.create("Dolci", "").await.unwrap();

        let rows = store.update(id, "Desserts", "Sweet things").await.unwrap();

        assert_eq!(rows, 1);
        let category = store.get(id).await.unwrap().unwrap();
        assert_eq!(category.name, "Desserts");
        assert_eq!(category.description, "Sweet things");
    }

    #[tokio::test]
    async fn update_category_with_unknown_id_is_a_noop() {
        let store = get_test_store();

        let rows = store.update(999_999, "Ghost", "").await.unwrap();

        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn delete_category_removes_the_row() {
        let store = get_test_store();
        let id = store.create("Bevande", "").await.unwrap();

        let rows = store.delete(id).await.unwrap();

        assert_eq!(rows, 1);
        assert_eq!(store.get(id).await.unwrap(), None);
    }
}
