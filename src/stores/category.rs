//! Defines the category store trait.

use async_trait::async_trait;

use crate::{
    Error,
    models::{Category, DatabaseID},
};

/// Creates and retrieves menu categories.
#[async_trait]
pub trait CategoryStore {
    /// Get all categories, sorted by name.
    async fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Get a category by its ID, or `None` if no such category exists.
    async fn get(&self, category_id: DatabaseID) -> Result<Option<Category>, Error>;

    /// Create a new category and return its ID.
    ///
    /// # Errors
    /// Returns [Error::Constraint] if a category named `name` already exists.
    async fn create(&self, name: &str, description: &str) -> Result<DatabaseID, Error>;

    /// Update a category's name and description, returning the number of
    /// affected rows. An unknown `category_id` affects zero rows and is not
    /// an error.
    async fn update(
        &self,
        category_id: DatabaseID,
        name: &str,
        description: &str,
    ) -> Result<u64, Error>;

    /// Delete a category, returning the number of affected rows.
    async fn delete(&self, category_id: DatabaseID) -> Result<u64, Error>;
}
