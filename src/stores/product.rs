//! Defines the product store trait.

use async_trait::async_trait;

use crate::{
    Error,
    models::{DatabaseID, NewProduct, Product, ProductListing},
};

/// Creates and retrieves the products on the menu.
#[async_trait]
pub trait ProductStore {
    /// Get all products joined with their category names, sorted by category
    /// name and then product name.
    async fn get_all(&self) -> Result<Vec<ProductListing>, Error>;

    /// Get the products of one category, sorted by name.
    async fn get_by_category(&self, category_id: DatabaseID) -> Result<Vec<Product>, Error>;

    /// Get a product by its ID, or `None` if no such product exists.
    async fn get(&self, product_id: DatabaseID) -> Result<Option<Product>, Error>;

    /// Create a new product and return its ID.
    async fn create(&self, product: &NewProduct) -> Result<DatabaseID, Error>;

    /// Update a product, returning the number of affected rows. An unknown
    /// `product_id` affects zero rows and is not an error.
    async fn update(&self, product_id: DatabaseID, product: &NewProduct) -> Result<u64, Error>;

    /// Delete a product, returning the number of affected rows.
    async fn delete(&self, product_id: DatabaseID) -> Result<u64, Error>;
}
