//! The domain types stored and served by the API: menu categories, products
//! and customer orders with their line items.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

/// A menu category, e.g. 'Antipasti', 'Pizze', 'Dolci'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The name of the category. Unique across all categories.
    pub name: String,
    /// An optional free-text description, empty when not provided.
    pub description: String,
}

/// An item on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    /// The ID of the product.
    pub id: DatabaseID,
    /// The display name of the product.
    pub name: String,
    /// A free-text description, empty when not provided.
    pub description: String,
    /// The unit price.
    pub price: f64,
    /// A URL for the product image, empty when not provided.
    pub image_url: String,
    /// The ID of the category this product belongs to.
    pub category_id: DatabaseID,
}

/// A product row joined with the name of its category.
///
/// Only the list-all operation performs the join, so this type is separate
/// from [Product]: single-product reads and per-category listings carry no
/// `category_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductListing {
    /// The ID of the product.
    pub id: DatabaseID,
    /// The display name of the product.
    pub name: String,
    /// A free-text description, empty when not provided.
    pub description: String,
    /// The unit price.
    pub price: f64,
    /// A URL for the product image, empty when not provided.
    pub image_url: String,
    /// The ID of the category this product belongs to.
    pub category_id: DatabaseID,
    /// The name of the category, or null if the category row is missing.
    pub category_name: Option<String>,
}

/// The fields needed to create or update a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    /// The display name of the product.
    pub name: String,
    /// A free-text description.
    pub description: String,
    /// The unit price.
    pub price: f64,
    /// The ID of the category this product belongs to.
    pub category_id: DatabaseID,
    /// A URL for the product image.
    pub image_url: String,
}

/// A customer order.
///
/// The `order_number` is assigned by the application and strictly increases
/// across all orders ever created; it is distinct from the database row `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// The ID of the order.
    pub id: DatabaseID,
    /// The customer-facing order number.
    pub order_number: i64,
    /// The order status, free text. New orders start as `"pending"`.
    pub status: String,
    /// The total price as submitted by the client.
    pub total_price: f64,
    /// When the order was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the order was created or last had its status changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A line item of an order, joined with the product's name and description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    /// The ID of the line item.
    pub id: DatabaseID,
    /// The ID of the ordered product.
    pub product_id: DatabaseID,
    /// How many units were ordered.
    pub quantity: i64,
    /// The price per unit at the time the order was placed.
    pub unit_price: f64,
    /// The product name, or null if the product row is missing.
    pub name: Option<String>,
    /// The product description, or null if the product row is missing.
    pub description: Option<String>,
}

/// A line item submitted as part of creating an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// The ID of the ordered product.
    pub product_id: DatabaseID,
    /// How many units are ordered. Defaults to one.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// The price per unit.
    pub unit_price: f64,
}

fn default_quantity() -> i64 {
    1
}
