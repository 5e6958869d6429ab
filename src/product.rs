//! The product endpoints: listing (all or by category), fetching, creating,
//! updating and deleting menu products.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::ApiError,
    models::{DatabaseID, NewProduct, Product, ProductListing},
    state::ProductState,
    stores::ProductStore,
};

/// The fields accepted when creating or updating a product.
///
/// `name`, `price` and `category_id` are required; the rest default to
/// empty strings.
#[derive(Debug, Deserialize)]
pub struct ProductData {
    name: Option<String>,
    #[serde(default)]
    description: String,
    price: Option<f64>,
    category_id: Option<DatabaseID>,
    #[serde(default)]
    image_url: String,
}

impl ProductData {
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        let (Some(name), Some(price), Some(category_id)) =
            (self.name, self.price, self.category_id)
        else {
            return Err(ApiError::Validation(
                "Missing required fields: name, price, category_id".to_owned(),
            ));
        };

        Ok(NewProduct {
            name,
            description: self.description,
            price,
            category_id,
            image_url: self.image_url,
        })
    }
}

/// A route handler for listing all products with their category names.
pub async fn get_products<P>(
    State(state): State<ProductState<P>>,
) -> Result<Json<Vec<ProductListing>>, ApiError>
where
    P: ProductStore + Clone + Send + Sync + 'static,
{
    let products = state
        .product_store
        .get_all()
        .await
        .map_err(|error| ApiError::store("getting products", error))?;

    Ok(Json(products))
}

/// A route handler for listing the products of one category.
pub async fn get_products_by_category<P>(
    State(state): State<ProductState<P>>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Vec<Product>>, ApiError>
where
    P: ProductStore + Clone + Send + Sync + 'static,
{
    let products = state
        .product_store
        .get_by_category(category_id)
        .await
        .map_err(|error| ApiError::store("getting products by category", error))?;

    Ok(Json(products))
}

/// A route handler for getting a product by its database ID.
pub async fn get_product<P>(
    State(state): State<ProductState<P>>,
    Path(product_id): Path<DatabaseID>,
) -> Result<Json<Product>, ApiError>
where
    P: ProductStore + Clone + Send + Sync + 'static,
{
    state
        .product_store
        .get(product_id)
        .await
        .map_err(|error| ApiError::store("getting product", error))?
        .map(Json)
        .ok_or(ApiError::NotFound("Product not found"))
}

/// A route handler for creating a new product.
pub async fn create_product<P>(
    State(state): State<ProductState<P>>,
    Json(data): Json<ProductData>,
) -> Result<Response, ApiError>
where
    P: ProductStore + Clone + Send + Sync + 'static,
{
    let product = data.into_new_product()?;

    let id = state
        .product_store
        .create(&product)
        .await
        .map_err(|error| ApiError::store("creating product", error))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Product created successfully" })),
    )
        .into_response())
}

/// A route handler for updating a product.
///
/// An unknown `product_id` is a no-op, not an error.
pub async fn update_product<P>(
    State(state): State<ProductState<P>>,
    Path(product_id): Path<DatabaseID>,
    Json(data): Json<ProductData>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    P: ProductStore + Clone + Send + Sync + 'static,
{
    let product = data.into_new_product()?;

    state
        .product_store
        .update(product_id, &product)
        .await
        .map_err(|error| ApiError::store("updating product", error))?;

    Ok(Json(json!({ "message": "Product updated successfully" })))
}

/// A route handler for deleting a product.
pub async fn delete_product<P>(
    State(state): State<ProductState<P>>,
    Path(product_id): Path<DatabaseID>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    P: ProductStore + Clone + Send + Sync + 'static,
{
    state
        .product_store
        .delete(product_id)
        .await
        .map_err(|error| ApiError::store("deleting product", error))?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
