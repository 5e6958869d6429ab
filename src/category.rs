//! The category endpoints: listing, fetching, creating, updating and
//! deleting menu categories.

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
    models::{Category, DatabaseID},
    state::CategoryState,
    stores::CategoryStore,
};

/// The fields accepted when creating or updating a category.
#[derive(Debug, Deserialize)]
pub struct CategoryData {
    name: Option<String>,
    #[serde(default)]
    description: String,
}

impl CategoryData {
    /// Split into the required name and optional description, or the 400
    /// response for a missing name.
    fn into_fields(self) -> Result<(String, String), ApiError> {
        match self.name {
            Some(name) => Ok((name, self.description)),
            None => Err(ApiError::Validation(
                "Missing required field: name".to_owned(),
            )),
        }
    }
}

/// A route handler for listing all categories, sorted by name.
pub async fn get_categories<C>(
    State(state): State<CategoryState<C>>,
) -> Result<Json<Vec<Category>>, ApiError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
{
    let categories = state
        .category_store
        .get_all()
        .await
        .map_err(|error| ApiError::store("getting categories", error))?;

    Ok(Json(categories))
}

/// A route handler for getting a category by its database ID.
pub async fn get_category<C>(
    State(state): State<CategoryState<C>>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Category>, ApiError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
{
    state
        .category_store
        .get(category_id)
        .await
        .map_err(|error| ApiError::store("getting category", error))?
        .map(Json)
        .ok_or(ApiError::NotFound("Category not found"))
}

/// A route handler for creating a new category.
pub async fn create_category<C>(
    State(state): State<CategoryState<C>>,
    Json(data): Json<CategoryData>,
) -> Result<Response, ApiError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
{
    let (name, description) = data.into_fields()?;

    let id = state
        .category_store
        .create(&name, &description)
        .await
        .map_err(|error| ApiError::store("creating category", error))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Category created successfully" })),
    )
        .into_response())
}

/// A route handler for updating a category.
///
/// An unknown `category_id` is a no-op, not an error.
pub async fn update_category<C>(
    State(state): State<CategoryState<C>>,
    Path(category_id): Path<DatabaseID>,
    Json(data): Json<CategoryData>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
{
    let (name, description) = data.into_fields()?;

    state
        .category_store
        .update(category_id, &name, &description)
        .await
        .map_err(|error| ApiError::store("updating category", error))?;

    Ok(Json(json!({ "message": "Category updated successfully" })))
}

/// A route handler for deleting a category.
pub async fn delete_category<C>(
    State(state): State<CategoryState<C>>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
{
    state
        .category_store
        .delete(category_id)
        .await
        .map_err(|error| ApiError::store("deleting category", error))?;

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
