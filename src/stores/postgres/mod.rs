//! The networked store backend: PostgreSQL via a sqlx connection pool.
//!
//! Contains one store per entity plus the convenience type alias and
//! function for an [AppState] that uses this backend. The pool checks a
//! connection out per query and returns it on every exit path, so no
//! per-request connect/disconnect is needed.

mod category;
mod order;
mod product;

pub use category::PostgresCategoryStore;
pub use order::PostgresOrderStore;
pub use product::PostgresProductStore;

use sqlx::PgPool;

use crate::{AppState, Error};

/// An alias for an [AppState] that uses PostgreSQL for the backend.
pub type PostgresAppState =
    AppState<PostgresCategoryStore, PostgresProductStore, PostgresOrderStore>;

/// Create the tables for all domain models in the database.
///
/// Foreign keys are declared without cascade actions; deletions are
/// sequenced by the stores themselves.
pub async fn initialize(pool: &PgPool) -> Result<(), Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS categories (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price DOUBLE PRECISION NOT NULL,
            image_url TEXT NOT NULL DEFAULT '',
            category_id BIGINT NOT NULL REFERENCES categories(id)
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS orders (
            id BIGSERIAL PRIMARY KEY,
            order_number BIGINT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'pending',
            total_price DOUBLE PRECISION NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS order_items (
            id BIGSERIAL PRIMARY KEY,
            order_id BIGINT NOT NULL REFERENCES orders(id),
            product_id BIGINT NOT NULL REFERENCES products(id),
            quantity BIGINT NOT NULL DEFAULT 1,
            unit_price DOUBLE PRECISION NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Creates an [AppState] instance that uses PostgreSQL for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
pub async fn create_app_state(pool: PgPool) -> Result<PostgresAppState, Error> {
    initialize(&pool).await?;

    let category_store = PostgresCategoryStore::new(pool.clone());
    let product_store = PostgresProductStore::new(pool.clone());
    let order_store = PostgresOrderStore::new(pool);

    Ok(AppState::new(category_store, product_store, order_store))
}
