//! The embedded store backend: SQLite via a shared connection.
//!
//! Contains one store per entity plus the convenience type alias and
//! function for an [AppState] that uses this backend.

mod category;
mod order;
mod product;

pub use category::SQLiteCategoryStore;
pub use order::SQLiteOrderStore;
pub use product::SQLiteProductStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{AppState, Error, db::initialize};

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SQLiteAppState = AppState<SQLiteCategoryStore, SQLiteProductStore, SQLiteOrderStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models to the database.
pub fn create_app_state(db_connection: Connection) -> Result<SQLiteAppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let category_store = SQLiteCategoryStore::new(connection.clone());
    let product_store = SQLiteProductStore::new(connection.clone());
    let order_store = SQLiteOrderStore::new(connection);

    Ok(AppState::new(category_store, product_store, order_store))
}
