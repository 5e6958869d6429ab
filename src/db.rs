/*! This module defines the traits the SQLite stores use to set up and read
the application's database, and the function that bootstraps the schema. */

use rusqlite::{Connection, Error, Row, Transaction as SqlTransaction};

use crate::stores::sqlite::{SQLiteCategoryStore, SQLiteOrderStore, SQLiteProductStore};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create the table(s) for the store.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type each row maps to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the
    /// table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from the column at `offset`.
    ///
    /// This is useful in cases where tables have been joined and you want to
    /// construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, Error>;
}

/// Create the tables for all domain models in the database.
///
/// The tables are created inside a single exclusive transaction so that a
/// half-initialized schema is never left behind.
///
/// Referential integrity is declarative only: the `foreign_keys` pragma is
/// left off, matching the behavior the rest of the application expects.
pub fn initialize(connection: &Connection) -> Result<(), crate::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteCategoryStore::create_table(&transaction)?;
    SQLiteProductStore::create_table(&transaction)?;
    SQLiteOrderStore::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
