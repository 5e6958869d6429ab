//! Piatto is a JSON REST API for running a small food-ordering business.
//!
//! It manages menu categories, products and customer orders (with their line
//! items) in a relational database, and exposes one HTTP endpoint per store
//! operation. The storage layer is swappable: the same API can run against an
//! embedded SQLite database file or a networked PostgreSQL server, selected
//! at start-up.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod category;
mod db;
pub mod endpoints;
mod error;
mod models;
mod order;
mod product;
mod routing;
mod state;
pub mod stores;

pub use error::Error;
pub use models::{
    Category, DatabaseID, NewOrderItem, NewProduct, Order, OrderItem, Product, ProductListing,
};
pub use routing::build_router;
pub use state::AppState;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
