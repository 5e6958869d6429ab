use std::{env, net::SocketAddr};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt,
};

use piatto::{
    build_router, graceful_shutdown,
    stores::{postgres, sqlite},
};

/// The REST API server for piatto.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database. Ignored when the
    /// environment variable DATABASE_URL selects the PostgreSQL backend.
    #[arg(long, default_value = "piatto.db")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    // The store backend is selected by environment: a DATABASE_URL means the
    // networked PostgreSQL server, otherwise the embedded SQLite file.
    let router = match env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&url)
                .await
                .expect("Could not connect to the PostgreSQL database.");
            let state = postgres::create_app_state(pool)
                .await
                .expect("Could not initialize the PostgreSQL database.");

            tracing::info!("Using the PostgreSQL backend.");
            build_router(state)
        }
        Err(_) => {
            let connection =
                Connection::open(&args.db_path).expect("Could not open the SQLite database.");
            let state =
                sqlite::create_app_state(connection).expect("Could not initialize the database.");

            tracing::info!("Using the SQLite backend at {}.", args.db_path);
            build_router(state)
        }
    };

    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer().pretty().with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            ),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
