//! Implements the structs that hold the state of the REST server.
//!
//! The state is generic over the three store traits so that any backend
//! implementing them can serve the API. Each group of routes extracts a
//! sub-state carrying just the store it needs.

use axum::extract::FromRef;

use crate::stores::{CategoryStore, OrderStore, ProductStore};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState<C, P, O>
where
    C: CategoryStore + Clone + Send + Sync,
    P: ProductStore + Clone + Send + Sync,
    O: OrderStore + Clone + Send + Sync,
{
    /// The store for menu [categories](crate::models::Category).
    pub category_store: C,
    /// The store for [products](crate::models::Product).
    pub product_store: P,
    /// The store for [orders](crate::models::Order) and their line items.
    pub order_store: O,
}

impl<C, P, O> AppState<C, P, O>
where
    C: CategoryStore + Clone + Send + Sync,
    P: ProductStore + Clone + Send + Sync,
    O: OrderStore + Clone + Send + Sync,
{
    /// Create a new [AppState] from the three entity stores.
    pub fn new(category_store: C, product_store: P, order_store: O) -> Self {
        Self {
            category_store,
            product_store,
            order_store,
        }
    }
}

/// The state needed for the category routes.
#[derive(Debug, Clone)]
pub struct CategoryState<C>
where
    C: CategoryStore + Clone + Send + Sync,
{
    /// The store for menu categories.
    pub category_store: C,
}

impl<C, P, O> FromRef<AppState<C, P, O>> for CategoryState<C>
where
    C: CategoryStore + Clone + Send + Sync,
    P: ProductStore + Clone + Send + Sync,
    O: OrderStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, P, O>) -> Self {
        Self {
            category_store: state.category_store.clone(),
        }
    }
}

/// The state needed for the product routes.
#[derive(Debug, Clone)]
pub struct ProductState<P>
where
    P: ProductStore + Clone + Send + Sync,
{
    /// The store for products.
    pub product_store: P,
}

impl<C, P, O> FromRef<AppState<C, P, O>> for ProductState<P>
where
    C: CategoryStore + Clone + Send + Sync,
    P: ProductStore + Clone + Send + Sync,
    O: OrderStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, P, O>) -> Self {
        Self {
            product_store: state.product_store.clone(),
        }
    }
}

/// The state needed for the order routes.
#[derive(Debug, Clone)]
pub struct OrderState<O>
where
    O: OrderStore + Clone + Send + Sync,
{
    /// The store for orders and their line items.
    pub order_store: O,
}

impl<C, P, O> FromRef<AppState<C, P, O>> for OrderState<O>
where
    C: CategoryStore + Clone + Send + Sync,
    P: ProductStore + Clone + Send + Sync,
    O: OrderStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<C, P, O>) -> Self {
        Self {
            order_store: state.order_store.clone(),
        }
    }
}
