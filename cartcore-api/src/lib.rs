//! HTTP surface for the cartcore checkout core.
//!
//! A thin Axum layer over the domain crate: handlers parse untrusted input
//! into validated domain types at the boundary, delegate to the cart model
//! and checkout flow, and map typed errors onto HTTP statuses. Responses use
//! the `{success, message?, data?}` JSON envelope throughout.
//!
//! Identity arrives as `x-user-id` / `x-user-role` headers; real
//! authentication is owned by the fronting transport.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod error;
pub mod handlers;

use axum::routing::{get, post, put};
use axum::Router;
use cartcore::CheckoutFlow;
use cartcore_memory::{InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore};

/// Shared application state: the three stores plus the checkout flow wired
/// over them.
#[derive(Clone)]
pub struct AppState {
    /// Per-user carts.
    pub carts: InMemoryCartStore,
    /// Product catalog.
    pub catalog: InMemoryCatalog,
    /// Append-only order history.
    pub orders: InMemoryOrderStore,
    /// Checkout unit of work over the stores above.
    pub checkout: CheckoutFlow<InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore>,
}

impl AppState {
    /// Creates state over fresh, empty in-memory stores.
    pub fn new() -> Self {
        let carts = InMemoryCartStore::new();
        let catalog = InMemoryCatalog::new();
        let orders = InMemoryOrderStore::new();
        let checkout = CheckoutFlow::new(carts.clone(), catalog.clone(), orders.clone());
        Self {
            carts,
            catalog,
            orders,
            checkout,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cart", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/cart/items", post(handlers::add_item))
        .route(
            "/cart/items/{product_id}",
            put(handlers::update_item).delete(handlers::remove_item),
        )
        .route("/cart/checkout", post(handlers::checkout))
        .route("/orders/my", get(handlers::my_orders))
        .route("/orders", get(handlers::all_orders))
        .with_state(state)
}
