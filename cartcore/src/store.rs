//! Persistence traits for the catalog, carts, and orders.
//!
//! The checkout flow depends only on these traits, never on a concrete
//! backend. The crucial contract is [`ProductCatalog::decrement_stock`]:
//! it must check and decrement in one atomic step, so two concurrent
//! checkouts of the same product cannot both pass the stock check; the
//! classic check-then-act oversell race is closed by the collaborator, not
//! by callers.

use async_trait::async_trait;

use crate::cart::Cart;
use crate::errors::{CatalogResult, StoreResult};
use crate::order::Order;
use crate::product::Product;
use crate::types::{ProductId, Quantity, UserId};

/// Read and conditional-write access to the product catalog.
///
/// Full catalog CRUD and search are owned by the catalog service; checkout
/// needs exactly these three operations.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetches the current record for a product, or `None` if it no longer
    /// exists.
    async fn get(&self, product_id: ProductId) -> CatalogResult<Option<Product>>;

    /// Atomically decrements stock by `amount` if at least that much is
    /// available, returning the remaining stock.
    ///
    /// Fails with [`CatalogError::InsufficientStock`] without writing
    /// anything when stock is short, and with
    /// [`CatalogError::ProductNotFound`] when the product vanished.
    ///
    /// [`CatalogError::InsufficientStock`]: crate::errors::CatalogError::InsufficientStock
    /// [`CatalogError::ProductNotFound`]: crate::errors::CatalogError::ProductNotFound
    async fn decrement_stock(&self, product_id: ProductId, amount: Quantity)
        -> CatalogResult<u32>;

    /// Adds `amount` back to a product's stock, returning the new level.
    ///
    /// Compensation hook for the checkout unit of work; it restores
    /// decrements applied before a later step failed.
    async fn restore_stock(&self, product_id: ProductId, amount: Quantity) -> CatalogResult<u32>;
}

/// Persistence for per-user carts.
///
/// One cart per user, keyed by [`UserId`]. Lazy creation is the caller's
/// concern: `load` returning `None` means the user has no cart yet.
/// Implementations must serialize writes to the same user's cart; carts of
/// different users are independent.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Loads a user's cart, if one exists.
    async fn load(&self, user_id: &UserId) -> StoreResult<Option<Cart>>;

    /// Inserts or replaces the cart for its owning user.
    async fn save(&self, cart: &Cart) -> StoreResult<()>;
}

/// Append-only persistence for completed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Appends a completed order to the history.
    async fn append(&self, order: Order) -> StoreResult<()>;

    /// A user's orders, newest first.
    async fn for_user(&self, user_id: &UserId) -> StoreResult<Vec<Order>>;

    /// All orders with purchaser identity, newest first. Admin-facing.
    async fn all(&self) -> StoreResult<Vec<Order>>;
}
