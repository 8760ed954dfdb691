//! In-memory store adapters for `cartcore`
//!
//! This crate provides in-memory implementations of the `ProductCatalog`,
//! `CartStore`, and `OrderStore` traits from the cartcore crate, useful for
//! testing and development scenarios where persistence is not required.
//!
//! The catalog's stock decrement checks and writes under a single write-lock
//! acquisition, giving the atomic conditional-decrement semantics the
//! checkout flow relies on: two concurrent checkouts of the same product
//! cannot both pass the stock check.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use cartcore::errors::{CatalogError, CatalogResult, StoreResult};
use cartcore::store::{CartStore, OrderStore, ProductCatalog};
use cartcore::{Cart, Order, Product, ProductId, Quantity, UserId};
use tracing::debug;

/// Thread-safe in-memory product catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product record. Seeding hook for tests and
    /// demos; catalog CRUD proper is out of scope.
    pub fn insert(&self, product: Product) {
        let mut products = self.products.write().expect("RwLock poisoned");
        products.insert(product.id, product);
    }

    /// Current stock for a product, if it exists. Test observability hook.
    pub fn stock_of(&self, product_id: ProductId) -> Option<u32> {
        let products = self.products.read().expect("RwLock poisoned");
        products.get(&product_id).map(|p| p.stock)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn get(&self, product_id: ProductId) -> CatalogResult<Option<Product>> {
        let products = self.products.read().expect("RwLock poisoned");
        Ok(products.get(&product_id).cloned())
    }

    async fn decrement_stock(
        &self,
        product_id: ProductId,
        amount: Quantity,
    ) -> CatalogResult<u32> {
        // Check and write inside one write-lock hold: the conditional
        // decrement is atomic with respect to concurrent callers.
        let mut products = self.products.write().expect("RwLock poisoned");
        let product = products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;
        if product.stock < amount.value() {
            return Err(CatalogError::InsufficientStock {
                product_id,
                available: product.stock,
                requested: amount,
            });
        }
        product.stock -= amount.value();
        debug!(product = %product_id, remaining = product.stock, "stock decremented");
        Ok(product.stock)
    }

    async fn restore_stock(&self, product_id: ProductId, amount: Quantity) -> CatalogResult<u32> {
        let mut products = self.products.write().expect("RwLock poisoned");
        let product = products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;
        product.stock = product
            .stock
            .checked_add(amount.value())
            .ok_or_else(|| CatalogError::Backend("stock overflow on restore".to_string()))?;
        debug!(product = %product_id, remaining = product.stock, "stock restored");
        Ok(product.stock)
    }
}

/// Thread-safe in-memory cart store, one cart per user.
///
/// Writes serialize under the store's write lock, so mutations to the same
/// user's cart never interleave; carts of different users are independent
/// map entries.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<UserId, Cart>>>,
}

impl InMemoryCartStore {
    /// Creates an empty cart store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn load(&self, user_id: &UserId) -> StoreResult<Option<Cart>> {
        let carts = self.carts.read().expect("RwLock poisoned");
        Ok(carts.get(user_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> StoreResult<()> {
        let mut carts = self.carts.write().expect("RwLock poisoned");
        carts.insert(cart.user_id().clone(), cart.clone());
        Ok(())
    }
}

/// Thread-safe in-memory append-only order history.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    /// Creates an empty order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders ever appended. Test observability hook.
    pub fn len(&self) -> usize {
        let orders = self.orders.read().expect("RwLock poisoned");
        orders.len()
    }

    /// Whether no order has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn append(&self, order: Order) -> StoreResult<()> {
        let mut orders = self.orders.write().expect("RwLock poisoned");
        orders.push(order);
        Ok(())
    }

    async fn for_user(&self, user_id: &UserId) -> StoreResult<Vec<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        // Appended in creation order, so reverse iteration is newest first.
        Ok(orders
            .iter()
            .rev()
            .filter(|o| o.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn all(&self) -> StoreResult<Vec<Order>> {
        let orders = self.orders.read().expect("RwLock poisoned");
        Ok(orders.iter().rev().cloned().collect())
    }
}
