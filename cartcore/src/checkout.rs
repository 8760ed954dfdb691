//! The checkout flow: converting a cart into a durable order.
//!
//! Checkout is a unit of work over the catalog, the cart store, and the
//! order store, using compensation instead of a shared transaction.
//! The writes are ordered so that everything preceding the final order
//! append can be undone:
//!
//! 1. re-validate every line against the current catalog (read-only)
//! 2. decrement stock per line via the catalog's atomic conditional write
//! 3. persist the emptied cart
//! 4. append the order (the commit point)
//!
//! If any step fails, previously applied decrements are restored and the
//! original cart is re-saved, so an order exists only when stock and cart
//! state match it. A failing compensation write is logged at error level;
//! that is the one path that can leak state, and only after the primary
//! failure has already been surfaced to the caller.

use tracing::{error, info, instrument};

use crate::cart::{Cart, CartItem};
use crate::errors::{CatalogError, CheckoutError, CheckoutResult};
use crate::order::{Order, OrderItem};
use crate::payment::Payment;
use crate::product::Product;
use crate::store::{CartStore, OrderStore, ProductCatalog};
use crate::types::{ProductId, Quantity, UserId};

/// Orchestrates checkout over a cart store, a product catalog, and an
/// order store.
#[derive(Debug, Clone)]
pub struct CheckoutFlow<C, P, O> {
    carts: C,
    catalog: P,
    orders: O,
}

impl<C, P, O> CheckoutFlow<C, P, O>
where
    C: CartStore,
    P: ProductCatalog,
    O: OrderStore,
{
    /// Creates a checkout flow over the given collaborators.
    pub fn new(carts: C, catalog: P, orders: O) -> Self {
        Self {
            carts,
            catalog,
            orders,
        }
    }

    /// Converts the user's cart into a paid order, decrementing stock and
    /// emptying the cart, all-or-nothing.
    ///
    /// The payment descriptor arrives already validated; parsing raw
    /// payment input is [`Payment::parse`]'s job at the boundary.
    #[instrument(skip(self, payment), fields(user = %user_id))]
    pub async fn checkout(&self, user_id: &UserId, payment: Payment) -> CheckoutResult<Order> {
        let cart = self
            .carts
            .load(user_id)
            .await?
            .ok_or(CheckoutError::EmptyCart)?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Prices and stock may have moved since add-to-cart; re-read every
        // line before touching anything.
        let lines = self.revalidate(&cart).await?;

        let applied = self.apply_decrements(&lines).await?;

        let mut emptied = cart.clone();
        emptied.clear();
        if let Err(err) = self.carts.save(&emptied).await {
            self.restore_decrements(&applied).await;
            return Err(err.into());
        }

        let order = match Self::snapshot(&cart, &lines, payment) {
            Ok(order) => order,
            Err(err) => {
                self.restore_decrements(&applied).await;
                self.restore_cart(&cart).await;
                return Err(err);
            }
        };
        if let Err(err) = self.orders.append(order.clone()).await {
            self.restore_decrements(&applied).await;
            self.restore_cart(&cart).await;
            return Err(err.into());
        }

        info!(order = %order.id, total = %order.total_price, "checkout completed");
        Ok(order)
    }

    /// Re-fetches current product records for every cart line, failing on
    /// the first missing product or short stock. Read-only.
    async fn revalidate(&self, cart: &Cart) -> CheckoutResult<Vec<(CartItem, Product)>> {
        let mut lines = Vec::with_capacity(cart.items().len());
        for item in cart.items() {
            let product = self
                .catalog
                .get(item.product_id)
                .await
                .map_err(CheckoutError::Catalog)?
                .ok_or(CheckoutError::ProductMissing {
                    product_id: item.product_id,
                })?;
            if product.stock < item.quantity.value() {
                return Err(CheckoutError::InsufficientStock {
                    product_id: product.id,
                    name: product.name.to_string(),
                    available: product.stock,
                    requested: item.quantity,
                });
            }
            lines.push((item.clone(), product));
        }
        Ok(lines)
    }

    /// Applies the conditional decrement for each line. On the first
    /// failure, restores every decrement already applied and returns the
    /// mapped error.
    async fn apply_decrements(
        &self,
        lines: &[(CartItem, Product)],
    ) -> CheckoutResult<Vec<(ProductId, Quantity)>> {
        let mut applied = Vec::with_capacity(lines.len());
        for (item, product) in lines {
            match self.catalog.decrement_stock(item.product_id, item.quantity).await {
                Ok(_remaining) => applied.push((item.product_id, item.quantity)),
                Err(err) => {
                    self.restore_decrements(&applied).await;
                    return Err(Self::map_decrement_error(err, product));
                }
            }
        }
        Ok(applied)
    }

    /// A decrement can still fail after the read-only check when a
    /// concurrent checkout got there first; surface that with the same
    /// caller-facing errors the check itself produces.
    fn map_decrement_error(err: CatalogError, product: &Product) -> CheckoutError {
        match err {
            CatalogError::ProductNotFound(product_id) => {
                CheckoutError::ProductMissing { product_id }
            }
            CatalogError::InsufficientStock {
                product_id,
                available,
                requested,
            } => CheckoutError::InsufficientStock {
                product_id,
                name: product.name.to_string(),
                available,
                requested,
            },
            other => CheckoutError::Catalog(other),
        }
    }

    fn snapshot(
        cart: &Cart,
        lines: &[(CartItem, Product)],
        payment: Payment,
    ) -> CheckoutResult<Order> {
        let mut items = Vec::with_capacity(lines.len());
        for (line, product) in lines {
            items.push(OrderItem::snapshot(line, product.name.clone())?);
        }
        Ok(Order::new(
            cart.user_id().clone(),
            items,
            cart.total_price(),
            payment,
        ))
    }

    async fn restore_decrements(&self, applied: &[(ProductId, Quantity)]) {
        for (product_id, amount) in applied {
            if let Err(err) = self.catalog.restore_stock(*product_id, *amount).await {
                error!(product = %product_id, amount = %amount, error = %err,
                    "failed to restore stock during checkout compensation");
            }
        }
    }

    async fn restore_cart(&self, cart: &Cart) {
        if let Err(err) = self.carts.save(cart).await {
            error!(user = %cart.user_id(), error = %err,
                "failed to restore cart during checkout compensation");
        }
    }
}
