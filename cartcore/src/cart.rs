//! The per-user cart and its mutation operations.
//!
//! A cart holds an ordered sequence of line items and a derived total price.
//! The invariant maintained by every mutator: `total_price` equals the sum
//! of `quantity x unit_price` over all lines. Mutations are applied to a
//! scratch copy of the lines and committed together with the recomputed
//! total, so a rejected mutation leaves the cart untouched.
//!
//! Carts are created lazily on first access and are emptied, never deleted.

use serde::{Deserialize, Serialize};

use crate::errors::CartError;
use crate::types::{Money, ProductId, Quantity, UserId};

/// One line of a cart: a product, how many units, and the unit price
/// captured when the line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Units requested, at least 1.
    pub quantity: Quantity,
    /// Unit price captured at add time; checkout re-reads current prices.
    pub unit_price: Money,
}

impl CartItem {
    /// The line total, `quantity x unit_price`.
    pub fn line_total(&self) -> Result<Money, crate::errors::ValidationError> {
        self.unit_price.times(self.quantity)
    }
}

/// A user's cart. Exactly one exists per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    user_id: UserId,
    items: Vec<CartItem>,
    total_price: Money,
}

impl Cart {
    /// Creates an empty cart for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
            total_price: Money::zero(),
        }
    }

    /// The owning user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The current line items, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The derived total price.
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds units of a product to the cart.
    ///
    /// If a line for the product already exists, the quantity is added to
    /// it and the unit price is overwritten with the new value
    /// (last-write-wins, not cumulative). Invalid quantities and prices
    /// cannot reach this method: both arrive as already-validated types.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: Quantity,
        unit_price: Money,
    ) -> Result<(), CartError> {
        self.mutate(|items| {
            if let Some(line) = items.iter_mut().find(|i| i.product_id == product_id) {
                line.quantity = line.quantity.checked_add(quantity).map_err(|source| {
                    CartError::QuantityLimit { product_id, source }
                })?;
                line.unit_price = unit_price;
            } else {
                items.push(CartItem {
                    product_id,
                    quantity,
                    unit_price,
                });
            }
            Ok(())
        })
    }

    /// Removes the line for a product. Absent lines are a no-op.
    pub fn remove_item(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
        // Removal can only shrink the total; recomputation cannot fail.
        self.total_price = Self::total_of(&self.items).unwrap_or_default();
    }

    /// Sets a line's quantity exactly (not additive).
    ///
    /// A quantity of 0 removes the line. A quantity above the per-line
    /// maximum is rejected. Updating an absent line is a no-op.
    pub fn update_item_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }
        let quantity = Quantity::new(quantity)?;
        self.mutate(|items| {
            if let Some(line) = items.iter_mut().find(|i| i.product_id == product_id) {
                line.quantity = quantity;
            }
            Ok(())
        })
    }

    /// Empties the cart and resets the total to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total_price = Money::zero();
    }

    /// Applies a mutation to a scratch copy of the lines, recomputes the
    /// total, and commits both only if everything succeeded.
    fn mutate(
        &mut self,
        f: impl FnOnce(&mut Vec<CartItem>) -> Result<(), CartError>,
    ) -> Result<(), CartError> {
        let mut items = self.items.clone();
        f(&mut items)?;
        let total = Self::total_of(&items)?;
        self.items = items;
        self.total_price = total;
        Ok(())
    }

    fn total_of(items: &[CartItem]) -> Result<Money, CartError> {
        let mut total = Money::zero();
        for item in items {
            let line = item.line_total().map_err(CartError::TotalOutOfRange)?;
            total = total
                .checked_add(line)
                .map_err(CartError::TotalOutOfRange)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn user() -> UserId {
        UserId::try_new("alice".to_string()).unwrap()
    }

    fn money(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount).unwrap()
    }

    fn qty(value: u32) -> Quantity {
        Quantity::new(value).unwrap()
    }

    #[test]
    fn add_item_merges_quantities_and_overwrites_price() {
        let product = ProductId::new();
        let mut cart = Cart::new(user());

        cart.add_item(product, qty(2), money(dec!(10.00))).unwrap();
        cart.add_item(product, qty(3), money(dec!(9.50))).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity.value(), 5);
        assert_eq!(cart.items()[0].unit_price, money(dec!(9.50)));
        assert_eq!(cart.total_price(), money(dec!(47.50)));
    }

    #[test]
    fn add_item_rejects_quantity_past_the_line_maximum_without_mutating() {
        let product = ProductId::new();
        let mut cart = Cart::new(user());

        cart.add_item(product, qty(900), money(dec!(1.00))).unwrap();
        let before = cart.clone();

        let err = cart.add_item(product, qty(200), money(dec!(2.00)));
        assert!(matches!(err, Err(CartError::QuantityLimit { .. })));
        assert_eq!(cart, before);
    }

    #[test]
    fn update_to_zero_removes_exactly_that_line() {
        let a = ProductId::new();
        let b = ProductId::new();
        let mut cart = Cart::new(user());
        cart.add_item(a, qty(2), money(dec!(10.00))).unwrap();
        cart.add_item(b, qty(1), money(dec!(5.00))).unwrap();

        cart.update_item_quantity(a, 0).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, b);
        assert_eq!(cart.total_price(), money(dec!(5.00)));
    }

    #[test]
    fn update_sets_quantity_exactly() {
        let product = ProductId::new();
        let mut cart = Cart::new(user());
        cart.add_item(product, qty(2), money(dec!(3.00))).unwrap();

        cart.update_item_quantity(product, 7).unwrap();

        assert_eq!(cart.items()[0].quantity.value(), 7);
        assert_eq!(cart.total_price(), money(dec!(21.00)));
    }

    #[test]
    fn update_of_absent_line_is_a_no_op() {
        let mut cart = Cart::new(user());
        cart.add_item(ProductId::new(), qty(1), money(dec!(1.00)))
            .unwrap();
        let before = cart.clone();

        cart.update_item_quantity(ProductId::new(), 4).unwrap();

        assert_eq!(cart, before);
    }

    #[test]
    fn remove_and_clear_keep_the_total_consistent() {
        let a = ProductId::new();
        let b = ProductId::new();
        let mut cart = Cart::new(user());
        cart.add_item(a, qty(2), money(dec!(10.00))).unwrap();
        cart.add_item(b, qty(1), money(dec!(5.00))).unwrap();
        assert_eq!(cart.total_price(), money(dec!(25.00)));

        cart.remove_item(a);
        assert_eq!(cart.total_price(), money(dec!(5.00)));

        cart.remove_item(a); // already gone, no-op
        assert_eq!(cart.items().len(), 1);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Money::zero());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { slot: usize, qty: u32, cents: u64 },
        Update { slot: usize, qty: u32 },
        Remove { slot: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..8, 1u32..=50, 0u64..10_000)
                .prop_map(|(slot, qty, cents)| Op::Add { slot, qty, cents }),
            (0usize..8, 0u32..=50).prop_map(|(slot, qty)| Op::Update { slot, qty }),
            (0usize..8).prop_map(|slot| Op::Remove { slot }),
        ]
    }

    proptest! {
        /// After every mutation the stored total equals the recomputed sum
        /// of line totals.
        #[test]
        fn prop_total_price_invariant(ops in proptest::collection::vec(op_strategy(), 1..40)) {
            let products: Vec<ProductId> = (0..8).map(|_| ProductId::new()).collect();
            let mut cart = Cart::new(user());

            for op in ops {
                match op {
                    Op::Add { slot, qty: q, cents } => {
                        let price = Money::new(rust_decimal::Decimal::new(cents as i64, 2)).unwrap();
                        // Merging may exceed the per-line cap; a rejected add
                        // must leave the cart unchanged, which the final
                        // assertion below also covers.
                        let _ = cart.add_item(products[slot], qty(q), price);
                    }
                    Op::Update { slot, qty: q } => {
                        cart.update_item_quantity(products[slot], q).unwrap();
                    }
                    Op::Remove { slot } => cart.remove_item(products[slot]),
                }

                let expected = cart
                    .items()
                    .iter()
                    .map(|i| i.line_total().unwrap().amount())
                    .sum::<rust_decimal::Decimal>();
                prop_assert_eq!(cart.total_price().amount(), expected);
            }
        }
    }
}
