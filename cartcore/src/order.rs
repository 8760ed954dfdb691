//! Orders: immutable records of completed purchases.
//!
//! An order snapshots the cart at checkout time, with product names
//! denormalized and line totals precomputed, so later catalog edits never
//! rewrite purchase history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::errors::ValidationError;
use crate::payment::Payment;
use crate::product::ProductName;
use crate::types::{Money, OrderId, ProductId, Quantity, UserId};

/// Lifecycle state of an order.
///
/// The shop has no pending-payment, cancellation, or refund flow: every
/// order is created directly in its single terminal state. The enum is
/// serialized as a lowercase string tag so future states can be added
/// without breaking stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Payment accepted; the one and only state.
    Paid,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// One line of an order: a cart line frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The purchased product.
    pub product_id: ProductId,
    /// Product name at purchase time.
    pub name: ProductName,
    /// Units purchased.
    pub quantity: Quantity,
    /// Unit price charged.
    pub unit_price: Money,
    /// Line total, `quantity x unit_price`.
    pub total: Money,
}

impl OrderItem {
    /// Snapshots a cart line, denormalizing the product name and computing
    /// the line total.
    pub fn snapshot(line: &CartItem, name: ProductName) -> Result<Self, ValidationError> {
        Ok(Self {
            product_id: line.product_id,
            name,
            quantity: line.quantity,
            unit_price: line.unit_price,
            total: line.unit_price.times(line.quantity)?,
        })
    }
}

/// An immutable record of a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// The purchasing user.
    pub user_id: UserId,
    /// Snapshot of the purchased lines.
    pub items: Vec<OrderItem>,
    /// Total charged, equal to the cart total at checkout.
    pub total_price: Money,
    /// How the buyer paid.
    pub payment: Payment,
    /// Lifecycle state; always [`OrderStatus::Paid`] today.
    pub status: OrderStatus,
    /// When the purchase completed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Creates a paid order with a fresh id and the current timestamp.
    pub fn new(
        user_id: UserId,
        items: Vec<OrderItem>,
        total_price: Money,
        payment: Payment,
    ) -> Self {
        Self {
            id: OrderId::new(),
            user_id,
            items,
            total_price,
            payment,
            status: OrderStatus::Paid,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn snapshot_computes_the_line_total() {
        let line = CartItem {
            product_id: ProductId::new(),
            quantity: Quantity::new(3).unwrap(),
            unit_price: Money::new(dec!(4.25)).unwrap(),
        };
        let name = ProductName::try_new("Pour-Over Kettle".to_string()).unwrap();

        let item = OrderItem::snapshot(&line, name.clone()).unwrap();

        assert_eq!(item.name, name);
        assert_eq!(item.total, Money::new(dec!(12.75)).unwrap());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
        assert_eq!(OrderStatus::Paid.to_string(), "paid");
    }
}
