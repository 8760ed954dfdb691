//! Product records as seen by the cart and checkout flow.
//!
//! Full catalog management (create/update/delete, search, sorting) is owned
//! by the catalog collaborator; this module only models what checkout needs
//! to read: identity, name, current price, stock on hand, and category.

use nutype::nutype;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::types::{Money, ProductId};

/// Product name: non-empty, at most 100 characters, surrounding whitespace
/// trimmed.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct ProductName(String);

impl From<ProductNameError> for ValidationError {
    fn from(err: ProductNameError) -> Self {
        Self::ProductName(err.to_string())
    }
}

/// Closed set of product categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Consumer electronics.
    Electronics,
    /// Apparel.
    Clothing,
    /// Groceries and perishables.
    Food,
    /// Printed and digital books.
    Books,
    /// Sporting goods.
    Sports,
    /// Household items.
    Home,
    /// Anything that fits nowhere else.
    Other,
}

/// A product record: the slice of the catalog the checkout flow reads.
///
/// Stock is a `u32`, so "quantity never negative" holds structurally; the
/// catalog enforces that decrements never underflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name, denormalized into order snapshots.
    pub name: ProductName,
    /// Current unit price.
    pub price: Money,
    /// Units available for purchase.
    pub stock: u32,
    /// Product category.
    pub category: Category,
}

impl Product {
    /// Creates a product record.
    pub fn new(
        id: ProductId,
        name: ProductName,
        price: Money,
        stock: u32,
        category: Category,
    ) -> Self {
        Self {
            id,
            name,
            price,
            stock,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name_is_trimmed_and_bounded() {
        let name = ProductName::try_new("  Espresso Machine  ".to_string()).unwrap();
        assert_eq!(name.as_ref(), "Espresso Machine");
        assert!(ProductName::try_new(String::new()).is_err());
        assert!(ProductName::try_new("x".repeat(101)).is_err());
    }

    #[test]
    fn category_serializes_as_its_variant_name() {
        let json = serde_json::to_string(&Category::Electronics).unwrap();
        assert_eq!(json, "\"Electronics\"");
    }
}
