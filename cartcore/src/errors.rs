//! Error types for `cartcore`.
//!
//! One error enum per subsystem so callers can match on the failures they
//! can actually handle:
//!
//! - [`ValidationError`]: a raw input failed a smart constructor
//! - [`CartError`]: a cart mutation was rejected
//! - [`PaymentError`]: a payment descriptor is missing or malformed
//! - [`CatalogError`]: catalog lookups and conditional stock writes
//! - [`StoreError`]: cart/order persistence backends
//! - [`CheckoutError`]: the checkout unit of work
//!
//! Every failure is recovered at the request boundary and reported as a
//! structured result with a human-readable message; none is fatal to the
//! process, and nothing in this crate retries.

use thiserror::Error;

use crate::types::{ProductId, Quantity};

/// A raw input value failed domain validation at construction time.
///
/// The original system silently ignored invalid cart inputs; these errors
/// replace that with a deterministic contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Quantity was zero, out of range, or overflowed.
    #[error("invalid quantity: {0}")]
    Quantity(String),
    /// Money amount was negative, too precise, or out of range.
    #[error("invalid money amount: {0}")]
    Money(String),
    /// User identifier was empty or too long.
    #[error("invalid user id: {0}")]
    UserId(String),
    /// Product name was empty or too long.
    #[error("invalid product name: {0}")]
    ProductName(String),
}

/// A cart mutation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Adding to an existing line pushed its quantity past the allowed
    /// maximum.
    #[error("quantity limit exceeded for product {product_id}: {source}")]
    QuantityLimit {
        /// The line whose quantity overflowed.
        product_id: ProductId,
        /// The underlying range violation.
        source: ValidationError,
    },
    /// The recomputed cart total fell outside the representable range.
    #[error("cart total out of range: {0}")]
    TotalOutOfRange(ValidationError),
    /// An input failed validation before reaching the cart.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// A payment descriptor is missing or malformed.
///
/// Messages mirror the wire-level contract: each names the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// No payment method was supplied.
    #[error("payment method is required")]
    MissingMethod,
    /// The supplied payment method is not supported.
    #[error("unsupported payment method: {0}")]
    UnsupportedMethod(String),
    /// Card payments require a non-blank cardholder name.
    #[error("cardholder name is required")]
    MissingCardholderName,
    /// Card payments require exactly four decimal digits for `last4`.
    #[error("last4 is required (4 digits)")]
    InvalidLast4,
}

/// Errors surfaced by the product catalog collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),
    /// A conditional stock decrement found fewer units than requested.
    #[error(
        "insufficient stock for product {product_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        /// Product whose stock ran short.
        product_id: ProductId,
        /// Units currently available.
        available: u32,
        /// Units the caller asked for.
        requested: Quantity,
    },
    /// The catalog backend failed.
    #[error("catalog backend error: {0}")]
    Backend(String),
}

/// Errors surfaced by the cart and order persistence backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The storage backend failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Failures of the checkout unit of work.
///
/// By the time one of these is returned, any stock decrement already
/// applied has been compensated, so the caller observes all-or-nothing
/// semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// The cart is absent or holds no items.
    #[error("cart is empty")]
    EmptyCart,
    /// A cart line references a product that no longer exists.
    #[error("cart references missing product {product_id}")]
    ProductMissing {
        /// The vanished product.
        product_id: ProductId,
    },
    /// A cart line asks for more units than are currently in stock.
    #[error("insufficient stock for {name}: {available} available")]
    InsufficientStock {
        /// Product whose stock ran short.
        product_id: ProductId,
        /// Denormalized product name for the caller-facing message.
        name: String,
        /// Units currently available.
        available: u32,
        /// Units the cart line asked for.
        requested: Quantity,
    },
    /// Snapshotting a line into the order failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The catalog backend failed mid-flow.
    #[error(transparent)]
    Catalog(CatalogError),
    /// The cart or order store failed mid-flow.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result alias for cart/order store operations.
pub type StoreResult<T> = Result<T, StoreError>;
