//! Core domain types.
//!
//! All types use smart constructors so that a value, once obtained, is known
//! to be valid: quantities are at least 1, money amounts are non-negative
//! with at most two decimal places. Following the "parse, don't validate"
//! principle, invalid inputs are rejected at construction time instead of
//! being checked (or silently ignored) deep inside an operation.

use std::fmt::Display;
use std::str::FromStr;

use nutype::nutype;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Identifier of the user owning a cart or an order.
///
/// `UserId` values are guaranteed to be non-empty and at most 64 characters.
/// The identity provider that mints them is owned by the transport layer.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
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
pub struct UserId(String);

impl From<UserIdError> for ValidationError {
    fn from(err: UserIdError) -> Self {
        Self::UserId(err.to_string())
    }
}

/// Unique product identifier (UUIDv7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Creates a new unique product identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique order identifier (UUIDv7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new unique order identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Quantity of a product within a cart or order line.
///
/// Always at least 1; a line with zero quantity does not exist, it is
/// removed instead. Bounded above so a single line cannot overflow stock
/// arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quantity(u32);

impl Quantity {
    /// Maximum quantity allowed on a single line.
    pub const MAX_PER_LINE: u32 = 1_000;

    /// Creates a quantity, rejecting zero and values above
    /// [`Self::MAX_PER_LINE`].
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::Quantity(
                "quantity must be at least 1".to_string(),
            ));
        }
        if value > Self::MAX_PER_LINE {
            return Err(ValidationError::Quantity(format!(
                "quantity {value} exceeds maximum {}",
                Self::MAX_PER_LINE
            )));
        }
        Ok(Self(value))
    }

    /// Returns the underlying count.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Adds two quantities, rejecting results above [`Self::MAX_PER_LINE`].
    pub fn checked_add(self, other: Self) -> Result<Self, ValidationError> {
        let sum = self.0.checked_add(other.0).ok_or_else(|| {
            ValidationError::Quantity("quantity overflow".to_string())
        })?;
        Self::new(sum)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monetary amount backed by [`Decimal`] for exact arithmetic.
///
/// Guaranteed non-negative, at most two decimal places, and bounded by
/// [`Self::MAX_AMOUNT`] so sums over a cart cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    /// Upper bound for any single amount or total (100 million).
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Creates a money value from a decimal amount.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() {
            return Err(ValidationError::Money(format!(
                "amount cannot be negative: {amount}"
            )));
        }
        if amount.scale() > 2 {
            return Err(ValidationError::Money(format!(
                "amount cannot have more than 2 decimal places: {amount}"
            )));
        }
        if amount > Self::MAX_AMOUNT {
            return Err(ValidationError::Money(format!(
                "amount {amount} exceeds maximum {}",
                Self::MAX_AMOUNT
            )));
        }
        Ok(Self(amount))
    }

    /// The zero amount.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Adds two amounts, rejecting totals above [`Self::MAX_AMOUNT`].
    pub fn checked_add(self, other: Self) -> Result<Self, ValidationError> {
        Self::new(self.0 + other.0)
    }

    /// Multiplies this unit amount by a line quantity.
    pub fn times(self, quantity: Quantity) -> Result<Self, ValidationError> {
        Self::new(self.0 * Decimal::from(quantity.value()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
