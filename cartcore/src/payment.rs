//! Payment descriptors attached to orders.
//!
//! The shop is a demo: no payment gateway is called. A descriptor records
//! what the buyer claimed to pay with, validated just enough to keep the
//! order history coherent. Card is the only supported method today; the
//! enum is tagged by method name on the wire so adding methods later does
//! not break stored orders.

use nutype::nutype;
use serde::{Deserialize, Serialize};

use crate::errors::PaymentError;

/// Cardholder name: non-blank, at most 100 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct CardholderName(String);

/// The last four digits of a card number: exactly four ASCII digits.
#[nutype(
    sanitize(trim),
    validate(predicate = |s| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize,
        TryFrom
    )
)]
pub struct Last4(String);

/// A validated payment descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Payment {
    /// Card payment, identified by cardholder name and the card's last four
    /// digits.
    Card {
        /// Name on the card, non-blank.
        cardholder_name: CardholderName,
        /// Exactly four decimal digits.
        last4: Last4,
    },
}

impl Payment {
    /// Builds a card descriptor from raw field values.
    pub fn card(cardholder_name: &str, last4: &str) -> Result<Self, PaymentError> {
        let cardholder_name = CardholderName::try_new(cardholder_name.to_string())
            .map_err(|_| PaymentError::MissingCardholderName)?;
        let last4 =
            Last4::try_new(last4.to_string()).map_err(|_| PaymentError::InvalidLast4)?;
        Ok(Self::Card {
            cardholder_name,
            last4,
        })
    }

    /// Parses a raw request-shaped descriptor: an optional method string
    /// plus optional card fields.
    ///
    /// This is the single entry point for untrusted payment input; checkout
    /// itself only ever sees descriptors that passed through here.
    pub fn parse(
        method: Option<&str>,
        cardholder_name: Option<&str>,
        last4: Option<&str>,
    ) -> Result<Self, PaymentError> {
        match method.map(str::trim) {
            None | Some("") => Err(PaymentError::MissingMethod),
            Some("card") => Self::card(
                cardholder_name.unwrap_or_default(),
                last4.unwrap_or_default(),
            ),
            Some(other) => Err(PaymentError::UnsupportedMethod(other.to_string())),
        }
    }
}
