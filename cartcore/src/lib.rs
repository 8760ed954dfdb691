//! `Cartcore` - cart-to-order checkout core
//!
//! This library implements the domain core of a small shop: a per-user cart
//! whose total price is maintained as an invariant across every mutation, an
//! append-only order history, and a checkout flow that converts a cart into
//! an order as a compensating unit of work. Persistence is abstracted behind
//! async store traits so adapters (in-memory, database) can be swapped in.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cart;
pub mod checkout;
pub mod errors;
pub mod order;
pub mod payment;
pub mod product;
pub mod store;
pub mod types;

pub use cart::{Cart, CartItem};
pub use checkout::CheckoutFlow;
pub use errors::{
    CartError, CatalogError, CheckoutError, CheckoutResult, PaymentError, StoreError,
    ValidationError,
};
pub use order::{Order, OrderItem, OrderStatus};
pub use payment::{CardholderName, Last4, Payment};
pub use product::{Category, Product};
pub use store::{CartStore, OrderStore, ProductCatalog};
pub use types::{Money, OrderId, ProductId, Quantity, UserId};
