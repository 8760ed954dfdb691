//! Request handlers for the cart and order surface.
//!
//! Each handler parses raw wire values into validated domain types, does
//! the catalog checks the original surface performs (product exists, stock
//! suffices, price captured at add time), and returns the
//! `{success, message?, data}` envelope.

use axum::extract::{Path, State};
use axum::Json;
use cartcore::store::{CartStore, OrderStore, ProductCatalog};
use cartcore::{Cart, Money, Order, OrderId, OrderItem, Payment, ProductId, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::AppState;

/// Success envelope: `{success: true, message?, data}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always `true`.
    pub success: bool,
    /// Optional human-readable note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The payload.
    pub data: T,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: None,
        data,
    })
}

fn ok_with<T>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: Some(message.to_string()),
        data,
    })
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("valid product id is required"))
}

async fn load_cart(state: &AppState, user: &CurrentUser) -> Result<Cart, ApiError> {
    state
        .carts
        .load(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cart not found"))
}

/// `GET /cart`: the caller's cart, created empty on first access.
pub async fn get_cart(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Envelope<Cart>>, ApiError> {
    let cart = match state.carts.load(&user.id).await? {
        Some(cart) => cart,
        None => {
            let cart = Cart::new(user.id.clone());
            state.carts.save(&cart).await?;
            cart
        }
    };
    Ok(ok(cart))
}

/// Body of `POST /cart/items`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    /// The product to add.
    pub product_id: Option<String>,
    /// How many units.
    pub quantity: Option<u32>,
}

/// `POST /cart/items`: validates against the catalog, captures the current
/// price, and adds the line.
pub async fn add_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<Envelope<Cart>>, ApiError> {
    let (Some(raw_id), Some(raw_quantity)) = (body.product_id, body.quantity) else {
        return Err(ApiError::bad_request("Product ID and quantity are required"));
    };
    let product_id = parse_product_id(&raw_id)?;
    let quantity = Quantity::new(raw_quantity)?;

    let product = state
        .catalog
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    if product.stock < quantity.value() {
        return Err(ApiError::conflict(format!(
            "Only {} items available in stock",
            product.stock
        )));
    }

    let mut cart = match state.carts.load(&user.id).await? {
        Some(cart) => cart,
        None => Cart::new(user.id.clone()),
    };
    cart.add_item(product_id, quantity, product.price)?;
    state.carts.save(&cart).await?;

    Ok(ok_with("Item added to cart", cart))
}

/// Body of `PUT /cart/items/{product_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New exact quantity; 0 removes the line.
    pub quantity: Option<u32>,
}

/// `PUT /cart/items/{product_id}`: sets a line's quantity exactly; 0
/// removes it.
pub async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Envelope<Cart>>, ApiError> {
    let product_id = parse_product_id(&raw_id)?;
    let quantity = body
        .quantity
        .ok_or_else(|| ApiError::bad_request("Valid quantity is required"))?;

    let mut cart = load_cart(&state, &user).await?;

    if quantity > 0 {
        let product = state
            .catalog
            .get(product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;
        if product.stock < quantity {
            return Err(ApiError::conflict(format!(
                "Only {} items available",
                product.stock
            )));
        }
    }

    cart.update_item_quantity(product_id, quantity)?;
    state.carts.save(&cart).await?;

    Ok(ok_with("Cart updated", cart))
}

/// `DELETE /cart/items/{product_id}`: removes a line; absent lines are a
/// no-op.
pub async fn remove_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Json<Envelope<Cart>>, ApiError> {
    let product_id = parse_product_id(&raw_id)?;
    let mut cart = load_cart(&state, &user).await?;

    cart.remove_item(product_id);
    state.carts.save(&cart).await?;

    Ok(ok_with("Item removed from cart", cart))
}

/// `DELETE /cart`: empties the cart.
pub async fn clear_cart(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Envelope<Cart>>, ApiError> {
    let mut cart = load_cart(&state, &user).await?;

    cart.clear();
    state.carts.save(&cart).await?;

    Ok(ok_with("Cart cleared", cart))
}

/// Body of `POST /cart/checkout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// Payment method; only `card` is supported.
    pub payment_method: Option<String>,
    /// Name on the card.
    pub cardholder_name: Option<String>,
    /// Last four digits of the card number.
    pub last4: Option<String>,
}

/// Wire shape of a completed checkout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// The created order's id.
    pub order_id: OrderId,
    /// The purchased lines.
    pub items: Vec<OrderItem>,
    /// Total charged.
    pub total_price: Money,
    /// How the buyer paid.
    pub payment: Payment,
    /// When the purchase completed.
    pub purchased_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            items: order.items,
            total_price: order.total_price,
            payment: order.payment,
            purchased_at: order.created_at,
        }
    }
}

/// `POST /cart/checkout`: runs the checkout unit of work.
pub async fn checkout(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<Envelope<OrderSummary>>, ApiError> {
    let payment = Payment::parse(
        body.payment_method.as_deref(),
        body.cardholder_name.as_deref(),
        body.last4.as_deref(),
    )?;

    let order = state.checkout.checkout(&user.id, payment).await?;

    Ok(ok_with("Purchase successful!", OrderSummary::from(order)))
}

/// `GET /orders/my`: the caller's orders, newest first.
pub async fn my_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Envelope<Vec<Order>>>, ApiError> {
    let orders = state.orders.for_user(&user.id).await?;
    Ok(ok(orders))
}

/// `GET /orders`: all orders with purchaser identity, admin only.
pub async fn all_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Envelope<Vec<Order>>>, ApiError> {
    if !user.is_admin() {
        return Err(ApiError::forbidden("admin access required"));
    }
    let orders = state.orders.all().await?;
    Ok(ok(orders))
}
