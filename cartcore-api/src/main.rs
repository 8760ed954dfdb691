//! Demo shop server: in-memory stores seeded with a few products.

use cartcore::product::{Category, ProductName};
use cartcore::{Money, Product, ProductId};
use cartcore_api::{router, AppState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn seed_catalog(state: &AppState) {
    let demo: [(&str, Decimal, u32, Category); 4] = [
        ("Mechanical Keyboard", dec!(89.99), 12, Category::Electronics),
        ("Trail Running Shoes", dec!(74.50), 8, Category::Sports),
        ("Single-Origin Coffee", dec!(14.00), 40, Category::Food),
        ("Linen Throw Blanket", dec!(39.95), 5, Category::Home),
    ];
    for (name, price, stock, category) in demo {
        let product = Product::new(
            ProductId::new(),
            ProductName::try_new(name.to_string()).expect("seed names are valid"),
            Money::new(price).expect("seed prices are valid"),
            stock,
            category,
        );
        info!(id = %product.id, name, "seeded product");
        state.catalog.insert(product);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = AppState::new();
    seed_catalog(&state);
    let app = router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!(%port, "cartcore-api listening");
    axum::serve(listener, app).await?;
    Ok(())
}
