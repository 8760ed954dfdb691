//! End-to-end tests for the checkout unit of work over the in-memory
//! stores: all-or-nothing semantics, compensation, and the oversell race.

use async_trait::async_trait;
use cartcore::errors::{CatalogError, CatalogResult, CheckoutError, StoreError, StoreResult};
use cartcore::product::{Category, ProductName};
use cartcore::store::{OrderStore, ProductCatalog};
use cartcore::{
    Cart, CheckoutFlow, Money, Order, Payment, Product, ProductId, Quantity, UserId,
};
use cartcore_memory::{InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn user(name: &str) -> UserId {
    UserId::try_new(name.to_string()).unwrap()
}

fn payment() -> Payment {
    Payment::card("Ada Lovelace", "4242").unwrap()
}

fn seed_product(catalog: &InMemoryCatalog, name: &str, price: Decimal, stock: u32) -> ProductId {
    let product = Product::new(
        ProductId::new(),
        ProductName::try_new(name.to_string()).unwrap(),
        Money::new(price).unwrap(),
        stock,
        Category::Other,
    );
    let id = product.id;
    catalog.insert(product);
    id
}

async fn seed_cart(
    carts: &InMemoryCartStore,
    catalog: &InMemoryCatalog,
    owner: &UserId,
    lines: &[(ProductId, u32)],
) {
    use cartcore::store::CartStore;

    let mut cart = Cart::new(owner.clone());
    for (product_id, quantity) in lines {
        let product = catalog.get(*product_id).await.unwrap().unwrap();
        cart.add_item(*product_id, Quantity::new(*quantity).unwrap(), product.price)
            .unwrap();
    }
    carts.save(&cart).await.unwrap();
}

fn flow(
    carts: &InMemoryCartStore,
    catalog: &InMemoryCatalog,
    orders: &InMemoryOrderStore,
) -> CheckoutFlow<InMemoryCartStore, InMemoryCatalog, InMemoryOrderStore> {
    CheckoutFlow::new(carts.clone(), catalog.clone(), orders.clone())
}

#[tokio::test]
async fn checkout_of_absent_or_empty_cart_fails_and_creates_no_order() {
    let (carts, catalog, orders) = (
        InMemoryCartStore::new(),
        InMemoryCatalog::new(),
        InMemoryOrderStore::new(),
    );
    let flow = flow(&carts, &catalog, &orders);
    let alice = user("alice");

    // No cart at all.
    let err = flow.checkout(&alice, payment()).await.unwrap_err();
    assert_eq!(err, CheckoutError::EmptyCart);

    // A cart with zero items.
    use cartcore::store::CartStore;
    carts.save(&Cart::new(alice.clone())).await.unwrap();
    let err = flow.checkout(&alice, payment()).await.unwrap_err();
    assert_eq!(err, CheckoutError::EmptyCart);

    assert!(orders.is_empty());
}

#[tokio::test]
async fn successful_checkout_snapshots_the_cart_and_decrements_stock() {
    let (carts, catalog, orders) = (
        InMemoryCartStore::new(),
        InMemoryCatalog::new(),
        InMemoryOrderStore::new(),
    );
    let alice = user("alice");
    let product_a = seed_product(&catalog, "Alpha Widget", dec!(10.00), 7);
    let product_b = seed_product(&catalog, "Beta Widget", dec!(5.00), 4);
    seed_cart(&carts, &catalog, &alice, &[(product_a, 2), (product_b, 1)]).await;

    let order = flow(&carts, &catalog, &orders)
        .checkout(&alice, payment())
        .await
        .unwrap();

    assert_eq!(order.total_price, Money::new(dec!(25.00)).unwrap());
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].product_id, product_a);
    assert_eq!(order.items[0].total, Money::new(dec!(20.00)).unwrap());
    assert_eq!(order.items[0].name.as_ref(), "Alpha Widget");
    assert_eq!(order.items[1].total, Money::new(dec!(5.00)).unwrap());
    assert_eq!(order.status.to_string(), "paid");

    assert_eq!(catalog.stock_of(product_a), Some(5));
    assert_eq!(catalog.stock_of(product_b), Some(3));

    use cartcore::store::CartStore;
    let cart = carts.load(&alice).await.unwrap().unwrap();
    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Money::zero());

    let history = orders.for_user(&alice).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, order.id);
}

#[tokio::test]
async fn short_stock_on_any_line_fails_without_writing_anything() {
    let (carts, catalog, orders) = (
        InMemoryCartStore::new(),
        InMemoryCatalog::new(),
        InMemoryOrderStore::new(),
    );
    let alice = user("alice");
    let plenty = seed_product(&catalog, "Plenty", dec!(2.00), 100);
    let scarce = seed_product(&catalog, "Scarce", dec!(9.00), 1);
    seed_cart(&carts, &catalog, &alice, &[(plenty, 3), (scarce, 2)]).await;

    let err = flow(&carts, &catalog, &orders)
        .checkout(&alice, payment())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CheckoutError::InsufficientStock {
            product_id: scarce,
            name: "Scarce".to_string(),
            available: 1,
            requested: Quantity::new(2).unwrap(),
        }
    );
    // Nothing moved: no decrement on any line, no order, cart intact.
    assert_eq!(catalog.stock_of(plenty), Some(100));
    assert_eq!(catalog.stock_of(scarce), Some(1));
    assert!(orders.is_empty());

    use cartcore::store::CartStore;
    let cart = carts.load(&alice).await.unwrap().unwrap();
    assert_eq!(cart.items().len(), 2);
}

#[tokio::test]
async fn vanished_product_fails_checkout_naming_it() {
    let (carts, catalog, orders) = (
        InMemoryCartStore::new(),
        InMemoryCatalog::new(),
        InMemoryOrderStore::new(),
    );
    let alice = user("alice");
    let ghost = ProductId::new();

    use cartcore::store::CartStore;
    let mut cart = Cart::new(alice.clone());
    cart.add_item(
        ghost,
        Quantity::new(1).unwrap(),
        Money::new(dec!(1.00)).unwrap(),
    )
    .unwrap();
    carts.save(&cart).await.unwrap();

    let err = flow(&carts, &catalog, &orders)
        .checkout(&alice, payment())
        .await
        .unwrap_err();

    assert_eq!(err, CheckoutError::ProductMissing { product_id: ghost });
    assert!(orders.is_empty());
}

/// Order store whose append always fails, for exercising compensation.
#[derive(Clone)]
struct BrokenOrderStore;

#[async_trait]
impl OrderStore for BrokenOrderStore {
    async fn append(&self, _order: Order) -> StoreResult<()> {
        Err(StoreError::Backend("order store unavailable".to_string()))
    }

    async fn for_user(&self, _user_id: &UserId) -> StoreResult<Vec<Order>> {
        Ok(Vec::new())
    }

    async fn all(&self) -> StoreResult<Vec<Order>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn failed_order_append_restores_stock_and_cart() {
    let (carts, catalog) = (InMemoryCartStore::new(), InMemoryCatalog::new());
    let alice = user("alice");
    let product = seed_product(&catalog, "Gamma Widget", dec!(8.00), 6);
    seed_cart(&carts, &catalog, &alice, &[(product, 4)]).await;

    let flow = CheckoutFlow::new(carts.clone(), catalog.clone(), BrokenOrderStore);
    let err = flow.checkout(&alice, payment()).await.unwrap_err();

    assert_eq!(
        err,
        CheckoutError::Store(StoreError::Backend("order store unavailable".to_string()))
    );
    // Decrements were compensated and the cart re-saved as it was.
    assert_eq!(catalog.stock_of(product), Some(6));

    use cartcore::store::CartStore;
    let cart = carts.load(&alice).await.unwrap().unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.total_price(), Money::new(dec!(32.00)).unwrap());
}

/// Catalog double that delegates to the real in-memory catalog but fails
/// the conditional decrement for one product, the way a concurrent
/// checkout winning the race between revalidation and decrement would.
#[derive(Clone)]
struct ContendedCatalog {
    inner: InMemoryCatalog,
    contended: ProductId,
}

#[async_trait]
impl ProductCatalog for ContendedCatalog {
    async fn get(&self, product_id: ProductId) -> CatalogResult<Option<Product>> {
        self.inner.get(product_id).await
    }

    async fn decrement_stock(
        &self,
        product_id: ProductId,
        amount: Quantity,
    ) -> CatalogResult<u32> {
        if product_id == self.contended {
            return Err(CatalogError::InsufficientStock {
                product_id,
                available: 0,
                requested: amount,
            });
        }
        self.inner.decrement_stock(product_id, amount).await
    }

    async fn restore_stock(&self, product_id: ProductId, amount: Quantity) -> CatalogResult<u32> {
        self.inner.restore_stock(product_id, amount).await
    }
}

#[tokio::test]
async fn failed_decrement_on_a_later_line_restores_earlier_decrements() {
    let (carts, inner, orders) = (
        InMemoryCartStore::new(),
        InMemoryCatalog::new(),
        InMemoryOrderStore::new(),
    );
    let alice = user("alice");
    let first = seed_product(&inner, "Delta Widget", dec!(3.00), 5);
    let second = seed_product(&inner, "Epsilon Widget", dec!(7.00), 3);
    seed_cart(&carts, &inner, &alice, &[(first, 2), (second, 1)]).await;

    let catalog = ContendedCatalog {
        inner: inner.clone(),
        contended: second,
    };
    let flow = CheckoutFlow::new(carts.clone(), catalog, orders.clone());
    let err = flow.checkout(&alice, payment()).await.unwrap_err();

    assert_eq!(
        err,
        CheckoutError::InsufficientStock {
            product_id: second,
            name: "Epsilon Widget".to_string(),
            available: 0,
            requested: Quantity::new(1).unwrap(),
        }
    );
    // The first line's decrement was applied and then restored; the
    // contended line was never written.
    assert_eq!(inner.stock_of(first), Some(5));
    assert_eq!(inner.stock_of(second), Some(3));
    assert!(orders.is_empty());

    use cartcore::store::CartStore;
    let cart = carts.load(&alice).await.unwrap().unwrap();
    assert_eq!(cart.items().len(), 2);
    assert_eq!(cart.total_price(), Money::new(dec!(13.00)).unwrap());
}

#[tokio::test]
async fn concurrent_checkouts_cannot_oversell_the_last_unit() {
    let (carts, catalog, orders) = (
        InMemoryCartStore::new(),
        InMemoryCatalog::new(),
        InMemoryOrderStore::new(),
    );
    let product = seed_product(&catalog, "Last One", dec!(50.00), 1);
    let alice = user("alice");
    let bob = user("bob");
    seed_cart(&carts, &catalog, &alice, &[(product, 1)]).await;
    seed_cart(&carts, &catalog, &bob, &[(product, 1)]).await;

    let flow_a = flow(&carts, &catalog, &orders);
    let flow_b = flow(&carts, &catalog, &orders);
    let (left, right) = tokio::join!(
        flow_a.checkout(&alice, payment()),
        flow_b.checkout(&bob, payment())
    );

    let successes = [&left, &right].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one buyer gets the last unit");
    assert_eq!(catalog.stock_of(product), Some(0));
    assert_eq!(orders.len(), 1);

    // The loser saw the typed conflict, not a silent oversell.
    let failure = if left.is_err() { left } else { right };
    assert!(matches!(
        failure.unwrap_err(),
        CheckoutError::InsufficientStock { .. }
    ));
}
