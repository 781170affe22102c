//! Cart behavior and checkout atomicity.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use greenbasket_integration_tests::{
    create_admin, create_category, create_product, create_user, stock_of, test_pool,
};
use greenbasket_server::db::orders::OrderRepository;
use greenbasket_server::services::cart::{CartError, CartService};
use greenbasket_server::services::checkout::{CheckoutError, CheckoutService};

#[tokio::test]
async fn adding_same_product_twice_merges_into_one_line() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(user, product.id, 2).await.unwrap();
    carts.add_to_cart(user, product.id, 2).await.unwrap();

    let summary = carts.list_cart(user).await.unwrap();
    assert_eq!(summary.lines.len(), 1, "merge must not create a second line");
    assert_eq!(summary.lines[0].quantity, 4);
    assert_eq!(summary.total, Decimal::new(1000, 2)); // 4 * 2.50
}

#[tokio::test]
async fn add_rejects_quantity_beyond_stock() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 5).await;

    let carts = CartService::new(&pool);

    let err = carts.add_to_cart(user, product.id, 6).await.unwrap_err();
    assert!(matches!(err, CartError::InsufficientStock { .. }));

    // Merging past the stock limit is also rejected
    carts.add_to_cart(user, product.id, 3).await.unwrap();
    let err = carts.add_to_cart(user, product.id, 3).await.unwrap_err();
    assert!(matches!(err, CartError::InsufficientStock { available: 5, .. }));

    let err = carts.add_to_cart(user, product.id, 0).await.unwrap_err();
    assert!(matches!(err, CartError::InvalidQuantity(_)));
}

#[tokio::test]
async fn remove_line_enforces_ownership() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", "pw").await;
    let mallory = create_user(&pool, "mallory", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(alice, product.id, 1).await.unwrap();
    let line_id = carts.list_cart(alice).await.unwrap().lines[0].id;

    let err = carts.remove_line(line_id, mallory).await.unwrap_err();
    assert!(matches!(err, CartError::NotLineOwner));

    carts.remove_line(line_id, alice).await.unwrap();
    assert!(carts.list_cart(alice).await.unwrap().lines.is_empty());
}

#[tokio::test]
async fn checkout_of_empty_cart_fails() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;

    let err = CheckoutService::new(&pool).checkout(user).await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));
}

#[tokio::test]
async fn checkout_is_all_or_nothing() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let p1 = create_product(&pool, category.id, "Apples", "2.50", 10).await;
    let p2 = create_product(&pool, category.id, "Bananas", "1.20", 5).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(user, p1.id, 3).await.unwrap();
    carts.add_to_cart(user, p2.id, 5).await.unwrap();

    // An admin restock-down after the lines were added
    sqlx::query("UPDATE products SET quantity = 4 WHERE id = ?1")
        .bind(p2.id)
        .execute(&pool)
        .await
        .unwrap();

    let err = CheckoutService::new(&pool).checkout(user).await.unwrap_err();
    assert!(matches!(err, CheckoutError::InsufficientStock { .. }));

    // Nothing changed: stock intact, cart intact, no orders
    assert_eq!(stock_of(&pool, p1.id).await, 10);
    assert_eq!(stock_of(&pool, p2.id).await, 4);
    assert_eq!(carts.list_cart(user).await.unwrap().lines.len(), 2);
    assert!(
        OrderRepository::new(&pool)
            .history(user)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn checkout_decrements_stock_and_clears_cart() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let p1 = create_product(&pool, category.id, "Apples", "2.50", 10).await;
    let p2 = create_product(&pool, category.id, "Bananas", "1.20", 5).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(user, p1.id, 3).await.unwrap();
    carts.add_to_cart(user, p2.id, 2).await.unwrap();

    let transaction_id = CheckoutService::new(&pool).checkout(user).await.unwrap();

    assert_eq!(stock_of(&pool, p1.id).await, 7);
    assert_eq!(stock_of(&pool, p2.id).await, 3);
    assert!(carts.list_cart(user).await.unwrap().lines.is_empty());

    let history = OrderRepository::new(&pool).history(user).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|e| e.transaction_id == transaction_id));

    let apples = history.iter().find(|e| e.product_name == "Apples").unwrap();
    assert_eq!(apples.quantity, 3);
    assert_eq!(apples.price.to_string(), "2.50");
}

#[tokio::test]
async fn order_history_survives_product_deletion() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let admin = create_admin(&pool, "boss", "pw").await;
    let _ = admin;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(user, product.id, 2).await.unwrap();
    CheckoutService::new(&pool).checkout(user).await.unwrap();

    // Delete the product; its name and price were snapshotted at checkout
    greenbasket_server::services::admin::AdminService::new(&pool)
        .delete_product(product.id)
        .await
        .unwrap();

    let history = OrderRepository::new(&pool).history(user).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].product_name, "Apples");
    assert_eq!(history[0].price.to_string(), "2.50");
}

#[tokio::test]
async fn product_deletion_drops_it_from_carts() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(user, product.id, 2).await.unwrap();

    greenbasket_server::services::admin::AdminService::new(&pool)
        .delete_product(product.id)
        .await
        .unwrap();

    assert!(carts.list_cart(user).await.unwrap().lines.is_empty());
}
