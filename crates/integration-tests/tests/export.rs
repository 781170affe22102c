//! Order-history CSV export.

#![allow(clippy::unwrap_used)]

use greenbasket_integration_tests::{create_category, create_product, create_user, test_pool};
use greenbasket_server::services::cart::CartService;
use greenbasket_server::services::checkout::CheckoutService;
use greenbasket_server::services::export::ExportService;

#[tokio::test]
async fn export_with_no_orders_is_header_only() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;

    let bytes = ExportService::new(&pool)
        .order_history_csv(user)
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(
        text.trim_end(),
        "transaction_id,datetime,product_name,quantity,price"
    );
}

#[tokio::test]
async fn export_contains_one_row_per_order() {
    let pool = test_pool().await;
    let user = create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let p1 = create_product(&pool, category.id, "Apples", "2.50", 10).await;
    let p2 = create_product(&pool, category.id, "Bananas", "1.20", 5).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(user, p1.id, 3).await.unwrap();
    carts.add_to_cart(user, p2.id, 2).await.unwrap();
    let transaction_id = CheckoutService::new(&pool).checkout(user).await.unwrap();

    let bytes = ExportService::new(&pool)
        .order_history_csv(user)
        .await
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();

    let lines: Vec<&str> = text.trim_end().lines().collect();
    assert_eq!(lines.len(), 3, "header plus two orders");
    assert_eq!(
        lines[0],
        "transaction_id,datetime,product_name,quantity,price"
    );

    let apples = lines.iter().find(|l| l.contains("Apples")).unwrap();
    assert!(apples.starts_with(&transaction_id.to_string()));
    assert!(apples.ends_with(",3,2.50"));

    let bananas = lines.iter().find(|l| l.contains("Bananas")).unwrap();
    assert!(bananas.ends_with(",2,1.20"));
}

#[tokio::test]
async fn export_is_scoped_to_the_requesting_user() {
    let pool = test_pool().await;
    let alice = create_user(&pool, "alice", "pw").await;
    let bob = create_user(&pool, "bob", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;

    let carts = CartService::new(&pool);
    carts.add_to_cart(alice, product.id, 1).await.unwrap();
    CheckoutService::new(&pool).checkout(alice).await.unwrap();

    let bytes = ExportService::new(&pool).order_history_csv(bob).await.unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert!(!text.contains("Apples"));
}
