//! Admin category and product management.

#![allow(clippy::unwrap_used)]

use greenbasket_integration_tests::{create_category, create_product, test_pool};
use greenbasket_server::services::admin::{AdminError, AdminService, ProductInput};
use greenbasket_server::services::catalog::CatalogService;

use greenbasket_core::CategoryId;

#[tokio::test]
async fn category_crud_round_trip() {
    let pool = test_pool().await;
    let admin = AdminService::new(&pool);
    let catalog = CatalogService::new(&pool);

    let category = admin.create_category("Fruits").await.unwrap();
    assert_eq!(category.name, "Fruits");

    admin.rename_category(category.id, "Fresh Fruits").await.unwrap();
    assert_eq!(
        catalog.get_category(category.id).await.unwrap().name,
        "Fresh Fruits"
    );

    admin.delete_category(category.id).await.unwrap();
    assert!(catalog.get_category(category.id).await.is_err());
}

#[tokio::test]
async fn category_delete_refused_while_products_remain() {
    let pool = test_pool().await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;

    let admin = AdminService::new(&pool);

    let err = admin.delete_category(category.id).await.unwrap_err();
    assert!(matches!(err, AdminError::CategoryHasProducts));

    // After removing the product the delete goes through
    admin.delete_product(product.id).await.unwrap();
    admin.delete_category(category.id).await.unwrap();
}

#[tokio::test]
async fn category_operations_reject_blank_names_and_missing_ids() {
    let pool = test_pool().await;
    let admin = AdminService::new(&pool);

    let err = admin.create_category("").await.unwrap_err();
    assert!(matches!(err, AdminError::Validation(_)));

    let err = admin
        .rename_category(CategoryId::new(999), "Anything")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::CategoryNotFound));

    let err = admin.delete_category(CategoryId::new(999)).await.unwrap_err();
    assert!(matches!(err, AdminError::CategoryNotFound));
}

#[tokio::test]
async fn product_create_and_update() {
    let pool = test_pool().await;
    let category = create_category(&pool, "Fruits").await;
    let other = create_category(&pool, "Vegetables").await;

    let admin = AdminService::new(&pool);
    let catalog = CatalogService::new(&pool);

    let input = ProductInput::parse("Apples", "2.50", "10", "2024-01-15").unwrap();
    let product = admin.create_product(category.id, input).await.unwrap();
    assert_eq!(product.name, "Apples");
    assert_eq!(product.quantity, 10);

    // Move to another category with new values
    let input = ProductInput::parse("Green Apples", "2.75", "8", "2024-02-01").unwrap();
    admin.update_product(product.id, other.id, input).await.unwrap();

    let updated = catalog.get_product(product.id).await.unwrap();
    assert_eq!(updated.name, "Green Apples");
    assert_eq!(updated.category_id, other.id);
    assert_eq!(updated.price.to_string(), "2.75");

    assert!(catalog.products_in_category(category.id).await.unwrap().is_empty());
    assert_eq!(catalog.products_in_category(other.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn product_create_rejects_missing_category() {
    let pool = test_pool().await;
    let admin = AdminService::new(&pool);

    let input = ProductInput::parse("Apples", "2.50", "10", "2024-01-15").unwrap();
    let err = admin
        .create_product(CategoryId::new(999), input)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::CategoryNotFound));
}

#[tokio::test]
async fn category_search_is_case_insensitive() {
    let pool = test_pool().await;
    create_category(&pool, "Fruits").await;
    create_category(&pool, "Dried Fruits").await;
    create_category(&pool, "Dairy").await;

    let catalog = CatalogService::new(&pool);

    let hits = catalog.search_categories("fruit").await.unwrap();
    assert_eq!(hits.len(), 2);

    let all = catalog.search_categories("").await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn dashboard_counts_track_products() {
    let pool = test_pool().await;
    let fruits = create_category(&pool, "Fruits").await;
    let dairy = create_category(&pool, "Dairy").await;
    create_product(&pool, fruits.id, "Apples", "2.50", 10).await;
    create_product(&pool, fruits.id, "Bananas", "1.20", 5).await;

    let catalog = CatalogService::new(&pool);
    let counts = catalog.list_categories().await.unwrap();

    let fruits_row = counts.iter().find(|c| c.id == fruits.id).unwrap();
    let dairy_row = counts.iter().find(|c| c.id == dairy.id).unwrap();
    assert_eq!(fruits_row.product_count, 2);
    assert_eq!(dairy_row.product_count, 0);
}
