//! Route-level tests against the assembled router.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;

use greenbasket_integration_tests::{
    create_admin, create_category, create_product, create_user, test_pool,
};
use greenbasket_server::config::ServerConfig;
use greenbasket_server::middleware::session::create_session_layer;
use greenbasket_server::state::AppState;

async fn test_app(pool: SqlitePool) -> Router {
    let config = ServerConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: None,
    };

    let session_layer = create_session_layer(&pool, &config).await.unwrap();
    greenbasket_server::app(AppState::new(config, pool), session_layer)
}

/// Log in through the router and return the session cookie.
async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::post("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = test_app(test_pool().await).await;

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_pages_redirect_anonymous_users_to_login() {
    let app = test_app(test_pool().await).await;

    for path in ["/", "/cart", "/orders", "/profile", "/admin"] {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/login",
            "{path}"
        );
    }
}

#[tokio::test]
async fn admin_pages_turn_away_regular_users() {
    let pool = test_pool().await;
    create_user(&pool, "shopper", "pw").await;
    let app = test_app(pool).await;

    let cookie = login(&app, "shopper", "pw").await;

    let response = app
        .oneshot(
            Request::get("/admin")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.starts_with("/?error="), "got {location}");
}

#[tokio::test]
async fn admin_dashboard_loads_for_admins() {
    let pool = test_pool().await;
    create_admin(&pool, "boss", "pw").await;
    create_category(&pool, "Fruits").await;
    let app = test_app(pool).await;

    let cookie = login(&app, "boss", "pw").await;

    let response = app
        .oneshot(
            Request::get("/admin")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Fruits"));
}

#[tokio::test]
async fn category_api_returns_json_without_auth() {
    let pool = test_pool().await;
    create_category(&pool, "Fruits").await;
    create_category(&pool, "Dairy").await;
    let app = test_app(pool).await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/category?q=fru")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let names: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Fruits"]);
}

#[tokio::test]
async fn non_numeric_cart_quantity_flashes_an_error() {
    let pool = test_pool().await;
    create_user(&pool, "shopper", "pw").await;
    let category = create_category(&pool, "Fruits").await;
    let product = create_product(&pool, category.id, "Apples", "2.50", 10).await;
    let app = test_app(pool).await;

    let cookie = login(&app, "shopper", "pw").await;

    let response = app
        .oneshot(
            Request::post(format!("/add_to_cart/{}", product.id))
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("quantity=abc"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/?error=Invalid%20quantity"
    );
}

#[tokio::test]
async fn export_csv_sets_download_headers() {
    let pool = test_pool().await;
    create_user(&pool, "shopper", "pw").await;
    let app = test_app(pool).await;

    let cookie = login(&app, "shopper", "pw").await;

    let response = app
        .oneshot(
            Request::get("/export_csv")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("attachment")
    );
}
