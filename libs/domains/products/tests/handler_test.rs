//! Handler tests for the products domain
//!
//! Exercise the `/produtos` routes end to end against the in-memory store:
//! status codes, response envelopes, identifier and timestamp handling,
//! and price-range listing.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashSet;
use tower::ServiceExt; // For oneshot()

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app() -> (Router, ProductService<InMemoryProductRepository>) {
    let service = ProductService::new(InMemoryProductRepository::new());
    (handlers::router(service.clone()), service)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn create(app: &Router, name: &str, price: f64) -> Product {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/produtos",
            json!({ "name": name, "price": price, "description": format!("{} description", name) }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ProductResponse = json_body(response.into_body()).await;
    body.product
}

async fn list(app: &Router, uri: &str) -> Vec<Product> {
    let response = app.clone().oneshot(get(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: ProductListResponse = json_body(response.into_body()).await;
    body.products
}

#[tokio::test]
async fn test_create_returns_envelope() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/produtos",
            json!({ "name": "Widget", "price": 50, "description": "A widget" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Product created successfully");
    let product = &body["product"];
    assert_eq!(product["name"], "Widget");
    assert_eq!(product["price"].as_f64(), Some(50.0));
    assert_eq!(product["description"], "A widget");
    assert!(product["updatedAt"].is_string());
    let id = product["identifier"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let listed = list(&app, "/produtos?priceMin=10&priceMax=100").await;
    assert!(listed.iter().any(|p| p.identifier == id));

    let listed = list(&app, "/produtos?priceMin=50&priceMax=100").await;
    assert!(listed.iter().all(|p| p.identifier != id));
}

#[tokio::test]
async fn test_widget_scenario() {
    let (app, _) = app();
    let created = create(&app, "Widget", 50.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/produtos/{}", created.identifier),
            json!({ "name": "Widget v2", "price": 75, "description": "A widget" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = list(&app, "/produtos?priceMin=0&priceMax=100").await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Widget v2");
    assert_eq!(listed[0].price, 75.0);

    assert!(list(&app, "/produtos?priceMin=75&priceMax=100").await.is_empty());
}

#[tokio::test]
async fn test_identifiers_are_distinct() {
    let (app, _) = app();

    let mut seen = HashSet::new();
    for i in 0..20 {
        let product = create(&app, &format!("item-{}", i), 10.0).await;
        assert!(seen.insert(product.identifier));
    }
}

#[tokio::test]
async fn test_create_then_update_round_trip() {
    let (app, _) = app();
    let created = create(&app, "Widget", 50.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/produtos/{}", created.identifier),
            json!({ "name": "Gadget", "price": 75.5, "description": "A gadget" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Product updated successfully");
    assert_eq!(body.product.identifier, created.identifier);
    assert_eq!(body.product.name, "Gadget");
    assert_eq!(body.product.price, 75.5);
    assert_eq!(body.product.description, "A gadget");
    assert!(body.product.updated_at >= created.updated_at);

    let listed = list(&app, "/produtos").await;
    assert_eq!(listed, vec![body.product]);
}

#[tokio::test]
async fn test_update_unknown_identifier_returns_404() {
    let (app, service) = app();
    create(&app, "Widget", 50.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/produtos/000000000000000000000000",
            json!({ "name": "Ghost", "price": 1, "description": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("000000000000000000000000")
    );

    let all = service.list_products(PriceRange::default()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Widget");
}

#[tokio::test]
async fn test_update_requires_every_field() {
    let (app, _) = app();
    let created = create(&app, "Widget", 50.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/produtos/{}", created.identifier),
            json!({ "name": "Widget", "price": 50 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let listed = list(&app, "/produtos").await;
    assert_eq!(listed[0].description, "Widget description");
}

#[tokio::test]
async fn test_client_timestamp_and_identifier_are_ignored() {
    let (app, _) = app();
    let created = create(&app, "Widget", 50.0).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/produtos/{}", created.identifier),
            json!({
                "name": "Widget",
                "price": 60,
                "description": "A widget",
                "identifier": "hijacked",
                "updatedAt": "2001-01-01T00:00:00Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: ProductResponse = json_body(response.into_body()).await;
    assert_eq!(body.product.identifier, created.identifier);
    assert!(body.product.updated_at >= created.updated_at);
    assert_ne!(body.product.updated_at.to_rfc3339(), "2001-01-01T00:00:00+00:00");
}

#[tokio::test]
async fn test_price_bounds_are_exclusive() {
    let (app, _) = app();
    for price in [10.0, 15.0, 20.0] {
        create(&app, &format!("p{}", price), price).await;
    }

    let listed = list(&app, "/produtos?priceMin=10&priceMax=20").await;
    let prices: Vec<f64> = listed.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![15.0]);
}

#[tokio::test]
async fn test_default_range_excludes_zero_price() {
    let (app, _) = app();
    create(&app, "free", 0.0).await;
    create(&app, "cheap", 0.5).await;

    let listed = list(&app, "/produtos").await;
    let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["cheap"]);
}

#[tokio::test]
async fn test_list_is_capped_at_100() {
    let (app, service) = app();
    for i in 1..=150 {
        let input = ProductInput {
            name: format!("bulk-{}", i),
            price: i as f64,
            description: String::new(),
        };
        service.create_product(input).await.unwrap();
    }

    let listed = list(&app, "/produtos").await;
    assert_eq!(listed.len(), LIST_LIMIT as usize);
    assert_eq!(listed[0].name, "bulk-1");
}

#[tokio::test]
async fn test_inverted_range_returns_empty_list() {
    let (app, _) = app();
    create(&app, "Widget", 50.0).await;

    let listed = list(&app, "/produtos?priceMin=100&priceMax=10").await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_trailing_slash_routes() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/produtos/",
            json!({ "name": "Slash", "price": 5, "description": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listed = list(&app, "/produtos/").await;
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (app, _) = app();

    let request = Request::builder()
        .method("POST")
        .uri("/produtos")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": \"Widget\", "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_JSON");

    assert!(list(&app, "/produtos").await.is_empty());
}

#[tokio::test]
async fn test_wrong_field_type_returns_400() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/produtos",
            json!({ "name": "Widget", "price": "fifty", "description": "A widget" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_numeric_query_returns_400() {
    let (app, _) = app();

    let response = app
        .clone()
        .oneshot(get("/produtos?priceMin=cheap"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_non_finite_price_bound_returns_400() {
    let (app, _) = app();
    create(&app, "Widget", 50.0).await;

    for uri in [
        "/produtos?priceMin=NaN&priceMax=100",
        "/produtos?priceMin=0&priceMax=inf",
        "/produtos?priceMax=-inf",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = json_body(response.into_body()).await;
        assert_eq!(body["error"], "INVALID_QUERY", "{}", uri);
    }

    assert_eq!(list(&app, "/produtos?priceMin=0&priceMax=100").await.len(), 1);
}
