//! Functional tests for the aggregate health check

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_gateway::{
    api,
    config::{LoggingConfig, ServerConfig, Settings, TimeoutConfig, UpstreamsConfig},
    AppState,
};

const DEAD_BACKEND: &str = "http://127.0.0.1:1";

fn test_app(products: &str, orders: &str, customers: &str, probe_ms: u64) -> Router {
    let settings = Settings {
        server: ServerConfig::default(),
        upstreams: UpstreamsConfig {
            products_url: products.to_string(),
            orders_url: orders.to_string(),
            customers_url: customers.to_string(),
        },
        timeouts: TimeoutConfig {
            request_ms: 500,
            probe_ms,
        },
        logging: LoggingConfig::default(),
    };
    let state = Arc::new(AppState::new(settings).unwrap());
    api::routes::create_router(state)
}

async fn check_health(app: Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn mock_listing(server: &MockServer, listing_path: &str) {
    Mock::given(method("GET"))
        .and(path(listing_path))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[]", "application/json"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health_all_up() {
    let products = MockServer::start().await;
    let orders = MockServer::start().await;
    let customers = MockServer::start().await;
    mock_listing(&products, "/products").await;
    mock_listing(&orders, "/orders").await;
    mock_listing(&customers, "/customers").await;

    let app = test_app(&products.uri(), &orders.uri(), &customers.uri(), 250);
    let (status, report) = check_health(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "up");
    for service in ["products", "orders", "customers"] {
        assert_eq!(report["services"][service]["status"], "up");
        assert_eq!(report["services"][service]["code"], 200);
    }
}

#[tokio::test]
async fn test_health_one_backend_down_degrades() {
    let orders = MockServer::start().await;
    let customers = MockServer::start().await;
    mock_listing(&orders, "/orders").await;
    mock_listing(&customers, "/customers").await;

    let app = test_app(DEAD_BACKEND, &orders.uri(), &customers.uri(), 250);
    let (status, report) = check_health(app).await;

    // One failing backend never turns the endpoint itself into an error
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["services"]["products"]["status"], "down");
    assert!(report["services"]["products"]["error"].is_string());
    assert_eq!(report["services"]["orders"]["status"], "up");
    assert_eq!(report["services"]["orders"]["code"], 200);
    assert_eq!(report["services"]["customers"]["status"], "up");
    assert_eq!(report["services"]["customers"]["code"], 200);
}

#[tokio::test]
async fn test_health_probe_timeout_marks_service_down() {
    let products = MockServer::start().await;
    let orders = MockServer::start().await;
    let customers = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("[]", "application/json")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&products)
        .await;
    mock_listing(&orders, "/orders").await;
    mock_listing(&customers, "/customers").await;

    let app = test_app(&products.uri(), &orders.uri(), &customers.uri(), 250);
    let (status, report) = check_health(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "degraded");
    assert_eq!(report["services"]["products"]["status"], "down");
    assert_eq!(report["services"]["orders"]["status"], "up");
}

#[tokio::test]
async fn test_health_all_down_still_returns_200() {
    let app = test_app(DEAD_BACKEND, DEAD_BACKEND, DEAD_BACKEND, 250);
    let (status, report) = check_health(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "degraded");
    for service in ["products", "orders", "customers"] {
        assert_eq!(report["services"][service]["status"], "down");
        assert!(report["services"][service]["error"].is_string());
    }
}

#[tokio::test]
async fn test_probes_run_concurrently() {
    // Three stalled backends must cost about one probe budget, not three
    let products = MockServer::start().await;
    let orders = MockServer::start().await;
    let customers = MockServer::start().await;
    for (server, listing_path) in [
        (&products, "/products"),
        (&orders, "/orders"),
        (&customers, "/customers"),
    ] {
        Mock::given(method("GET"))
            .and(path(listing_path))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
            .mount(server)
            .await;
    }

    let app = test_app(&products.uri(), &orders.uri(), &customers.uri(), 500);
    let started = Instant::now();
    let (status, report) = check_health(app).await;
    let elapsed = started.elapsed();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["status"], "degraded");
    assert!(
        elapsed < Duration::from_millis(1400),
        "three 500 ms probe timeouts took {:?}, expected them to overlap",
        elapsed
    );
}
