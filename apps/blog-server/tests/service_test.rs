// tests/service_test.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use blog_server::app;
use blog_server::observability::REQUEST_ID_HEADER;
use blogicum_shared::HealthResponse;

use common::{TestContext, body_text};

#[actix_web::test]
async fn test_health_reports_ok_in_memory() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let health: HealthResponse = test::read_body_json(resp).await;
    assert_eq!(health.status, "ok");
    assert!(health.database);
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[actix_web::test]
async fn test_static_pages_render() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    for (uri, heading) in [("/pages/about/", "<h1>About</h1>"), ("/pages/rules/", "<h1>Rules</h1>")] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        assert!(body_text(resp).await.contains(heading));
    }
}

#[actix_web::test]
async fn test_unknown_route_renders_not_found_page() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/no/such/page/").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let request_id = resp
        .headers()
        .get(REQUEST_ID_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let body = body_text(resp).await;
    assert!(body.contains("The page you requested does not exist."));
    assert!(body.contains(&request_id));
}

#[actix_web::test]
async fn test_request_id_is_generated_or_propagated() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    let generated = resp.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
    assert!(!generated.is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/")
            .insert_header((REQUEST_ID_HEADER, "trace-me-123"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "trace-me-123");
}
