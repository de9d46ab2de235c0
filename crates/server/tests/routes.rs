//! Router integration tests
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use clap::Parser;
use scrivener_server::{AppState, Config, app};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("../../tests/fixtures/{}", name)).unwrap()
}

fn test_app(args: &[&str]) -> Router {
    let argv = std::iter::once("scrivener-server").chain(args.iter().copied());
    let config = Config::parse_from(argv);
    let state = AppState::from_config(&config).unwrap();
    app(state, &config).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

async fn mount_page(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET")).and(path(route)).respond_with(template).mount(server).await;
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).insert_header("content-type", "text/html; charset=utf-8").set_body_string(body)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(test_app(&[]), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_extract_fixture() {
    let server = MockServer::start().await;
    mount_page(&server, "/2024/05/sourdough", html_response(get_fixture("blog_post.html"))).await;

    let url = format!("{}/2024/05/sourdough", server.uri());
    let (status, body) = send(test_app(&[]), post_json("/api/extract", json!({ "url": url }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Baking Sourdough at Home - Crumbjournal");
    assert_eq!(body["thumbnailUrl"], format!("{}/uploads/2024/05/loaf-hero.jpg", server.uri()));

    let content = body["content"].as_str().unwrap();
    assert!(content.contains("Feeding the starter"));
    assert!(!content.contains("Advertisement"));
    assert!(!content.contains("Great recipe"));
}

#[tokio::test]
async fn test_extract_null_thumbnail_is_present() {
    let server = MockServer::start().await;
    let html = format!("<html><body><article><p>{}</p></article></body></html>", "word ".repeat(60));
    mount_page(&server, "/plain", html_response(html)).await;

    let url = format!("{}/plain", server.uri());
    let (status, body) = send(test_app(&[]), post_json("/api/extract", json!({ "url": url }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Untitled Post");
    assert!(body.get("thumbnailUrl").is_some_and(Value::is_null));
}

#[tokio::test]
async fn test_extract_invalid_url() {
    let (status, body) = send(test_app(&[]), post_json("/api/extract", json!({ "url": "not a url" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_url");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid URL"));
}

#[tokio::test]
async fn test_extract_missing_or_null_url() {
    for payload in [json!({}), json!({ "url": null }), json!({ "link": "https://a.example" })] {
        for route in ["/api/extract", "/api/drafts/import"] {
            let (status, body) = send(test_app(&[]), post_json(route, payload.clone())).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{route} {payload}");
            assert_eq!(body["kind"], "invalid_url");
            assert_eq!(body["error"], "Invalid URL: URL is empty");
        }
    }
}

#[tokio::test]
async fn test_extract_unreadable_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/extract")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"url\": "))
        .unwrap();
    let (status, body) = send(test_app(&[]), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_url");
    assert!(body["error"].as_str().unwrap().contains("`url` field"));
}

#[tokio::test]
async fn test_extract_passes_upstream_status_through() {
    let server = MockServer::start().await;
    mount_page(&server, "/gone", ResponseTemplate::new(404)).await;
    mount_page(&server, "/busy", ResponseTemplate::new(503)).await;

    for (route, expected) in [("/gone", StatusCode::NOT_FOUND), ("/busy", StatusCode::SERVICE_UNAVAILABLE)] {
        let url = format!("{}{}", server.uri(), route);
        let (status, body) = send(test_app(&[]), post_json("/api/extract", json!({ "url": url }))).await;

        assert_eq!(status, expected);
        assert_eq!(body["kind"], "upstream_http_error");
        assert!(body["error"].as_str().unwrap().contains(&expected.as_u16().to_string()));
    }
}

#[tokio::test]
async fn test_extract_timeout() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/slow",
        html_response("<html></html>".to_string()).set_delay(std::time::Duration::from_secs(4)),
    )
    .await;

    let url = format!("{}/slow", server.uri());
    let app = test_app(&["--timeout-secs", "1"]);
    let (status, body) = send(app, post_json("/api/extract", json!({ "url": url }))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["kind"], "timeout");
}

#[tokio::test]
async fn test_extract_unreachable() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let url = format!("http://127.0.0.1:{}/post", port);
    let (status, body) = send(test_app(&[]), post_json("/api/extract", json!({ "url": url }))).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["kind"], "network_unreachable");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_import_draft() {
    let server = MockServer::start().await;
    mount_page(&server, "/2024/05/sourdough", html_response(get_fixture("blog_post.html"))).await;

    let url = format!("{}/2024/05/sourdough", server.uri());
    let (status, body) = send(test_app(&[]), post_json("/api/drafts/import", json!({ "url": url }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slug"], "baking-sourdough-at-home-crumbjournal");
    assert_eq!(body["sourceUrl"], url);
    assert_eq!(body["tags"], json!([]));
    assert!(body["id"].is_string());
    assert!(body["importedAt"].is_string());
    assert!(body["content"].as_str().unwrap().contains("Shaping and baking"));
}

#[tokio::test]
async fn test_import_draft_invalid_url() {
    let (status, body) = send(test_app(&[]), post_json("/api/drafts/import", json!({ "url": "ftp://a.example/x" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_url");
}
