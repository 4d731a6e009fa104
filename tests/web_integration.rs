//! Web API integration tests
//!
//! Drives the full router (with middleware) through `tower::ServiceExt`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use html2pdf_service::{HtmlRenderer, RenderError, ServerConfig, WebServer};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Renderer that records its input and returns a fixed PDF stub
#[derive(Default)]
struct RecordingRenderer {
    seen: Mutex<Vec<String>>,
}

impl HtmlRenderer for RecordingRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.seen.lock().unwrap().push(html.to_string());
        Ok(b"%PDF-1.7\n%stub\n".to_vec())
    }
}

/// Renderer that always fails
struct FailingRenderer;

impl HtmlRenderer for FailingRenderer {
    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Engine("engine exploded".to_string()))
    }
}

/// Renderer that panics mid-render
struct PanickingRenderer;

impl HtmlRenderer for PanickingRenderer {
    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        panic!("layout overflow")
    }
}

fn app() -> Router {
    WebServer::with_config(ServerConfig::default()).router()
}

fn app_with(renderer: Arc<dyn HtmlRenderer>) -> Router {
    WebServer::with_config(ServerConfig::default())
        .with_renderer(renderer)
        .router()
}

fn post(uri: &str, content_type: Option<&str>, body: impl Into<Body>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body.into()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn disposition(response: &axum::response::Response) -> String {
    response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string()
}

const BOUNDARY: &str = "X-HTML2PDF-BOUNDARY";

fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
    let mut body = String::new();
    for (name, filename, content) in parts {
        body.push_str(&format!("--{}\r\n", BOUNDARY));
        match filename {
            Some(filename) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/html\r\n\r\n",
                name, filename
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                name
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

fn multipart_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

// ============ Status & Health ============

#[tokio::test]
async fn test_status_endpoint() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "online");
    assert_eq!(json["service"], "HTML to PDF Converter");
    assert_eq!(json["version"], "1.0.0");
    assert!(json["endpoints"]["/convert"].is_string());
    assert!(json["endpoints"]["/convert-with-params"].is_string());
    assert!(json["endpoints"]["/health"].is_string());
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!({"status": "healthy"}));
}

// ============ /convert ============

#[tokio::test]
async fn test_convert_raw_html_end_to_end() {
    let response = app()
        .oneshot(post(
            "/convert",
            Some("text/html"),
            "<html><body>Hi</body></html>",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        disposition(&response),
        "attachment; filename=\"documento.pdf\""
    );
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_convert_passes_each_encoding_verbatim() {
    let html = "<html><body><p>Olá, \"mundo\"</p></body></html>";
    let json_body = serde_json::json!({ "html": html }).to_string();
    let upload = multipart_body(&[("file", Some("doc.html"), html)]);
    let field = multipart_body(&[("html", None, html)]);
    let encoded = format!("html={}", "%3Cp%3Eform%3C%2Fp%3E");

    let cases: Vec<(Option<String>, String, &str)> = vec![
        (Some("text/html; charset=utf-8".into()), html.into(), html),
        (Some("application/json".into()), json_body, html),
        (Some(multipart_type()), upload, html),
        (Some(multipart_type()), field, html),
        (
            Some("application/x-www-form-urlencoded".into()),
            encoded,
            "<p>form</p>",
        ),
    ];

    for (content_type, body, expected) in cases {
        let renderer = Arc::new(RecordingRenderer::default());
        let response = app_with(renderer.clone())
            .oneshot(post("/convert", content_type.as_deref(), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "{:?}", content_type);
        assert_eq!(renderer.seen.lock().unwrap().as_slice(), [expected]);
    }
}

#[tokio::test]
async fn test_convert_upload_preferred_over_form_field() {
    let renderer = Arc::new(RecordingRenderer::default());
    let body = multipart_body(&[
        ("html", None, "<p>field</p>"),
        ("file", Some("doc.html"), "<p>file</p>"),
    ]);

    let response = app_with(renderer.clone())
        .oneshot(post("/convert", Some(multipart_type().as_str()), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(renderer.seen.lock().unwrap().as_slice(), ["<p>file</p>"]);
}

#[tokio::test]
async fn test_convert_empty_json_is_bad_request() {
    let response = app()
        .oneshot(post("/convert", Some("application/json"), "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Nenhum HTML fornecido");
    assert_eq!(json["aceita"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_convert_without_recognised_input() {
    let requests = vec![
        post("/convert", None, "<p>x</p>"),
        post("/convert", Some("text/plain"), "<p>x</p>"),
        post("/convert", Some("text/html"), ""),
        post(
            "/convert",
            Some(multipart_type().as_str()),
            multipart_body(&[("other", None, "<p>x</p>")]),
        ),
    ];

    for request in requests {
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Nenhum HTML fornecido");
        assert_eq!(json["aceita"].as_array().unwrap().len(), 4);
    }
}

#[tokio::test]
async fn test_convert_json_array_is_server_error() {
    let response = app()
        .oneshot(post("/convert", Some("application/json"), "[1,2]"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Erro ao converter PDF");
    assert!(json["details"].as_str().unwrap().contains("must be an object"));
}

#[tokio::test]
async fn test_convert_malformed_json_is_server_error() {
    let response = app()
        .oneshot(post("/convert", Some("application/json"), "{nope"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Erro ao converter PDF");
    assert!(json["details"].as_str().unwrap().contains("Invalid JSON"));
}

#[tokio::test]
async fn test_convert_render_failure() {
    let response = app_with(Arc::new(FailingRenderer))
        .oneshot(post("/convert", Some("text/html"), "<p>x</p>"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Erro ao converter PDF");
    assert_eq!(json["details"], "engine exploded");
}

#[tokio::test]
async fn test_convert_render_panic_still_answers() {
    let response = app_with(Arc::new(PanickingRenderer))
        .oneshot(post("/convert", Some("text/html"), "<p>x</p>"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Erro ao converter PDF");
    assert!(json["details"].is_string());
}

#[tokio::test]
async fn test_convert_body_over_limit() {
    let body = "<html><body>this body is too long</body></html>";
    let request = Request::builder()
        .method("POST")
        .uri("/convert")
        .header(header::CONTENT_TYPE, "text/html")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();

    let router = WebServer::with_config(ServerConfig::default().with_upload_limit(16)).router();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_body_over_limit_without_content_length() {
    let html = "<html><body>this body is too long</body></html>";
    let cases = vec![
        ("/convert", "text/html".to_string(), html.to_string()),
        (
            "/convert",
            "application/json".to_string(),
            serde_json::json!({ "html": html }).to_string(),
        ),
        (
            "/convert",
            multipart_type(),
            multipart_body(&[("file", Some("doc.html"), html)]),
        ),
        (
            "/convert",
            "application/x-www-form-urlencoded".to_string(),
            format!("html={}", "x".repeat(64)),
        ),
        (
            "/convert-with-params",
            "application/json".to_string(),
            serde_json::json!({ "html": html }).to_string(),
        ),
    ];

    for (uri, content_type, body) in cases {
        let request = post(uri, Some(content_type.as_str()), body);
        assert!(request.headers().get(header::CONTENT_LENGTH).is_none());

        let router =
            WebServer::with_config(ServerConfig::default().with_upload_limit(16)).router();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::PAYLOAD_TOO_LARGE,
            "{} {}",
            uri,
            content_type
        );
        assert!(body_json(response).await["error"].is_string());
    }
}

// ============ /convert-with-params ============

#[tokio::test]
async fn test_convert_with_params_end_to_end() {
    let response = app()
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<p>x</p>","filename":"a.pdf","page_size":"Letter","orientation":"landscape"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(disposition(&response), "attachment; filename=\"a.pdf\"");
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_convert_with_params_injects_page_style() {
    let renderer = Arc::new(RecordingRenderer::default());
    let response = app_with(renderer.clone())
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<p>x</p>","page_size":"Letter","orientation":"landscape"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        renderer.seen.lock().unwrap().as_slice(),
        ["<html><head><style>@page { size: Letter; landscape; margin: 0; }</style></head>\
          <body><p>x</p></body></html>"]
    );
}

#[tokio::test]
async fn test_convert_with_params_defaults() {
    let renderer = Arc::new(RecordingRenderer::default());
    let response = app_with(renderer.clone())
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<html><head></head><body>x</body></html>"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        disposition(&response),
        "attachment; filename=\"documento.pdf\""
    );
    assert_eq!(
        renderer.seen.lock().unwrap().as_slice(),
        ["<html><head><style>@page { size: A4; portrait; margin: 0; }</style></head>\
          <body>x</body></html>"]
    );
}

#[tokio::test]
async fn test_convert_with_params_null_settings_skip_style() {
    let renderer = Arc::new(RecordingRenderer::default());
    let response = app_with(renderer.clone())
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<p>x</p>","page_size":null,"orientation":null}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(renderer.seen.lock().unwrap().as_slice(), ["<p>x</p>"]);
}

#[tokio::test]
async fn test_convert_with_params_missing_html() {
    for body in ["{}", r#"{"html": ""}"#, r#"{"html": null}"#, r#"{"filename": "a.pdf"}"#, "[]"] {
        let response = app()
            .oneshot(post("/convert-with-params", Some("application/json"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Campo \"html\" é obrigatório");
    }
}

#[tokio::test]
async fn test_convert_with_params_numeric_page_size() {
    let renderer = Arc::new(RecordingRenderer::default());
    let response = app_with(renderer.clone())
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<p>x</p>","page_size":5}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        renderer.seen.lock().unwrap().as_slice(),
        ["<html><head><style>@page { size: 5; portrait; margin: 0; }</style></head>\
          <body><p>x</p></body></html>"]
    );
}

#[tokio::test]
async fn test_convert_with_params_invalid_json() {
    let response = app()
        .oneshot(post("/convert-with-params", Some("application/json"), "not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_convert_with_params_render_failure() {
    let response = app_with(Arc::new(FailingRenderer))
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<p>x</p>"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"error": "engine exploded"})
    );
}

#[tokio::test]
async fn test_convert_with_params_unicode_filename() {
    let renderer = Arc::new(RecordingRenderer::default());
    let response = app_with(renderer)
        .oneshot(post(
            "/convert-with-params",
            Some("application/json"),
            r#"{"html":"<p>x</p>","filename":"relatório.pdf"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        disposition(&response),
        "attachment; filename=\"relat_rio.pdf\"; filename*=UTF-8''relat%C3%B3rio.pdf"
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let response = app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
