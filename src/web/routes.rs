//! HTTP routes for the conversion service
//!
//! Provides the status and health endpoints and the two conversion endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::convert::{
    inject_page_style, ConversionRequest, ConvertError, HtmlRenderer, PrintPdfRenderer,
    RawRenderParams, RenderError, ACCEPTED_INPUTS, DEFAULT_FILENAME,
};

/// Service name reported by the status endpoint
pub const SERVICE_NAME: &str = "HTML to PDF Converter";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<dyn HtmlRenderer>,
    pub version: String,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_renderer(Arc::new(PrintPdfRenderer::new()))
    }

    pub fn with_renderer(renderer: Arc<dyn HtmlRenderer>) -> Self {
        Self {
            renderer,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the service router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_status))
        .route("/health", get(health_check))
        .route("/convert", post(convert_html_to_pdf))
        .route("/convert-with-params", post(convert_with_params))
}

/// Status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

async fn service_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let endpoints = [
        ("/convert", "POST - Converte HTML para PDF"),
        (
            "/convert-with-params",
            "POST - Converte HTML para PDF com tamanho e orientação de página",
        ),
        ("/health", "GET - Health check"),
    ]
    .into_iter()
    .map(|(path, description)| (path.to_string(), description.to_string()))
    .collect();

    Json(StatusResponse {
        status: "online".to_string(),
        service: SERVICE_NAME.to_string(),
        version: state.version.clone(),
        endpoints,
    })
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Convert whatever HTML the request carries
async fn convert_html_to_pdf(
    State(state): State<Arc<AppState>>,
    request: ConversionRequest,
) -> Result<PdfDownload, AppError> {
    let resolved = request.resolve()?.ok_or(AppError::NoHtml)?;

    let data = render(state.renderer.clone(), resolved.html)
        .await
        .map_err(|e| AppError::ConversionFailed(e.to_string()))?;

    tracing::info!(bytes = data.len(), "PDF generated");
    Ok(PdfDownload::new(data, DEFAULT_FILENAME))
}

/// Convert a JSON payload, applying page size and orientation
async fn convert_with_params(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<PdfDownload, AppError> {
    let body =
        body.map_err(|e| AppError::from_rejection(e.status(), e.body_text(), AppError::Failed))?;
    let value: serde_json::Value =
        serde_json::from_slice(&body).map_err(|e| AppError::Failed(e.to_string()))?;
    if !value.is_object() {
        return Err(AppError::MissingHtmlField);
    }

    let params = serde_json::from_value::<RawRenderParams>(value)
        .map_err(|e| AppError::Failed(e.to_string()))?
        .validate()
        .ok_or(AppError::MissingHtmlField)?;

    tracing::info!(
        page_size = ?params.page_size,
        orientation = ?params.orientation,
        "Converting with params"
    );
    let html = inject_page_style(
        &params.html,
        params.page_size.as_deref(),
        params.orientation.as_deref(),
    );

    let data = render(state.renderer.clone(), html)
        .await
        .map_err(|e| AppError::Failed(e.to_string()))?;

    tracing::info!(bytes = data.len(), filename = %params.filename, "PDF generated");
    Ok(PdfDownload::new(data, params.filename))
}

/// Run the renderer on the blocking pool
async fn render(renderer: Arc<dyn HtmlRenderer>, html: String) -> Result<Vec<u8>, RenderError> {
    tracing::info!(chars = html.chars().count(), "Converting HTML to PDF");
    tokio::task::spawn_blocking(move || renderer.render(&html))
        .await
        .map_err(|e| RenderError::Aborted(e.to_string()))?
}

/// PDF attachment response
#[derive(Debug)]
pub struct PdfDownload {
    data: Vec<u8>,
    filename: String,
}

impl PdfDownload {
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
        }
    }
}

impl IntoResponse for PdfDownload {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    content_disposition(&self.filename),
                ),
            ],
            self.data,
        )
            .into_response()
    }
}

/// `Content-Disposition` value for an attachment
///
/// Names that are not plain printable ASCII get an ASCII fallback plus an
/// RFC 5987 `filename*` parameter carrying the original name.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    if fallback == filename {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            urlencoding::encode(filename)
        )
    }
}

/// API error type
///
/// Each variant is one of the documented error bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// `/convert` found no HTML in any accepted encoding
    #[error("Nenhum HTML fornecido")]
    NoHtml,

    /// `/convert` failed after input was accepted
    #[error("Erro ao converter PDF: {0}")]
    ConversionFailed(String),

    /// `/convert-with-params` without a usable `html` field
    #[error("Campo \"html\" é obrigatório")]
    MissingHtmlField,

    /// `/convert-with-params` failed for any other reason
    #[error("{0}")]
    Failed(String),

    /// Body exceeded the configured size limit while being read
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// Map a body extraction failure, keeping the 413 of an over-limit body
    ///
    /// Everything else goes through `otherwise`, which picks the route's
    /// failure shape.
    pub fn from_rejection(
        status: StatusCode,
        message: String,
        otherwise: impl FnOnce(String) -> AppError,
    ) -> AppError {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(message)
        } else {
            otherwise(message)
        }
    }
}

impl From<ConvertError> for AppError {
    fn from(error: ConvertError) -> Self {
        AppError::ConversionFailed(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            AppError::NoHtml => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": self.to_string(),
                    "aceita": ACCEPTED_INPUTS,
                }),
            ),
            AppError::ConversionFailed(details) => {
                tracing::error!("Erro ao converter PDF: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Erro ao converter PDF",
                        "details": details,
                    }),
                )
            }
            AppError::MissingHtmlField => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            AppError::PayloadTooLarge(message) => {
                tracing::warn!("Request body rejected: {}", message);
                (StatusCode::PAYLOAD_TOO_LARGE, json!({ "error": message }))
            }
            AppError::Failed(message) => {
                tracing::error!("Erro: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
