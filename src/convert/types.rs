//! Common types for the conversion module

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// Failures while interpreting a conversion request body
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON body must be an object, got {0}")]
    JsonNotObject(&'static str),

    #[error("Field \"html\" must be a string")]
    HtmlNotString,

    #[error("{source_name} is not valid UTF-8: {error}")]
    InvalidUtf8 {
        source_name: &'static str,
        error: std::str::Utf8Error,
    },

    #[error("Unreadable request body: {0}")]
    BodyUnreadable(String),
}

/// Failures reported by the rendering engine
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Engine(String),

    #[error("Rendering engine produced no PDF data")]
    NotPdf,

    #[error("Rendering task aborted: {0}")]
    Aborted(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

// ============================================================
// Request Classification
// ============================================================

/// Coarse classification of a request's `Content-Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// `text/html`: the body is the document
    Html,
    /// `application/json`: the document is in the `html` field
    Json,
    /// `multipart/form-data`: uploaded files and form fields
    Multipart,
    /// `application/x-www-form-urlencoded`: form fields only
    UrlEncoded,
    /// Missing or unrecognised content type
    Other,
}

impl ContentKind {
    /// Classify a raw `Content-Type` header value
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(value) = content_type else {
            return ContentKind::Other;
        };
        let value = value.to_ascii_lowercase();

        if value.contains("text/html") {
            ContentKind::Html
        } else if value.contains("application/json") {
            ContentKind::Json
        } else if value.contains("multipart/form-data") {
            ContentKind::Multipart
        } else if value.contains("application/x-www-form-urlencoded") {
            ContentKind::UrlEncoded
        } else {
            ContentKind::Other
        }
    }
}

/// Where the resolved HTML came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlSource {
    RawBody,
    JsonField,
    UploadedFile,
    FormField,
}

impl fmt::Display for HtmlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HtmlSource::RawBody => "text/html",
            HtmlSource::JsonField => "JSON",
            HtmlSource::UploadedFile => "uploaded file",
            HtmlSource::FormField => "form field",
        };
        f.write_str(name)
    }
}

/// HTML picked out of a request, tagged with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHtml {
    pub html: String,
    pub source: HtmlSource,
}

// ============================================================
// Render Parameters
// ============================================================

/// Attachment name used when the caller does not supply one
pub const DEFAULT_FILENAME: &str = "documento.pdf";

/// Page size applied when the field is omitted
pub const DEFAULT_PAGE_SIZE: &str = "A4";

/// Orientation token applied when the field is omitted
pub const DEFAULT_ORIENTATION: &str = "portrait";

/// Body of a `/convert-with-params` request, as sent by the caller
///
/// An explicit `null` for `page_size` or `orientation` clears the default.
/// `html` is kept as a raw JSON value so that a missing field and a field of
/// the wrong type can both be reported as a validation failure rather than a
/// parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRenderParams {
    #[serde(default)]
    pub html: Option<serde_json::Value>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: Option<serde_json::Value>,
    #[serde(default = "default_orientation")]
    pub orientation: Option<serde_json::Value>,
}

fn default_page_size() -> Option<serde_json::Value> {
    Some(DEFAULT_PAGE_SIZE.into())
}

fn default_orientation() -> Option<serde_json::Value> {
    Some(DEFAULT_ORIENTATION.into())
}

/// Validated parameters for a parameterised conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    /// Document to render, never empty
    pub html: String,
    /// Attachment filename for the response
    pub filename: String,
    /// CSS page size (`A4`, `Letter`, `210mm 297mm`, ...)
    pub page_size: Option<String>,
    /// Orientation token copied into the `@page` rule
    pub orientation: Option<String>,
}

impl RawRenderParams {
    /// Validate the caller's fields, returning `None` when `html` is unusable
    pub fn validate(self) -> Option<RenderParams> {
        let html = match self.html {
            Some(serde_json::Value::String(html)) if !html.is_empty() => html,
            _ => return None,
        };

        Some(RenderParams {
            html,
            filename: non_empty(self.filename).unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            page_size: self.page_size.and_then(css_token),
            orientation: self.orientation.and_then(css_token),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Text of a page setting as it goes into the `@page` rule
///
/// Scalars are written out as-is; empty strings, `0`, `false`, `null` and
/// empty arrays or objects leave the setting out.
fn css_token(value: serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(ref items) if items.is_empty() => None,
        Value::Object(ref map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
