//! Input resolution
//!
//! Picks the HTML document out of a request that may carry it in one of four
//! shapes. The shapes are tried in a fixed order and the first match wins:
//!
//! 1. `text/html` body
//! 2. `html` field of a JSON body
//! 3. uploaded file named `file`
//! 4. form field named `html`

use std::collections::HashMap;

use super::types::{ContentKind, ConvertError, HtmlSource, ResolvedHtml, Result};

/// Name of the multipart part carrying an uploaded document
pub const FILE_FIELD: &str = "file";

/// Name of the JSON/form field carrying inline HTML
pub const HTML_FIELD: &str = "html";

/// Encodings accepted by `/convert`, reported back on a 400
pub const ACCEPTED_INPUTS: [&str; 4] = [
    "Content-Type: text/html (HTML no body)",
    "Content-Type: application/json ({\"html\": \"...\"})",
    "multipart/form-data (file)",
    "multipart/form-data ou application/x-www-form-urlencoded (html)",
];

/// Request-scoped view of everything that might hold the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub content_kind: ContentKind,
    /// Raw body, populated for non-form content types
    pub body: Vec<u8>,
    /// Uploaded files by part name
    pub files: HashMap<String, Vec<u8>>,
    /// Text form fields by name
    pub fields: HashMap<String, String>,
}

impl ConversionRequest {
    /// Request with a raw body and no form data
    pub fn with_body(content_kind: ContentKind, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_kind,
            body: body.into(),
            files: HashMap::new(),
            fields: HashMap::new(),
        }
    }

    /// Request carrying only form data
    pub fn with_form(
        content_kind: ContentKind,
        files: HashMap<String, Vec<u8>>,
        fields: HashMap<String, String>,
    ) -> Self {
        Self {
            content_kind,
            body: Vec::new(),
            files,
            fields,
        }
    }

    /// Resolve the document, `Ok(None)` meaning no usable HTML was sent
    pub fn resolve(&self) -> Result<Option<ResolvedHtml>> {
        let resolved = if self.content_kind == ContentKind::Html {
            Some(ResolvedHtml {
                html: decode_utf8(&self.body, "Request body")?,
                source: HtmlSource::RawBody,
            })
        } else if self.content_kind == ContentKind::Json {
            html_from_json(&self.body)?.map(|html| ResolvedHtml {
                html,
                source: HtmlSource::JsonField,
            })
        } else if let Some(bytes) = self.files.get(FILE_FIELD) {
            Some(ResolvedHtml {
                html: decode_utf8(bytes, "Uploaded file")?,
                source: HtmlSource::UploadedFile,
            })
        } else {
            self.fields.get(HTML_FIELD).map(|html| ResolvedHtml {
                html: html.clone(),
                source: HtmlSource::FormField,
            })
        };

        let resolved = resolved.filter(|r| !r.html.is_empty());
        match &resolved {
            Some(r) => tracing::info!(source = %r.source, chars = r.html.chars().count(), "HTML received"),
            None => tracing::info!(kind = ?self.content_kind, "No HTML found in request"),
        }
        Ok(resolved)
    }
}

fn decode_utf8(bytes: &[u8], source_name: &'static str) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|error| ConvertError::InvalidUtf8 { source_name, error })
}

fn html_from_json(body: &[u8]) -> Result<Option<String>> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let object = value.as_object().ok_or_else(|| {
        ConvertError::JsonNotObject(match value {
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::Bool(_) => "a boolean",
            _ => "null",
        })
    })?;
    match object.get(HTML_FIELD) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(html)) => Ok(Some(html.clone())),
        Some(_) => Err(ConvertError::HtmlNotString),
    }
}
