//! Render adapter around the HTML rendering engine

use printpdf::{GeneratePdfOptions, PdfDocument, PdfSaveOptions};
use std::collections::BTreeMap;

use super::types::RenderError;

/// Leading bytes of every PDF file
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// Something that turns a complete HTML document into PDF bytes
///
/// Implementations are synchronous and may block for a long time on large
/// documents; callers on an async runtime should move the call to a blocking
/// thread.
pub trait HtmlRenderer: Send + Sync {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Renderer backed by `printpdf`'s HTML layout
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintPdfRenderer;

impl PrintPdfRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlRenderer for PrintPdfRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let mut warnings = Vec::new();
        let doc = PdfDocument::from_html(
            html,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &GeneratePdfOptions::default(),
            &mut warnings,
        )
        .map_err(|e| RenderError::Engine(e.to_string()))?;

        let mut save_warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut save_warnings);
        if !warnings.is_empty() || !save_warnings.is_empty() {
            tracing::debug!(
                layout = warnings.len(),
                save = save_warnings.len(),
                "Rendering engine reported warnings"
            );
        }

        ensure_pdf(bytes)
    }
}

/// Reject engine output that is not a PDF file
pub fn ensure_pdf(bytes: Vec<u8>) -> Result<Vec<u8>, RenderError> {
    if bytes.starts_with(PDF_MAGIC) {
        Ok(bytes)
    } else {
        Err(RenderError::NotPdf)
    }
}
