//! HTML to PDF conversion core
//!
//! - [`input`]: picks the document out of an incoming request
//! - [`page_style`]: adds an `@page` rule for size and orientation
//! - [`render`]: hands the final document to the rendering engine

pub mod input;
pub mod page_style;
pub mod render;
mod types;

pub use input::{ConversionRequest, ACCEPTED_INPUTS};
pub use page_style::{inject_page_style, page_style};
pub use render::{HtmlRenderer, PrintPdfRenderer, PDF_MAGIC};
pub use types::{
    ContentKind, ConvertError, HtmlSource, RawRenderParams, RenderError, RenderParams,
    ResolvedHtml, DEFAULT_FILENAME, DEFAULT_ORIENTATION, DEFAULT_PAGE_SIZE,
};
