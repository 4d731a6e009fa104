//! html2pdf-service - HTML to PDF over HTTP
//!
//! Accepts an HTML document as a `text/html` body, a JSON `html` field, an
//! uploaded file or a form field, renders it to PDF and returns the result as
//! an attachment. A second endpoint takes JSON with page size and orientation
//! and injects a matching `@page` rule before rendering.

pub mod cli;
pub mod config;
pub mod convert;
pub mod web;

pub use cli::Cli;
pub use config::{CliOverrides, Config, ConfigError};
pub use convert::{
    inject_page_style, ContentKind, ConversionRequest, ConvertError, HtmlRenderer, HtmlSource,
    PrintPdfRenderer, RenderError, RenderParams, ResolvedHtml,
};
pub use web::{ServerConfig, WebServer};
