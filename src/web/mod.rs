//! Web server module
//!
//! Exposes the conversion core over HTTP:
//!
//! - `GET /` service status
//! - `GET /health` health check
//! - `POST /convert` HTML in any accepted encoding, PDF out
//! - `POST /convert-with-params` JSON with page settings, PDF out

mod extract;
mod routes;
mod server;
mod shutdown;

pub use routes::{api_routes, content_disposition, AppError, AppState, PdfDownload, SERVICE_NAME};
pub use server::{ServerConfig, WebServer};
pub use shutdown::wait_for_shutdown_signal;

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_BIND: &str = "0.0.0.0";

/// Default request body limit in bytes (50 MB)
pub const DEFAULT_UPLOAD_LIMIT: usize = 50 * 1024 * 1024;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_PORT, 8080);
        assert_eq!(DEFAULT_BIND, "0.0.0.0");
        assert_eq!(DEFAULT_UPLOAD_LIMIT, 50 * 1024 * 1024);
    }
}
