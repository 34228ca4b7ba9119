//! # HTTP Server
//!
//! Exposes printer operations as HTTP endpoints. Parameters travel in the
//! query string; image uploads are multipart.
//!
//! ## Usage
//!
//! ```bash
//! escpos-relay serve --port 3006 --printer printer_1=192.168.1.50
//! curl -X POST 'http://localhost:3006/print/text?text=Hello&width=2'
//! ```
//!
//! ## Routes
//!
//! | Route | Method |
//! |-------|--------|
//! | `/`, `/health` | GET |
//! | `/printers` | GET |
//! | `/print-text`, `/print/text` | POST |
//! | `/print-image`, `/print/image` | POST (multipart) |
//! | `/print/qr`, `/print/barcode` | POST |
//! | `/print-raw` | POST |
//! | `/cut`, `/feed`, `/beep`, `/drawer` | GET, POST |

pub mod error;
mod handlers;
pub mod params;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{RelayError, RelayResult};
use crate::notify;

/// Multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        // Status
        .route("/", get(handlers::health::health))
        .route("/health", get(handlers::health::health))
        .route("/printers", get(handlers::health::printers))
        // Printing
        .route("/print-text", post(handlers::text::print_text))
        .route("/print/text", post(handlers::text::print_text))
        .route(
            "/print-image",
            post(handlers::image::print_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/print/image",
            post(handlers::image::print_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/print/qr", post(handlers::codes::print_qr))
        .route("/print/barcode", post(handlers::codes::print_barcode))
        .route("/print-raw", post(handlers::raw::print_raw))
        // Control
        .route("/cut", get(handlers::control::cut).post(handlers::control::cut))
        .route("/feed", get(handlers::control::feed).post(handlers::control::feed))
        .route("/beep", get(handlers::control::beep).post(handlers::control::beep))
        .route("/drawer", get(handlers::control::drawer).post(handlers::control::drawer))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
///
/// ## Example
///
/// ```no_run
/// use std::sync::Arc;
/// use escpos_relay::printer::PrinterRegistry;
/// use escpos_relay::server::{AppState, ServerConfig, serve};
/// use escpos_relay::transport::NetworkTransport;
///
/// # async fn example() -> Result<(), escpos_relay::error::RelayError> {
/// let registry = PrinterRegistry::from_sources(None, &["printer_1=192.168.1.50".to_string()])?;
/// let state = AppState::new(ServerConfig::default(), registry, Arc::new(NetworkTransport::default()));
///
/// serve(Arc::new(state)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(state: Arc<AppState>) -> RelayResult<()> {
    let config = &state.config;

    tokio::fs::create_dir_all(&config.upload_dir).await.map_err(|e| {
        RelayError::Config(format!(
            "cannot create upload directory {}: {}",
            config.upload_dir.display(),
            e
        ))
    })?;

    if state.registry.lookup(&config.default_printer).is_none() {
        warn!(
            default_printer = %config.default_printer,
            "Default printer is not registered; requests must name a printer"
        );
    }

    let listen_addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| RelayError::Server(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    info!(
        addr = %listen_addr,
        printers = ?state.registry.names(),
        default_printer = %config.default_printer,
        "ESC/POS relay listening"
    );

    if config.announce {
        tokio::spawn(notify::announce_all(state.clone()));
    }

    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RelayError::Server(format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
}
