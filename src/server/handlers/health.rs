//! Liveness and printer listing.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::super::error::ApiError;
use super::super::params::{Params, flexible_bool};
use super::super::state::AppState;

/// GET / and /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "status": "running",
        "message": "ESC/POS relay is running",
        "printers": state.registry.names(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PrintersQuery {
    #[serde(default, deserialize_with = "flexible_bool")]
    pub check: Option<bool>,
}

/// GET /printers - registered printers, optionally with reachability.
pub async fn printers(
    State(state): State<Arc<AppState>>,
    Params(query): Params<PrintersQuery>,
) -> Result<Json<Value>, ApiError> {
    let check = query.check.unwrap_or(false);

    let mut printers = Vec::with_capacity(state.registry.len());
    for printer in state.registry.iter() {
        let mut entry = json!({
            "name": printer.name,
            "host": printer.host,
            "port": printer.port,
        });
        if check {
            entry["online"] = json!(state.transport.probe(printer).await);
        }
        printers.push(entry);
    }

    Ok(Json(json!({
        "ok": true,
        "default": state.config.default_printer,
        "printers": printers,
    })))
}
