//! Raw ESC/POS pass-through.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::job::RawJob;

use super::super::error::ApiError;
use super::super::params::Params;
use super::super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RawQuery {
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub base64: Option<String>,
    pub hex: Option<String>,
}

/// POST /print-raw
pub async fn print_raw(
    State(state): State<Arc<AppState>>,
    Params(query): Params<RawQuery>,
) -> Result<Json<Value>, ApiError> {
    let job = RawJob::decode(query.base64.as_deref(), query.hex.as_deref())?;
    let encoding = if query.hex.as_deref().is_some_and(|s| !s.trim().is_empty()) {
        "hex"
    } else {
        "base64"
    };

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({ "encoding": encoding });
    let body = state
        .dispatch(printer, &job, "Raw data sent", details)
        .await?;
    Ok(Json(body))
}
