//! QR code and barcode handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::job::code::QrSymbol;
use crate::job::{BarcodeJob, Finish, QrJob};
use crate::protocol::barcode::qr::QrErrorLevel;

use super::super::error::ApiError;
use super::super::params::{Params, flexible_bool};
use super::super::state::AppState;

fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} is required", name)))
}

#[derive(Debug, Deserialize)]
pub struct QrQuery {
    pub text: Option<String>,
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub size: Option<i64>,
    pub ec: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub native: Option<bool>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub center: Option<bool>,
    pub lines_after: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub cut: Option<bool>,
}

/// POST /print/qr
pub async fn print_qr(
    State(state): State<Arc<AppState>>,
    Params(query): Params<QrQuery>,
) -> Result<Json<Value>, ApiError> {
    let text = required(&query.text, "text")?;
    let level = match query.ec.as_deref() {
        None => QrErrorLevel::default(),
        Some(s) => QrErrorLevel::parse(s).ok_or_else(|| {
            ApiError::Validation(format!("ec must be one of L, M, Q, H, got '{}'", s))
        })?,
    };
    let size = query.size.unwrap_or(3);
    let native = query.native.unwrap_or(true);
    let finish = Finish::new(query.lines_after.unwrap_or(0), query.cut.unwrap_or(true))?;

    // Software rendering touches every module; keep it off the runtime threads
    let job_text = text.to_string();
    let qr = tokio::task::spawn_blocking(move || QrJob::new(&job_text, size, level, native))
        .await
        .map_err(|e| ApiError::Internal(format!("QR task failed: {}", e)))??;
    let job = QrJob {
        center: query.center.unwrap_or(true),
        finish,
        ..qr
    };

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({
        "text": text,
        "size": job.size,
        "ec": job.level.as_str(),
        "native": matches!(job.symbol, QrSymbol::Native),
        "center": job.center,
        "lines_after": job.finish.lines_after,
        "cut": job.finish.cut,
    });
    let body = state
        .dispatch(printer, &job, "QR code printed successfully", details)
        .await?;
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
pub struct BarcodeQuery {
    pub code: Option<String>,
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub barcode_type: Option<String>,
    pub height: Option<i64>,
    pub width: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub center: Option<bool>,
    pub lines_after: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub cut: Option<bool>,
}

/// POST /print/barcode
pub async fn print_barcode(
    State(state): State<Arc<AppState>>,
    Params(query): Params<BarcodeQuery>,
) -> Result<Json<Value>, ApiError> {
    let code = required(&query.code, "code")?;
    let barcode_type = query.barcode_type.as_deref().unwrap_or("CODE39");
    let job = BarcodeJob {
        center: query.center.unwrap_or(true),
        finish: Finish::new(query.lines_after.unwrap_or(0), query.cut.unwrap_or(true))?,
        ..BarcodeJob::new(
            code,
            barcode_type,
            query.height.unwrap_or(BarcodeJob::DEFAULT_HEIGHT),
            query.width.unwrap_or(BarcodeJob::DEFAULT_WIDTH),
        )?
    };

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({
        "code": code,
        "barcode_type": job.symbology.as_str(),
        "height": job.height,
        "width": job.width,
        "center": job.center,
        "lines_after": job.finish.lines_after,
        "cut": job.finish.cut,
    });
    let body = state
        .dispatch(printer, &job, "Barcode printed successfully", details)
        .await?;
    Ok(Json(body))
}
