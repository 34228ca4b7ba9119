//! Cut, feed, beep and drawer handlers. All accept GET and POST.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::job::{BeepJob, CutJob, DrawerJob, FeedJob};
use crate::protocol::commands::CutMode;

use super::super::error::ApiError;
use super::super::params::Params;
use super::super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CutQuery {
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub lines_before: Option<i64>,
    /// Older clients send `feed`; it wins over `lines_before`
    pub feed: Option<i64>,
    pub mode: Option<String>,
}

/// GET|POST /cut
pub async fn cut(
    State(state): State<Arc<AppState>>,
    Params(query): Params<CutQuery>,
) -> Result<Json<Value>, ApiError> {
    let mode = match query.mode.as_deref() {
        None => CutMode::Full,
        Some(s) => CutMode::parse(s).ok_or_else(|| {
            ApiError::Validation(format!("mode must be full or partial, got '{}'", s))
        })?,
    };
    let lines_before = query.feed.or(query.lines_before).unwrap_or(0);
    let job = CutJob::new(lines_before, mode)?;

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({
        "lines_before": job.lines_before,
        "mode": job.mode.as_str(),
    });
    let body = state.dispatch(printer, &job, "Paper cut", details).await?;
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub lines: Option<i64>,
}

/// GET|POST /feed
pub async fn feed(
    State(state): State<Arc<AppState>>,
    Params(query): Params<FeedQuery>,
) -> Result<Json<Value>, ApiError> {
    let job = FeedJob::new(query.lines.unwrap_or(3))?;

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({ "lines": job.lines });
    let body = state.dispatch(printer, &job, "Paper fed", details).await?;
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
pub struct BeepQuery {
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub count: Option<i64>,
    pub duration: Option<i64>,
    /// Older name for `duration`; wins when both are given
    pub time: Option<i64>,
}

/// GET|POST /beep
pub async fn beep(
    State(state): State<Arc<AppState>>,
    Params(query): Params<BeepQuery>,
) -> Result<Json<Value>, ApiError> {
    let duration = query.time.or(query.duration).unwrap_or(1);
    let job = BeepJob::new(query.count.unwrap_or(1), duration)?;

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({
        "count": job.count,
        "duration": job.duration,
    });
    let body = state.dispatch(printer, &job, "Beep sent", details).await?;
    Ok(Json(body))
}

#[derive(Debug, Deserialize)]
pub struct DrawerQuery {
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    pub pin: Option<i64>,
    pub t1: Option<i64>,
    pub t2: Option<i64>,
}

/// GET|POST /drawer
pub async fn drawer(
    State(state): State<Arc<AppState>>,
    Params(query): Params<DrawerQuery>,
) -> Result<Json<Value>, ApiError> {
    let job = DrawerJob::new(
        query.pin.unwrap_or(0),
        query.t1.unwrap_or(100),
        query.t2.unwrap_or(100),
    )?;

    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;
    let details = json!({
        "pin": job.pin as u8,
        "t1": job.t1,
        "t2": job.t2,
    });
    let body = state.dispatch(printer, &job, "Drawer opened", details).await?;
    Ok(Json(body))
}
