//! Text printing handler.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::job::{Finish, TextJob};
use crate::protocol::text::{Alignment, CharSize, Underline};

use super::super::error::ApiError;
use super::super::params::{Params, flexible_bool};
use super::super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    pub text: Option<String>,
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub bold: Option<bool>,
    pub underline: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub align: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub invert: Option<bool>,
    pub lines_after: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub cut: Option<bool>,
}

impl TextQuery {
    fn job(&self) -> Result<TextJob, ApiError> {
        let text = self
            .text
            .as_deref()
            .ok_or_else(|| ApiError::Validation("text is required".to_string()))?;
        let align = match self.align.as_deref() {
            None => Alignment::Left,
            Some(s) => Alignment::parse(s).ok_or_else(|| {
                ApiError::Validation(format!("align must be left, center or right, got '{}'", s))
            })?,
        };
        Ok(TextJob {
            bold: self.bold.unwrap_or(false),
            underline: Underline::from_mode(self.underline.unwrap_or(0))?,
            size: CharSize::new(self.width.unwrap_or(1), self.height.unwrap_or(1))?,
            align,
            invert: self.invert.unwrap_or(false),
            finish: Finish::new(self.lines_after.unwrap_or(0), self.cut.unwrap_or(true))?,
            ..TextJob::new(text)?
        })
    }
}

/// POST /print-text, /print/text
pub async fn print_text(
    State(state): State<Arc<AppState>>,
    Params(query): Params<TextQuery>,
) -> Result<Json<Value>, ApiError> {
    let job = query.job()?;
    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;

    let details = json!({
        "text": job.text,
        "bold": job.bold,
        "underline": job.underline as u8,
        "width": job.size.width(),
        "height": job.size.height(),
        "align": job.align.as_str(),
        "invert": job.invert,
        "lines_after": job.finish.lines_after,
        "cut": job.finish.cut,
    });
    let body = state
        .dispatch(printer, &job, "Text printed successfully", details)
        .await?;
    Ok(Json(body))
}
