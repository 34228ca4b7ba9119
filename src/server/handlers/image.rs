//! Image upload and printing handler.
//!
//! The upload is staged in the upload directory under a unique name,
//! decoded from there and removed whether or not decoding worked.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::job::{Finish, ImageJob};
use crate::protocol::graphics::ImageMode;
use crate::render::dither::DitheringAlgorithm;
use crate::render::{self, Bitmap};

use super::super::error::ApiError;
use super::super::params::{Params, flexible_bool};
use super::super::state::AppState;

/// Accepted upload extensions
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub printer: Option<String>,
    pub printer_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub center: Option<bool>,
    pub lines_after: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub cut: Option<bool>,
    #[serde(rename = "impl")]
    pub mode: Option<String>,
    pub dither: Option<String>,
    pub paper_width: Option<i64>,
}

struct ImageOptions {
    mode: ImageMode,
    dither: DitheringAlgorithm,
    paper_width: u32,
    center: bool,
    finish: Finish,
}

impl ImageQuery {
    fn options(&self, default_width: u32) -> Result<ImageOptions, ApiError> {
        let mode = match self.mode.as_deref() {
            None => ImageMode::default(),
            Some(s) => ImageMode::parse(s).ok_or_else(|| {
                ApiError::Validation(format!(
                    "impl must be bitImageRaster, bitImageColumn or graphics, got '{}'",
                    s
                ))
            })?,
        };
        let dither = match self.dither.as_deref() {
            None => DitheringAlgorithm::default(),
            Some(s) => DitheringAlgorithm::parse(s).ok_or_else(|| {
                ApiError::Validation(format!(
                    "dither must be floyd-steinberg, bayer or threshold, got '{}'",
                    s
                ))
            })?,
        };
        let paper_width = match self.paper_width {
            None => default_width,
            Some(w) if (1..=render::image::MAX_PAPER_WIDTH as i64).contains(&w) => w as u32,
            Some(w) => {
                return Err(ApiError::Validation(format!(
                    "paper_width must be between 1 and {}, got {}",
                    render::image::MAX_PAPER_WIDTH,
                    w
                )));
            }
        };
        Ok(ImageOptions {
            mode,
            dither,
            paper_width,
            center: self.center.unwrap_or(true),
            finish: Finish::new(self.lines_after.unwrap_or(0), self.cut.unwrap_or(true))?,
        })
    }
}

/// Lower-cased extension if it is one we accept.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reduce a client-supplied name to `[A-Za-z0-9._-]`, without leading dots
/// or path components.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_upload(multipart: &mut Multipart, max_bytes: usize) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("");
        if name != "file" && name != "image" {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::BadRequest("No file selected".to_string()))?;
        if allowed_extension(&filename).is_none() {
            return Err(ApiError::UnsupportedMedia(format!(
                "File type not allowed: '{}' (allowed: {})",
                filename,
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let bytes = field.bytes().await?;
        if bytes.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "Upload is {} bytes, limit is {} bytes",
                bytes.len(),
                max_bytes
            )));
        }
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        return Ok(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::BadRequest("No file part in the request".to_string()))
}

/// Write the upload to disk, decode and dither it, then delete the file.
async fn stage_and_render(
    upload_dir: &Path,
    upload: Upload,
    paper_width: u32,
    dither: DitheringAlgorithm,
) -> Result<Bitmap, ApiError> {
    let path: PathBuf = upload_dir.join(format!(
        "{}_{}",
        Uuid::new_v4(),
        sanitize_filename(&upload.filename)
    ));
    tokio::fs::write(&path, &upload.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("cannot stage upload {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), bytes = upload.bytes.len(), "Upload staged");

    let staged = path.clone();
    let result = tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&staged)?;
        let img = render::image::decode(&bytes)?;
        render::image::prepare(img, paper_width, dither)
    })
    .await;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(path = %path.display(), error = %e, "Failed to remove staged upload");
    }

    let bitmap = result.map_err(|e| ApiError::Internal(format!("image task failed: {}", e)))??;
    Ok(bitmap)
}

/// POST /print-image, /print/image (multipart)
pub async fn print_image(
    State(state): State<Arc<AppState>>,
    Params(query): Params<ImageQuery>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let options = query.options(state.config.paper_width)?;
    let printer = state.resolve(query.printer.as_deref(), query.printer_name.as_deref())?;

    let upload = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let filename = upload.filename.clone();
    let bitmap = stage_and_render(
        &state.config.upload_dir,
        upload,
        options.paper_width,
        options.dither,
    )
    .await?;

    let job = ImageJob {
        mode: options.mode,
        center: options.center,
        finish: options.finish,
        ..ImageJob::new(bitmap)
    };
    let details = json!({
        "filename": filename,
        "width": job.bitmap.width,
        "height": job.bitmap.height,
        "impl": job.mode.as_str(),
        "dither": options.dither.as_str(),
        "paper_width": options.paper_width,
        "center": job.center,
        "lines_after": job.finish.lines_after,
        "cut": job.finish.cut,
    });
    let body = state
        .dispatch(printer, &job, "Image printed successfully", details)
        .await?;
    Ok(Json(body))
}
