//! End-to-end tests for the HTTP API.
//!
//! Requests go through the real router; a recording transport stands in for
//! the printers so the exact bytes of every job can be checked.

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use escpos_relay::{
    PrinterConfig, PrinterRegistry, RelayError, RelayResult, Transport,
    server::{AppState, ServerConfig, router},
};

// ============================================================================
// HARNESS
// ============================================================================

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(String, Vec<u8>)>>,
    unreachable: bool,
}

impl RecordingTransport {
    fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<(String, Vec<u8>)> {
        self.sent.lock().unwrap().clone()
    }

    fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, printer: &PrinterConfig, data: &[u8]) -> RelayResult<()> {
        if self.unreachable {
            return Err(RelayError::Connection(format!("{}: connection refused", printer.name)));
        }
        self.sent
            .lock()
            .unwrap()
            .push((printer.name.clone(), data.to_vec()));
        Ok(())
    }

    async fn probe(&self, _printer: &PrinterConfig) -> bool {
        !self.unreachable
    }
}

struct TestApp {
    router: Router,
    transport: Arc<RecordingTransport>,
    upload_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

fn app_with(transport: RecordingTransport, max_upload_bytes: usize) -> TestApp {
    let registry = PrinterRegistry::from_sources(
        None,
        &["printer_1=10.0.0.1".to_string(), "bar=10.0.0.2:9101".to_string()],
    )
    .unwrap();

    let upload_dir = std::env::temp_dir().join(format!("escpos-relay-http-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&upload_dir).unwrap();

    let config = ServerConfig {
        upload_dir: upload_dir.clone(),
        max_upload_bytes,
        ..ServerConfig::default()
    };
    let transport = Arc::new(transport);
    let state = AppState::new(config, registry, transport.clone());

    TestApp {
        router: router(Arc::new(state)),
        transport,
        upload_dir,
    }
}

fn app() -> TestApp {
    app_with(RecordingTransport::default(), 20 * 1024 * 1024)
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn call(app: &TestApp, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

const BOUNDARY: &str = "escpos-relay-test-boundary";

async fn upload(app: &TestApp, uri: &str, field: &str, filename: &str, bytes: &[u8]) -> (StatusCode, Value) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn black_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(width, height, Luma([0])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

// ============================================================================
// STATUS
// ============================================================================

#[tokio::test]
async fn health_lists_every_printer_once() {
    let app = app();
    for uri in ["/", "/health"] {
        let (status, body) = call(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["printers"], serde_json::json!(["printer_1", "bar"]));
    }
    assert_eq!(app.transport.calls(), 0);
}

#[tokio::test]
async fn printers_with_check() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/printers?check=yes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["printers"][1]["name"], "bar");
    assert_eq!(body["printers"][1]["port"], 9101);
    assert_eq!(body["printers"][1]["online"], true);

    let (_, body) = call(&app, Method::GET, "/printers").await;
    assert!(body["printers"][0].get("online").is_none());
}

// ============================================================================
// TEXT
// ============================================================================

#[tokio::test]
async fn text_size_is_set_exactly_once() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/print/text?text=Hello&width=2&height=3").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["printer"], "printer_1");
    assert_eq!(body["width"], 2);
    assert_eq!(body["height"], 3);

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 1);
    let data = &sent[0].1;
    assert_eq!(&data[..2], &[0x1B, 0x40]);
    assert_eq!(count(data, &[0x1D, 0x21, 0x12]), 1);
    assert_eq!(body["bytes"], data.len());
    // Default finish is a full cut
    assert_eq!(&data[data.len() - 3..], &[0x1D, 0x56, 0x00]);
}

#[tokio::test]
async fn text_every_size_is_set_exactly_once() {
    let app = app();
    for width in 1..=8u8 {
        for height in 1..=8u8 {
            let uri = format!("/print/text?text=x&width={}&height={}", width, height);
            let (status, body) = call(&app, Method::POST, &uri).await;
            assert_eq!(status, StatusCode::OK, "{}", body);

            let sent = app.transport.sent();
            let data = &sent.last().unwrap().1;
            let n = ((width - 1) << 4) | (height - 1);
            assert_eq!(count(data, &[0x1D, 0x21, n]), 1, "{}x{}", width, height);
        }
    }
    assert_eq!(app.transport.calls(), 64);
}

#[tokio::test]
async fn printer_name_wins_over_printer() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/cut?printer=printer_1&printer_name=bar").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["printer"], "bar");

    let (status, _) = call(&app, Method::POST, "/print-raw?hex=1B40&printer=bar&printer_name=printer_1").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::POST, "/print/text?text=x&printer=bar&printer_name=").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<String> = app.transport.sent().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["bar", "printer_1", "bar"]);
}

#[tokio::test]
async fn text_legacy_route_and_flag_spellings() {
    let app = app();
    let (status, _) = call(
        &app,
        Method::POST,
        "/print-text?text=Hi&printer_name=bar&bold=1&cut=no&lines_after=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.transport.sent();
    assert_eq!(sent[0].0, "bar");
    let data = &sent[0].1;
    assert_eq!(count(data, &[0x1B, 0x45, 0x01]), 1);
    assert_eq!(&data[data.len() - 3..], &[0x1B, 0x64, 2]);
}

#[tokio::test]
async fn text_size_out_of_range_is_rejected_before_sending() {
    let app = app();
    for query in ["width=0", "width=9", "height=0", "height=9", "width=-1"] {
        let (status, body) = call(&app, Method::POST, &format!("/print/text?text=x&{}", query)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", query);
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "validation_error");
    }
    assert_eq!(app.transport.calls(), 0);
}

#[tokio::test]
async fn malformed_numbers_and_missing_text_are_validation_errors() {
    let app = app();
    for uri in ["/print/text?text=x&width=abc", "/print/text", "/print/text?text=x&align=justify"] {
        let (status, body) = call(&app, Method::POST, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["error"], "validation_error");
    }
    assert_eq!(app.transport.calls(), 0);
}

// ============================================================================
// PRINTER RESOLUTION
// ============================================================================

#[tokio::test]
async fn unknown_printer_is_404_without_sending() {
    let app = app();
    let uris = [
        (Method::POST, "/print/text?text=x&printer=nope"),
        (Method::POST, "/print/qr?text=x&printer=nope"),
        (Method::POST, "/print/barcode?code=ABC&printer=nope"),
        (Method::POST, "/print-raw?hex=1B40&printer=nope"),
        (Method::GET, "/cut?printer=nope"),
        (Method::POST, "/feed?printer_name=nope"),
        (Method::GET, "/beep?printer=nope"),
        (Method::GET, "/drawer?printer=nope"),
    ];
    for (method, uri) in uris {
        let (status, body) = call(&app, method, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["error"], "printer_not_found");
        assert_eq!(body["message"], "Printer 'nope' not found");
    }

    let (status, _) = upload(&app, "/print/image?printer=nope", "file", "a.png", &black_png(4, 2)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.transport.calls(), 0);
}

#[tokio::test]
async fn unreachable_printer_is_502() {
    let app = app_with(RecordingTransport::unreachable(), 1024);
    let (status, body) = call(&app, Method::GET, "/beep").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "printer_unreachable");
}

// ============================================================================
// RAW
// ============================================================================

#[tokio::test]
async fn raw_base64_and_hex_send_the_same_bytes() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/print-raw?base64=G0Bw").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let (status, _) = call(&app, Method::POST, "/print-raw?hex=1B4070").await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.transport.sent();
    assert_eq!(sent[0].1, vec![0x1B, 0x40, 0x70]);
    assert_eq!(sent[1].1, vec![0x1B, 0x40, 0x70]);
}

#[tokio::test]
async fn raw_input_errors() {
    let app = app();

    let (status, body) = call(&app, Method::POST, "/print-raw?base64=G0Bw&hex=1B4070").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = call(&app, Method::POST, "/print-raw").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(&app, Method::POST, "/print-raw?hex=1B4").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "decode_error");

    let (status, body) = call(&app, Method::POST, "/print-raw?base64=%21%21%21").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "decode_error");

    assert_eq!(app.transport.calls(), 0);
}

// ============================================================================
// CODES
// ============================================================================

#[tokio::test]
async fn ean13_with_wrong_length_is_rejected() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/print/barcode?code=12345&barcode_type=EAN13").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = call(&app, Method::POST, "/print/barcode?code=AB%01&barcode_type=CODE93").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.transport.calls(), 0);
}

#[tokio::test]
async fn barcode_defaults() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/print/barcode?code=ABC-123").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["barcode_type"], "CODE39");

    let data = &app.transport.sent()[0].1;
    // Centered, height 64, width 2, CODE39
    assert_eq!(&data[2..5], &[0x1B, 0x61, 1]);
    assert_eq!(count(data, &[0x1D, 0x68, 64]), 1);
    assert_eq!(count(data, &[0x1D, 0x77, 2]), 1);
    assert_eq!(count(data, &[0x1D, 0x6B, 69, 7]), 1);
}

#[tokio::test]
async fn qr_native_and_software() {
    let app = app();
    let (status, body) = call(&app, Method::POST, "/print/qr?text=hello&size=4&ec=h").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["ec"], "H");
    assert_eq!(body["native"], true);

    let (status, body) = call(&app, Method::POST, "/print/qr?text=hello&native=false&center=off").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["native"], false);

    let sent = app.transport.sent();
    assert_eq!(count(&sent[0].1, &[0x1D, 0x28, 0x6B, 3, 0, 49, 69, 51]), 1);
    assert_eq!(&sent[1].1[2..5], &[0x1D, 0x76, 0x30]);

    let (status, _) = call(&app, Method::POST, "/print/qr?text=hello&size=9").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// CONTROL
// ============================================================================

#[tokio::test]
async fn repeated_cut_requests_are_byte_identical() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/cut?lines_before=2&mode=full").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::POST, "/cut?lines_before=2&mode=full").await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1, sent[1].1);
    assert_eq!(sent[0].1, vec![0x1B, 0x40, 0x1B, 0x64, 2, 0x1D, 0x56, 0]);
}

#[tokio::test]
async fn cut_legacy_feed_alias() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/cut?feed=4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines_before"], 4);
    assert_eq!(body["mode"], "full");
    assert_eq!(app.transport.sent()[0].1, vec![0x1B, 0x40, 0x1B, 0x64, 4, 0x1D, 0x56, 0]);

    let (status, body) = call(&app, Method::GET, "/cut?mode=partial").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "partial");
    assert_eq!(app.transport.sent()[1].1, vec![0x1B, 0x40, 0x1D, 0x56, 1]);
}

#[tokio::test]
async fn control_ranges() {
    let app = app();
    for uri in [
        "/beep?count=0",
        "/beep?count=10",
        "/beep?duration=10",
        "/beep?time=0",
        "/drawer?pin=2",
        "/drawer?t1=256",
        "/feed?lines=256",
        "/cut?mode=sideways",
    ] {
        let (status, _) = call(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
    }
    assert_eq!(app.transport.calls(), 0);

    let (status, _) = call(&app, Method::POST, "/beep?count=2&time=5").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/drawer").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, Method::GET, "/feed").await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.transport.sent();
    assert_eq!(sent[0].1, vec![0x1B, 0x40, 0x1B, 0x42, 2, 5]);
    assert_eq!(sent[1].1, vec![0x1B, 0x40, 0x1B, 0x70, 0, 100, 100]);
    assert_eq!(sent[2].1, vec![0x1B, 0x40, 0x1B, 0x64, 3]);
}

// ============================================================================
// IMAGES
// ============================================================================

#[tokio::test]
async fn image_upload_prints_and_cleans_up() {
    let app = app();
    let (status, body) = upload(&app, "/print/image", "file", "dot.png", &black_png(4, 2)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["width"], 4);
    assert_eq!(body["height"], 2);
    assert_eq!(body["impl"], "bitImageRaster");

    let expected = vec![
        0x1B, 0x40, // init
        0x1B, 0x61, 1, // center
        0x1D, 0x76, 0x30, 0, 1, 0, 2, 0, 0xF0, 0xF0, // raster
        0x1B, 0x61, 0, // left
        0x1D, 0x56, 0, // cut
    ];
    assert_eq!(app.transport.sent()[0].1, expected);

    let leftovers = std::fs::read_dir(&app.upload_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn image_upload_options() {
    let app = app();
    let (status, body) = upload(
        &app,
        "/print-image?impl=graphics&dither=bayer&center=false&cut=false&paper_width=2",
        "image",
        "wide.PNG",
        &black_png(8, 4),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["width"], 2);
    assert_eq!(body["height"], 1);

    let data = &app.transport.sent()[0].1;
    assert_eq!(&data[2..5], &[0x1D, 0x28, 0x4C]);
}

#[tokio::test]
async fn image_upload_errors() {
    let app = app_with(RecordingTransport::default(), 256);

    let (status, body) = upload(&app, "/print/image", "file", "notes.txt", b"hello").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "unsupported_media_type");

    let (status, body) = upload(&app, "/print/image", "file", "big.png", &[0u8; 1024]).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "payload_too_large");

    let (status, body) = upload(&app, "/print/image", "file", "fake.png", b"not really a png").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "decode_error");

    let (status, body) = upload(&app, "/print/image", "other", "a.png", &black_png(1, 1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let (status, _) = upload(&app, "/print/image?impl=sixel", "file", "a.png", &black_png(1, 1)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(app.transport.calls(), 0);
    assert_eq!(std::fs::read_dir(&app.upload_dir).unwrap().count(), 0);
}
