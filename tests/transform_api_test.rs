//! Transform API end-to-end tests
//!
//! Tests the complete flow over real HTTP:
//!   multipart upload → command validation → pipeline → response
//!
//! Each test spins up the full application on an ephemeral port and
//! drives it with a reqwest client.

use std::io::Cursor;

use henshin::config::Config;
use henshin::server::{router, AppState};
use image::{DynamicImage, Rgba, RgbaImage};
use reqwest::multipart::{Form, Part};

/// Start the application on an ephemeral port, returning its base URL
async fn spawn_app_with_config(config: Config) -> String {
    let app = router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn spawn_app() -> String {
    spawn_app_with_config(Config::default()).await
}

/// Create a test PNG (checkerboard with distinct corner pixels)
fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Create a test JPEG (solid red)
fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut buffer, image::ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

fn png_part(data: Vec<u8>) -> Part {
    Part::bytes(data)
        .file_name("test.png")
        .mime_str("image/png")
        .unwrap()
}

#[tokio::test]
async fn test_resize_end_to_end() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(100, 100)))
        .text("resize", "50,25");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");

    let body = resp.bytes().await.unwrap();
    let output = image::load_from_memory(&body).expect("response must decode as an image");
    assert_eq!((output.width(), output.height()), (50, 25));
}

#[tokio::test]
async fn test_rotate_rejects_non_integer_argument() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(10, 10)))
        .text("rotate", "abc");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains("invalid value, must be an integer"));
}

#[tokio::test]
async fn test_missing_file_part() {
    let base = spawn_app().await;
    let form = Form::new().text("grayscale", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains("no image file provided"));
}

#[tokio::test]
async fn test_missing_command_fields() {
    let base = spawn_app().await;
    let form = Form::new().part("imageFile", png_part(create_test_png(10, 10)));

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains("no transformation command provided"));
}

#[tokio::test]
async fn test_no_arg_command_rejects_parameter() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(10, 10)))
        .text("thumbnail", "x");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains("does not accept parameters"));
}

#[tokio::test]
async fn test_unknown_command_rejected() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(10, 10)))
        .text("sepia", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains("unknown command"));
}

#[tokio::test]
async fn test_unsupported_format_rejected() {
    let base = spawn_app().await;
    let part = Part::bytes(create_test_png(10, 10))
        .file_name("test.bmp")
        .mime_str("image/bmp")
        .unwrap();
    let form = Form::new().part("imageFile", part).text("grayscale", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body = resp.text().await.unwrap();
    assert!(body.contains("must be one of"));
}

#[tokio::test]
async fn test_rotate_left_then_right_round_trips() {
    let base = spawn_app().await;
    let original = create_test_png(20, 12);
    let form = Form::new()
        .part("imageFile", png_part(original.clone()))
        .text("rotateLeft", "")
        .text("rotateRight", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.bytes().await.unwrap();
    let output = image::load_from_memory(&body).unwrap();
    let input = image::load_from_memory(&original).unwrap();
    assert_eq!(input.to_rgba8(), output.to_rgba8());
}

#[tokio::test]
async fn test_grayscale_produces_single_channel_png() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(16, 16)))
        .text("grayscale", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.bytes().await.unwrap();
    let output = image::load_from_memory(&body).unwrap();
    assert!(matches!(output, DynamicImage::ImageLuma8(_)));
}

#[tokio::test]
async fn test_jpeg_upload_round_trips_as_jpeg() {
    let base = spawn_app().await;
    let part = Part::bytes(create_test_jpeg(60, 40))
        .file_name("photo.jpg")
        .mime_str("image/jpeg")
        .unwrap();
    let form = Form::new().part("imageFile", part).text("thumbnail", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/jpeg");

    let body = resp.bytes().await.unwrap();
    let output = image::load_from_memory(&body).unwrap();
    // 60x40 shrunk to fit the 50x50 box, aspect preserved
    assert_eq!((output.width(), output.height()), (50, 33));
}

#[tokio::test]
async fn test_commands_apply_in_submission_order() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(100, 100)))
        .text("resize", "50,25")
        .text("rotateRight", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.bytes().await.unwrap();
    let output = image::load_from_memory(&body).unwrap();
    // The quarter turn after the resize swaps the axes
    assert_eq!((output.width(), output.height()), (25, 50));
}

#[tokio::test]
async fn test_source_pixel_budget_enforced() {
    let mut config = Config::default();
    config.transform.max_source_pixels = 100;
    let base = spawn_app_with_config(config).await;

    let form = Form::new()
        .part("imageFile", png_part(create_test_png(100, 100)))
        .text("grayscale", "");

    let resp = reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 413);
    let body = resp.text().await.unwrap();
    assert!(body.contains("exceed limit"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_app().await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_metrics_endpoint_tracks_requests() {
    let base = spawn_app().await;
    let form = Form::new()
        .part("imageFile", png_part(create_test_png(10, 10)))
        .text("grayscale", "");

    reqwest::Client::new()
        .post(format!("{}/transform", base))
        .multipart(form)
        .send()
        .await
        .unwrap();

    let resp = reqwest::get(format!("{}/metrics", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("http_requests_total 1"));
    assert!(body.contains("http_requests_by_status_total{status=\"200\"} 1"));
    assert!(body.contains("transform_commands_total{command=\"grayscale\"} 1"));
}
