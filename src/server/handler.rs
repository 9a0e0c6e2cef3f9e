//! Request handlers for the transform endpoint
//!
//! The transform handler reads the multipart upload into memory,
//! validates the command list in full, runs the pipeline, and replies
//! with the raw transformed bytes. Failures map to a JSON error payload
//! with the status from the error taxonomy.

use std::time::Instant;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::json;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::transform::{parse_command_list, process, ImageFormat, TransformedImage};

use super::AppState;

/// The uploaded image plus the ordered command fields from the form
struct Upload {
    data: Bytes,
    media_type: String,
    fields: Vec<(String, String)>,
}

/// POST /transform
///
/// multipart/form-data with one file part carrying the image and one
/// form field per command, in application order. Replies 200 with the
/// transformed bytes and `Content-Type: image/<format>`.
pub async fn transform_image(State(state): State<AppState>, multipart: Multipart) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("transform", %request_id);

    state.metrics.increment_request_count();
    let started = Instant::now();

    match handle_transform(&state, multipart).instrument(span).await {
        Ok(image) => {
            state.metrics.record_duration(started.elapsed().as_micros() as u64);
            state.metrics.increment_status_count(200);
            info!(
                %request_id,
                original_size = ?image.original_size,
                output_size = ?image.output_size,
                bytes = image.data.len(),
                "transform request completed"
            );
            ([(header::CONTENT_TYPE, image.content_type)], image.data).into_response()
        }
        Err(err) => {
            let status = err.to_http_status();
            state.metrics.increment_status_count(status);
            warn!(%request_id, error = %err, status, "transform request failed");
            error_response(status, &err)
        }
    }
}

async fn handle_transform(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<TransformedImage, ServiceError> {
    let upload = read_upload(&mut multipart).await?;
    let format = ImageFormat::from_media_type(&upload.media_type)?;
    let commands = parse_command_list(&upload.fields)?;

    debug!(
        format = format.as_str(),
        commands = commands.len(),
        upload_bytes = upload.data.len(),
        "command list validated"
    );

    let image = process(
        &upload.data,
        format,
        &commands,
        state.config.transform.max_source_pixels,
    )?;

    for command in &commands {
        state.metrics.increment_command_count(command.label());
    }

    Ok(image)
}

/// Drain the multipart stream into the image part and the command fields.
///
/// The image is the part named `imageFile` or any part carrying a
/// filename; the first such part wins. Every other part is a command
/// field, collected in arrival order.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ServiceError> {
    let mut image: Option<(Bytes, String)> = None;
    let mut fields = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(read_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() || name == "imageFile" {
            let media_type = field.content_type().unwrap_or_default().to_string();
            let data = field.bytes().await.map_err(read_error)?;
            if image.is_none() {
                image = Some((data, media_type));
            }
        } else {
            let value = field.text().await.map_err(read_error)?;
            fields.push((name, value));
        }
    }

    let (data, media_type) = image.ok_or(ServiceError::MissingImage)?;
    if fields.is_empty() {
        return Err(ServiceError::MissingCommands);
    }

    Ok(Upload {
        data,
        media_type,
        fields,
    })
}

fn read_error(err: MultipartError) -> ServiceError {
    ServiceError::Internal(format!("failed to read request body: {}", err))
}

fn error_response(status: u16, err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

/// GET /health
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// GET /metrics
pub async fn metrics_export(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.export_prometheus(),
    )
        .into_response()
}
