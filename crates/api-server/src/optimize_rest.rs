//! Image optimization REST endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use creative_core::CreativeError;
use creative_imaging::OutputFormat;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::rest::{error_response, AppState, ErrorResponse};

/// POST /v1/optimize: Compress an uploaded image to fit a size budget.
#[utoipa::path(
    post,
    path = "/v1/optimize",
    tag = "Imaging",
    request_body = OptimizeRequest,
    responses(
        (status = 200, description = "Image compressed", body = OptimizeResponse),
        (status = 400, description = "Payload or image could not be decoded", body = ErrorResponse),
    )
)]
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, Json<ErrorResponse>)> {
    let raw = decode_image_payload(&request.image_data).map_err(error_response)?;
    let format = request.output_format.as_deref().map(OutputFormat::from_name);
    let max_kb = request.max_kb;
    let input_bytes = raw.len();

    // Decoding and re-encoding is CPU bound.
    let optimizer = state.optimizer.clone();
    let optimized = tokio::task::spawn_blocking(move || optimizer.optimize(&raw, max_kb, format))
        .await
        .map_err(|e| error_response(CreativeError::Internal(e.into())))?
        .map_err(error_response)?;

    info!(
        input_bytes,
        output_bytes = optimized.size_bytes,
        quality = optimized.quality,
        "Image optimized"
    );

    let data_url = format!(
        "data:{};base64,{}",
        optimized.format.mime_type(),
        STANDARD.encode(&optimized.bytes)
    );

    Ok(Json(OptimizeResponse {
        data_url,
        size_bytes: optimized.size_bytes,
        quality: optimized.quality,
        format: optimized.format,
        width: optimized.width,
        height: optimized.height,
    }))
}

/// Strip an optional `data:<mime>;base64,` prefix and decode the payload.
fn decode_image_payload(image_data: &str) -> Result<Vec<u8>, CreativeError> {
    let encoded = match image_data.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(image_data, |(_, data)| data),
        None => image_data,
    };
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CreativeError::InvalidPayload(format!("Invalid base64 image data: {e}")))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OptimizeRequest {
    /// Base64 image bytes, optionally wrapped in a data URL.
    pub image_data: String,
    /// `jpeg` (default) or `png`. PNG is only returned when it fits losslessly.
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default)]
    pub max_kb: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OptimizeResponse {
    pub data_url: String,
    pub size_bytes: usize,
    pub quality: u8,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::server::router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use creative_compliance::ComplianceEngine;
    use creative_imaging::ImageOptimizer;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use serde_json::{json, Value};
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Instant;
    use tower::ServiceExt;

    fn png_base64(width: u32, height: u32) -> String {
        let image = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 90]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        STANDARD.encode(buf)
    }

    async fn post_optimize(body: Value) -> (StatusCode, Value) {
        let state = AppState {
            compliance: Arc::new(ComplianceEngine::default()),
            optimizer: Arc::new(ImageOptimizer::default()),
            node_id: "test-node".to_string(),
            start_time: Instant::now(),
        };
        let response = router(state, 4 * 1024 * 1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/optimize")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 4 * 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_decode_plain_and_data_url() {
        let plain = STANDARD.encode(b"abc");
        assert_eq!(decode_image_payload(&plain).unwrap(), b"abc");

        let data_url = format!("data:image/png;base64,{plain}");
        assert_eq!(decode_image_payload(&data_url).unwrap(), b"abc");

        let err = decode_image_payload("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, CreativeError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_optimize_data_url_defaults_to_jpeg() {
        let data_url = format!("data:image/png;base64,{}", png_base64(48, 48));
        let (status, payload) = post_optimize(json!({ "image_data": data_url })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["quality"], 95);
        assert_eq!(payload["format"], "jpeg");
        assert_eq!(payload["width"], 48);
        assert!(payload["data_url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_optimize_png_when_it_fits() {
        let (status, payload) = post_optimize(json!({
            "image_data": png_base64(16, 16),
            "output_format": "png",
            "max_kb": 100
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["format"], "png");
        assert_eq!(payload["quality"], 100);
    }

    #[tokio::test]
    async fn test_optimize_rejects_bad_input() {
        let (status, payload) = post_optimize(json!({ "image_data": "not base64!" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "invalid_payload");

        let (status, payload) =
            post_optimize(json!({ "image_data": STANDARD.encode(b"plain text") })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["error"], "image_decode_failed");
    }
}
