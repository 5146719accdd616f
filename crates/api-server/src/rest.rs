//! REST API handlers for creative analysis, remediation and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use creative_compliance::{generate_copy, ComplianceEngine, GeneratedCopy};
use creative_core::types::{Creative, CreativeInput, FixOutcome, Issue, Verdict};
use creative_core::CreativeError;
use creative_imaging::ImageOptimizer;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub compliance: Arc<ComplianceEngine>,
    pub optimizer: Arc<ImageOptimizer>,
    pub node_id: String,
    pub start_time: Instant,
}

/// GET /: Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "Operations",
    responses((status = 200, description = "Service is running", body = RootResponse))
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Retail media creative service running".to_string(),
    })
}

/// POST /v1/analyze: Evaluate and score a creative.
#[utoipa::path(
    post,
    path = "/v1/analyze",
    tag = "Compliance",
    request_body = CreativeInput,
    responses(
        (status = 200, description = "Creative analyzed", body = AnalyzeResponse),
    )
)]
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(input): Json<CreativeInput>,
) -> Json<AnalyzeResponse> {
    let creative = Creative::from(input);
    let analysis = state.compliance.analyze(&creative);
    let id = Uuid::new_v4();

    info!(
        analysis_id = %id,
        score = analysis.score,
        verdict = analysis.status.as_str(),
        issues = analysis.issues.len(),
        "Creative analyzed"
    );

    Json(AnalyzeResponse {
        id,
        status: analysis.status,
        score: analysis.score,
        issues: analysis.issues,
        creative: generate_copy(&creative),
        analyzed_at: Utc::now(),
    })
}

/// POST /v1/fix: Auto-remediate a creative and re-evaluate it.
#[utoipa::path(
    post,
    path = "/v1/fix",
    tag = "Compliance",
    request_body = CreativeInput,
    responses(
        (status = 200, description = "Fixes applied; post-fix issues are authoritative", body = FixResponse),
    )
)]
pub async fn handle_fix(
    State(state): State<AppState>,
    Json(input): Json<CreativeInput>,
) -> Json<FixResponse> {
    let creative = Creative::from(input);
    let outcome = state.compliance.fix(&creative);
    let preview = generate_copy(&outcome.fixed_creative);
    Json(FixResponse { outcome, preview })
}

/// GET /health: Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Service health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready: Readiness probe.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses((status = 200, description = "Ready to accept traffic"))
)]
pub async fn readiness() -> StatusCode {
    // Engines are built before the router; nothing to wait on.
    StatusCode::OK
}

/// GET /live: Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Map a core error onto an HTTP error response.
pub(crate) fn error_response(err: CreativeError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is_client_error() {
        warn!(error = %err, "Rejected request payload");
        metrics::counter!("api.validation_errors").increment(1);
        let code = match err {
            CreativeError::Decode(_) => "image_decode_failed",
            _ => "invalid_payload",
        };
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: code.to_string(),
                message: err.to_string(),
            }),
        )
    } else {
        error!(error = %err, "Request processing failed");
        metrics::counter!("api.errors").increment(1);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "internal_error".to_string(),
                message: "Internal processing error".to_string(),
            }),
        )
    }
}

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub status: Verdict,
    pub score: u32,
    pub issues: Vec<Issue>,
    /// Preview copy with placeholders and disclaimer applied.
    pub creative: GeneratedCopy,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct FixResponse {
    #[serde(flatten)]
    pub outcome: FixOutcome,
    pub preview: GeneratedCopy,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::server::router;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            compliance: Arc::new(ComplianceEngine::default()),
            optimizer: Arc::new(ImageOptimizer::default()),
            node_id: "test-node".to_string(),
            start_time: Instant::now(),
        }
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router(test_state(), 1024 * 1024)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analyze_empty_creative() {
        let (status, payload) = post_json("/v1/analyze", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "Approved");
        assert_eq!(payload["score"], 80);
        assert_eq!(payload["issues"][0]["rule_id"], "Weak CTA");
        assert_eq!(payload["issues"][1]["rule_id"], "Missing Image");
        assert_eq!(payload["creative"]["cta"], "Shop Now");
        assert!(payload.get("id").is_some());
    }

    #[tokio::test]
    async fn test_analyze_accepts_legacy_fields_and_nulls() {
        let (status, payload) = post_json(
            "/v1/analyze",
            json!({
                "headline": "Fresh bakes every morning",
                "subhead": null,
                "cta": "Shop now",
                "image_url": "https://cdn.example.com/bread.png",
                "category": "alcohol",
                "alcohol": true,
                "cta_overlap": true
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["score"], 50);
        assert_eq!(payload["status"], "Rejected");
        assert_eq!(payload["issues"][0]["rule_id"], "Alcohol Compliance");
        assert_eq!(payload["issues"][1]["rule_id"], "CTA Placement");
        assert_eq!(
            payload["creative"]["disclaimer"],
            "Please drink responsibly. Visit drinkaware.co.uk"
        );
    }

    #[tokio::test]
    async fn test_fix_returns_outcome_and_preview() {
        let (status, payload) = post_json(
            "/v1/fix",
            json!({"alcohol": true, "clubcard": true, "clubcard_end_date": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["original_issues"].as_array().unwrap().len(), 4);
        assert_eq!(payload["fixed_creative"]["clubcard_end_date"], "31/12");
        assert_eq!(payload["fixed_creative"]["alcohol"], true);
        assert_eq!(payload["score_after_fix"]["score"], 65);
        assert_eq!(payload["score_after_fix"]["verdict"], "Rejected");
        assert_eq!(payload["preview"]["cta"], "Shop Now");
        assert!(payload["applied_fixes"]
            .as_array()
            .unwrap()
            .contains(&json!("Set Clubcard end date to 31/12")));
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = router(test_state(), 1024);
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 1024).await.unwrap();
        let payload: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload["node_id"], "test-node");

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_mapping() {
        let (status, body) = error_response(CreativeError::Decode("garbage".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "image_decode_failed");

        let (status, body) = error_response(CreativeError::Encode("codec".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Internal processing error");
    }
}
