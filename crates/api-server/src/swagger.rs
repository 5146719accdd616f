//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Creative Studio API",
        version = "0.1.0",
        description = "Retail media creative compliance service.\n\nEvaluates creatives against the rulebook, scores them, auto-fixes common violations, and compresses images to a size budget.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Compliance", description = "Creative evaluation, scoring and auto-remediation"),
        (name = "Imaging", description = "Size-budgeted image compression"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Compliance
        crate::rest::handle_analyze,
        crate::rest::handle_fix,
        // Imaging
        crate::optimize_rest::handle_optimize,
        // Operations
        crate::rest::root,
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // Creative model
        creative_core::types::CreativeInput,
        creative_core::types::Creative,
        creative_core::types::ValueTile,
        creative_core::types::RuleId,
        creative_core::types::Severity,
        creative_core::types::Issue,
        creative_core::types::Verdict,
        creative_core::types::ScoreResult,
        creative_core::types::FixOutcome,
        creative_compliance::GeneratedCopy,
        crate::rest::AnalyzeResponse,
        crate::rest::FixResponse,
        // Imaging
        creative_imaging::OutputFormat,
        crate::optimize_rest::OptimizeRequest,
        crate::optimize_rest::OptimizeResponse,
        // REST error/health types
        crate::rest::RootResponse,
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
