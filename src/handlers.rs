use crate::advisor::AdvisorService;
use crate::config::Config;
use crate::errors::{AppError, GENERIC_RECOMMENDATION_FAILURE};
use crate::models::{
    missing_profile_fields, ApiResponse, Profile, ProfileAnalysis, RecommendationsPayload,
    RecommendationsRequest, Scheme,
};
use crate::schemes::SchemeCatalog;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared application state injected into handlers.
///
/// The catalog is the only cross-request resource and is read-only. The
/// advisor is `None` when no usable Gemini key was present at startup;
/// requests needing it get a 503 before any external call.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// The static scheme catalog.
    pub catalog: SchemeCatalog,
    /// AI orchestrator (requires a configured API key).
    pub advisor: Option<AdvisorService>,
}

impl AppState {
    /// Returns the advisor, or the distinct "not configured" condition
    /// that callers must surface before attempting any external call.
    fn advisor(&self) -> Result<&AdvisorService, AppError> {
        self.advisor.as_ref().ok_or_else(|| {
            AppError::NotConfigured(
                "Gemini API key not set. Add your GEMINI_API_KEY to .env \
                 (get one at https://makersuite.google.com/app/apikey)"
                    .to_string(),
            )
        })
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "message": "Financial Suitability Platform API"
        })),
    )
}

/// GET /api/schemes
///
/// Returns the full static catalog.
pub async fn get_schemes(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<Scheme>>> {
    Json(ApiResponse::ok(state.catalog.schemes().to_vec()))
}

/// POST /api/analyze-profile
///
/// Validates the submitted profile and runs the model analysis over it.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The raw profile JSON from the wizard.
///
/// # Returns
///
/// * `Result<Json<ApiResponse<ProfileAnalysis>>, AppError>` - The profile
///   echoed back with its analysis, or an error (503 unconfigured, 400
///   invalid payload, 500 external failure).
pub async fn analyze_profile(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<ProfileAnalysis>>, AppError> {
    tracing::info!("POST /api/analyze-profile");

    // Key gate precedes validation; an unconfigured key is reported
    // before any external call is attempted.
    let advisor = state.advisor()?;

    let missing = missing_profile_fields(&payload);
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let profile: Profile = serde_json::from_value(payload)
        .map_err(|e| AppError::Validation(format!("Invalid profile: {}", e)))?;

    let analysis = advisor.analyze_profile(&profile).await?;

    tracing::info!(
        "Profile analyzed: risk={}, confidence={}",
        analysis.risk_assessment.level,
        analysis.confidence_score
    );

    Ok(Json(ApiResponse::ok(ProfileAnalysis { profile, analysis })))
}

/// POST /api/get-recommendations
///
/// Filters the catalog against the profile, then runs the two dependent
/// model calls (recommendations, then the plain-language explanation of
/// them). Recommendations referencing unknown scheme ids are dropped,
/// never fatal.
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<ApiResponse<RecommendationsPayload>>, AppError> {
    tracing::info!("POST /api/get-recommendations");

    let advisor = state.advisor()?;

    let has_profile = matches!(payload.get("profileData"), Some(v) if !v.is_null());
    let has_analysis = matches!(payload.get("analysis"), Some(v) if !v.is_null());
    if !has_profile || !has_analysis {
        return Err(AppError::Validation(
            "Profile data and analysis are required".to_string(),
        ));
    }

    let request: RecommendationsRequest = serde_json::from_value(payload)
        .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?;

    let schemes = state.catalog.filter_by_profile(&request.profile_data);

    let mut recommendations = advisor
        .generate_recommendations(&request.profile_data, &request.analysis, &schemes)
        .await
        .map_err(recommendation_failure)?;

    recommendations.scheme_recommendations.retain(|rec| {
        let known = state.catalog.scheme_by_id(&rec.scheme_id).is_some();
        if !known {
            tracing::warn!(
                "Dropping recommendation for unknown scheme id '{}'",
                rec.scheme_id
            );
        }
        known
    });

    let explanation = advisor
        .explain_in_simple_language(&request.analysis, &recommendations, request.language)
        .await
        .map_err(recommendation_failure)?;

    Ok(Json(ApiResponse::ok(RecommendationsPayload {
        recommendations,
        explanation,
        schemes,
    })))
}

/// Collapses any recommendation-pipeline failure into the fixed retry
/// message the client shows; the original cause only goes to the logs.
fn recommendation_failure(err: AppError) -> AppError {
    tracing::error!("Recommendations error: {}", err);
    AppError::ExternalApi(GENERIC_RECOMMENDATION_FAILURE.to_string())
}
