use crate::errors::AppError;
use crate::extractor::extract_json;
use crate::gemini::GeminiClient;
use crate::models::{Analysis, Explanation, Language, Profile, RecommendationBundle, Scheme};
use crate::prompts;
use serde::de::DeserializeOwned;

/// Orchestrates the three model round-trips: profile analysis, scheme and
/// loan recommendations, and the plain-language explanation.
///
/// Each operation is stateless and independent: build the prompt, make a
/// single blocking call, extract the embedded JSON, decode it. Any
/// failure propagates to the caller untouched; there is no retry and no
/// partial-failure handling, so one failed call aborts the whole
/// user-facing request.
pub struct AdvisorService {
    client: GeminiClient,
}

impl AdvisorService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub async fn analyze_profile(&self, profile: &Profile) -> Result<Analysis, AppError> {
        tracing::info!(
            "Analyzing profile: income_type={}, purpose={}",
            profile.income_type,
            profile.purpose
        );

        let prompt = prompts::profile_analysis(profile);
        let raw = self.client.generate_content(&prompt).await?;
        decode(&raw, "analysis")
    }

    pub async fn generate_recommendations(
        &self,
        profile: &Profile,
        analysis: &Analysis,
        schemes: &[Scheme],
    ) -> Result<RecommendationBundle, AppError> {
        tracing::info!(
            "Generating recommendations over {} filtered schemes",
            schemes.len()
        );

        let prompt = prompts::scheme_recommendations(profile, analysis, schemes);
        let raw = self.client.generate_content(&prompt).await?;
        decode(&raw, "recommendations")
    }

    pub async fn explain_in_simple_language(
        &self,
        analysis: &Analysis,
        recommendations: &RecommendationBundle,
        language: Language,
    ) -> Result<Explanation, AppError> {
        let prompt = prompts::simple_explanation(analysis, recommendations, language)?;
        let raw = self.client.generate_content(&prompt).await?;
        decode(&raw, "explanation")
    }
}

/// Extracts the JSON span from raw model text and decodes it into the
/// expected payload type.
fn decode<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, AppError> {
    let value = extract_json(raw)?;
    serde_json::from_value(value).map_err(|e| {
        AppError::MalformedResponse(format!("{} did not match the expected schema: {}", what, e))
    })
}
