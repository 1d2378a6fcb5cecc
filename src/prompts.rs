//! Prompt construction for the three model round-trips.
//!
//! All builders are deterministic given identical inputs and never mutate
//! them. Nested structures are embedded through `serde_json`, not manual
//! string concatenation, so quoting in the user data cannot corrupt the
//! JSON-in-JSON round trip.

use crate::errors::AppError;
use crate::models::{Analysis, Language, Profile, RecommendationBundle, Scheme};
use serde_json::json;

/// Prompt for the initial profile analysis. Instructs the model to return
/// only a JSON object matching the [`Analysis`] schema.
pub fn profile_analysis(profile: &Profile) -> String {
    let risk_exposure = if profile.risk_exposure.is_empty() {
        "None".to_string()
    } else {
        profile
            .risk_exposure
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"You are a financial suitability analyst for underserved communities in India. Analyze this financial profile and provide structured insights.

User Profile:
- Income Type: {income_type}
- Monthly Income: ₹{monthly_income}
- Income Stability: {income_stability}
- Household Expenses: ₹{household_expenses}
- Business Expenses: ₹{business_expenses}
- Existing Debts: ₹{existing_debts}
- Risk Exposure: {risk_exposure}
- Purpose: {purpose}

Provide a JSON response with this exact structure (no markdown, just JSON):
{{
  "incomePattern": {{
    "type": "seasonal|irregular|stable",
    "volatility": "high|medium|low",
    "description": "Brief description of income pattern"
  }},
  "riskAssessment": {{
    "level": "high|medium|low",
    "factors": ["factor1", "factor2"],
    "description": "Risk analysis"
  }},
  "repaymentCapacity": {{
    "score": 0-100,
    "monthlyCapacity": number,
    "description": "Explanation"
  }},
  "recommendations": {{
    "suitableForLoan": boolean,
    "suitableForScheme": boolean,
    "priority": "loan|scheme|both|neither",
    "reasoning": "Clear explanation"
  }},
  "warningFlags": ["flag1", "flag2"],
  "confidenceScore": 0-100
}}"#,
        income_type = profile.income_type,
        monthly_income = profile.monthly_income,
        income_stability = profile.income_stability,
        household_expenses = profile.household_expenses,
        business_expenses = profile.business_expenses,
        existing_debts = profile.existing_debts,
        risk_exposure = risk_exposure,
        purpose = profile.purpose,
    )
}

/// Prompt for scheme/loan recommendations, given the prior analysis and
/// the filtered scheme list.
pub fn scheme_recommendations(
    profile: &Profile,
    analysis: &Analysis,
    schemes: &[Scheme],
) -> String {
    let scheme_lines = schemes
        .iter()
        .map(|s| format!("- {}: {}", s.name, s.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Based on this financial analysis, recommend suitable schemes and evaluate loan suitability.

Profile Summary:
- Income Type: {income_type}
- Monthly Income: ₹{monthly_income}
- Purpose: {purpose}

Analysis Results:
- Income Pattern: {pattern_type} ({volatility} volatility)
- Risk Level: {risk_level}
- Repayment Capacity: ₹{monthly_capacity}/month

Available Schemes:
{scheme_lines}

Provide recommendations in JSON format (no markdown):
{{
  "schemeRecommendations": [
    {{
      "schemeId": "scheme_id",
      "suitability": "suitable|caution|not_recommended",
      "reasoning": "Why this matches/doesn't match",
      "eligibilityMatch": 0-100,
      "actionSteps": ["step1", "step2"]
    }}
  ],
  "loanEvaluation": {{
    "suitability": "suitable|risky|not_recommended",
    "recommendedAmount": number,
    "recommendedTenure": number,
    "repaymentFrequency": "monthly|quarterly|seasonal",
    "reasoning": "Detailed explanation",
    "mitigationSteps": ["step1", "step2"],
    "alternatives": ["alternative1", "alternative2"]
  }},
  "comparison": {{
    "bestOption": "scheme|loan|both|neither",
    "reasoning": "Comparative analysis",
    "timeline": "Suggested sequence of actions"
  }}
}}"#,
        income_type = profile.income_type,
        monthly_income = profile.monthly_income,
        purpose = profile.purpose,
        pattern_type = analysis.income_pattern.pattern_type,
        volatility = analysis.income_pattern.volatility,
        risk_level = analysis.risk_assessment.level,
        monthly_capacity = analysis.repayment_capacity.monthly_capacity,
        scheme_lines = scheme_lines,
    )
}

/// Prompt translating the technical analysis and recommendations into a
/// plain-language explanation in the requested target language.
pub fn simple_explanation(
    analysis: &Analysis,
    recommendations: &RecommendationBundle,
    language: Language,
) -> Result<String, AppError> {
    let technical_content = serde_json::to_string_pretty(&json!({
        "analysis": analysis,
        "recommendations": recommendations,
    }))
    .map_err(|e| AppError::Internal(format!("failed to serialize technical content: {}", e)))?;

    let language_name = match language {
        Language::English => "English",
        Language::Hindi => "Hindi",
    };

    Ok(format!(
        r#"Translate this financial analysis into simple, culturally appropriate language for Indian farmers/micro-entrepreneurs.

Technical Content:
{technical_content}

Provide a simple explanation in {language_name} that:
- Uses everyday language
- Includes relevant examples
- Shows empathy
- Avoids jargon
- Is actionable

Format as JSON:
{{
  "summary": "2-3 sentence summary",
  "keyPoints": ["point1", "point2", "point3"],
  "nextSteps": ["step1", "step2"],
  "warnings": ["warning1", "warning2"]
}}"#,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IncomeStability, IncomeType, Purpose, RiskExposure};
    use crate::schemes::SchemeCatalog;

    fn sample_profile() -> Profile {
        Profile {
            income_type: IncomeType::Seasonal,
            monthly_income: 12000.0,
            income_stability: IncomeStability::Variable,
            household_expenses: 6000.0,
            business_expenses: 2000.0,
            existing_debts: 0.0,
            risk_exposure: vec![RiskExposure::Weather, RiskExposure::Market],
            purpose: Purpose::CropCultivation,
        }
    }

    fn sample_analysis() -> Analysis {
        serde_json::from_value(serde_json::json!({
            "incomePattern": {"type": "seasonal", "volatility": "high", "description": "d"},
            "riskAssessment": {"level": "medium", "factors": [], "description": "d"},
            "repaymentCapacity": {"score": 60, "monthlyCapacity": 3500, "description": "d"},
            "recommendations": {
                "suitableForLoan": true,
                "suitableForScheme": true,
                "priority": "both",
                "reasoning": "r"
            },
            "warningFlags": [],
            "confidenceScore": 75
        }))
        .unwrap()
    }

    #[test]
    fn analysis_prompt_embeds_all_profile_fields() {
        let prompt = profile_analysis(&sample_profile());
        assert!(prompt.contains("Income Type: seasonal"));
        assert!(prompt.contains("Monthly Income: ₹12000"));
        assert!(prompt.contains("Income Stability: variable"));
        assert!(prompt.contains("Risk Exposure: weather, market"));
        assert!(prompt.contains("Purpose: crop_cultivation"));
        assert!(prompt.contains("no markdown, just JSON"));
    }

    #[test]
    fn analysis_prompt_reports_empty_risk_exposure_as_none() {
        let mut profile = sample_profile();
        profile.risk_exposure.clear();
        let prompt = profile_analysis(&profile);
        assert!(prompt.contains("Risk Exposure: None"));
    }

    #[test]
    fn analysis_prompt_is_deterministic() {
        let profile = sample_profile();
        assert_eq!(profile_analysis(&profile), profile_analysis(&profile));
    }

    #[test]
    fn recommendation_prompt_lists_each_scheme() {
        let catalog = SchemeCatalog::new();
        let schemes = catalog.filter_by_profile(&sample_profile());
        let prompt = scheme_recommendations(&sample_profile(), &sample_analysis(), &schemes);
        for scheme in &schemes {
            assert!(prompt.contains(&scheme.name));
            assert!(prompt.contains(&scheme.description));
        }
        assert!(prompt.contains("Risk Level: medium"));
        assert!(prompt.contains("Repayment Capacity: ₹3500/month"));
    }

    #[test]
    fn explanation_prompt_embeds_valid_json_content() {
        let analysis = sample_analysis();
        let bundle: RecommendationBundle = serde_json::from_value(serde_json::json!({
            "schemeRecommendations": [],
            "loanEvaluation": {"suitability": "suitable", "repaymentFrequency": "monthly"},
            "comparison": {"bestOption": "scheme"}
        }))
        .unwrap();

        let prompt = simple_explanation(&analysis, &bundle, Language::English).unwrap();
        assert!(prompt.contains("in English"));

        // the embedded technical content must itself be parseable JSON
        let technical_content = serde_json::to_string_pretty(&serde_json::json!({
            "analysis": analysis,
            "recommendations": bundle,
        }))
        .unwrap();
        assert!(prompt.contains(&technical_content));
        assert!(serde_json::from_str::<serde_json::Value>(&technical_content).is_ok());

        let hindi = simple_explanation(&analysis, &bundle, Language::Hindi).unwrap();
        assert!(hindi.contains("in Hindi"));
    }
}
