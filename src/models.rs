use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============ Profile (user input) ============

/// How the user earns their income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    Seasonal,
    Daily,
    Irregular,
    Stable,
    Mixed,
}

impl IncomeType {
    /// Wire/prompt representation of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Seasonal => "seasonal",
            IncomeType::Daily => "daily",
            IncomeType::Irregular => "irregular",
            IncomeType::Stable => "stable",
            IncomeType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for IncomeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported stability of the income stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStability {
    VeryStable,
    SomewhatStable,
    Variable,
    HighlyVariable,
}

impl IncomeStability {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeStability::VeryStable => "very_stable",
            IncomeStability::SomewhatStable => "somewhat_stable",
            IncomeStability::Variable => "variable",
            IncomeStability::HighlyVariable => "highly_variable",
        }
    }
}

impl fmt::Display for IncomeStability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk factors the user reports being exposed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskExposure {
    Weather,
    Health,
    Market,
    Competition,
    Seasonal,
}

impl RiskExposure {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskExposure::Weather => "weather",
            RiskExposure::Health => "health",
            RiskExposure::Market => "market",
            RiskExposure::Competition => "competition",
            RiskExposure::Seasonal => "seasonal",
        }
    }
}

impl fmt::Display for RiskExposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user wants the money for. Drives the purpose gate in the
/// scheme filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    WorkingCapital,
    BusinessExpansion,
    CropCultivation,
    EquipmentPurchase,
    Emergency,
    Education,
    HomeImprovement,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::WorkingCapital => "working_capital",
            Purpose::BusinessExpansion => "business_expansion",
            Purpose::CropCultivation => "crop_cultivation",
            Purpose::EquipmentPurchase => "equipment_purchase",
            Purpose::Emergency => "emergency",
            Purpose::Education => "education",
            Purpose::HomeImprovement => "home_improvement",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's self-reported financial profile.
///
/// Created once per wizard session from user input and immutable
/// thereafter; never persisted. Amount fields accept either JSON numbers
/// or numeric strings because the wizard posts raw form values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub income_type: IncomeType,
    #[serde(deserialize_with = "de_amount")]
    pub monthly_income: f64,
    pub income_stability: IncomeStability,
    #[serde(deserialize_with = "de_amount")]
    pub household_expenses: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub business_expenses: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub existing_debts: f64,
    /// Degrades to empty on absent, null, non-array, or unknown tags.
    #[serde(default, deserialize_with = "de_risk_tags")]
    pub risk_exposure: Vec<RiskExposure>,
    pub purpose: Purpose,
}

/// Required profile fields, in the order they are reported when missing.
pub const REQUIRED_PROFILE_FIELDS: [&str; 5] = [
    "incomeType",
    "monthlyIncome",
    "incomeStability",
    "householdExpenses",
    "purpose",
];

/// Returns the required fields absent from a raw profile payload.
///
/// A field counts as missing when it is absent, null, an empty string, or
/// numeric zero.
pub fn missing_profile_fields(payload: &Value) -> Vec<&'static str> {
    REQUIRED_PROFILE_FIELDS
        .iter()
        .copied()
        .filter(|field| field_is_missing(payload.get(*field)))
        .collect()
}

fn field_is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !b,
        Some(_) => false,
    }
}

/// Accepts a JSON number or a numeric string; rejects negatives.
fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let amount = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => Some(0.0),
        _ => None,
    };
    match amount {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative amount, got {}",
            value
        ))),
    }
}

/// Lenient risk-tag list: anything that is not an array of known tags
/// degrades to the empty set rather than failing the request.
fn de_risk_tags<'de, D>(deserializer: D) -> Result<Vec<RiskExposure>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let tags = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RiskExposure>(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(tags)
}

// ============ Scheme catalog records ============

/// Category of a government assistance scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeCategory {
    Loan,
    Subsidy,
    Insurance,
}

impl SchemeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeCategory::Loan => "loan",
            SchemeCategory::Subsidy => "subsidy",
            SchemeCategory::Insurance => "insurance",
        }
    }
}

impl fmt::Display for SchemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paperwork burden of applying to a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
    Low,
    Medium,
    High,
}

/// Eligibility metadata attached to a scheme record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eligibility {
    /// Income types the scheme accepts; the primary filter attribute.
    pub income_types: Vec<IncomeType>,
    pub target_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_landholding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_card: Option<String>,
}

/// A government loan/subsidy/insurance program in the static catalog.
///
/// Loaded once at process start and never mutated. `benefits` is
/// free-form because each scheme describes amounts, rates, and tenures
/// with its own shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: SchemeCategory,
    pub eligibility: Eligibility,
    pub benefits: Value,
    pub effort: EffortLevel,
    pub documents: Vec<String>,
    pub application_url: String,
    pub processing_time: String,
}

// ============ Analysis (model output) ============

/// Income pattern read from the model's analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomePattern {
    #[serde(rename = "type", default)]
    pub pattern_type: String,
    #[serde(default)]
    pub volatility: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub factors: Vec<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepaymentCapacity {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub monthly_capacity: f64,
    #[serde(default)]
    pub description: String,
}

/// The model's loan-versus-scheme verdict inside an analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitabilityVerdict {
    #[serde(default)]
    pub suitable_for_loan: bool,
    #[serde(default)]
    pub suitable_for_scheme: bool,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Structured financial analysis produced by the external model.
///
/// Schema-validated on decode; list fields and descriptions default to
/// empty because the model occasionally omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub income_pattern: IncomePattern,
    pub risk_assessment: RiskAssessment,
    pub repayment_capacity: RepaymentCapacity,
    pub recommendations: SuitabilityVerdict,
    #[serde(default)]
    pub warning_flags: Vec<String>,
    #[serde(default)]
    pub confidence_score: f64,
}

// ============ Recommendation bundle (model output) ============

/// Tri-state verdict the model attaches to a scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    Suitable,
    Caution,
    NotRecommended,
}

/// Tri-state verdict the model attaches to taking a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanSuitability {
    Suitable,
    Risky,
    NotRecommended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentFrequency {
    Monthly,
    Quarterly,
    Seasonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BestOption {
    Scheme,
    Loan,
    Both,
    Neither,
}

/// Per-scheme recommendation referencing a catalog entry by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemeRecommendation {
    pub scheme_id: String,
    pub suitability: Suitability,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub eligibility_match: f64,
    #[serde(default)]
    pub action_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanEvaluation {
    pub suitability: LoanSuitability,
    #[serde(default)]
    pub recommended_amount: f64,
    #[serde(default)]
    pub recommended_tenure: f64,
    pub repayment_frequency: RepaymentFrequency,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub mitigation_steps: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub best_option: BestOption,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub timeline: String,
}

/// Scheme and loan recommendations produced by the external model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationBundle {
    #[serde(default)]
    pub scheme_recommendations: Vec<SchemeRecommendation>,
    pub loan_evaluation: LoanEvaluation,
    pub comparison: Comparison,
}

// ============ Plain-language explanation (model output) ============

/// Target language for the plain-language explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

// ============ API Request/Response Models ============

/// Standard success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Payload of a successful `POST /api/analyze-profile`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnalysis {
    pub profile: Profile,
    pub analysis: Analysis,
}

/// Request body of `POST /api/get-recommendations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    pub profile_data: Profile,
    pub analysis: Analysis,
    #[serde(default)]
    pub language: Language,
}

/// Payload of a successful `POST /api/get-recommendations`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsPayload {
    pub recommendations: RecommendationBundle,
    pub explanation: Explanation,
    pub schemes: Vec<Scheme>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_accepts_numeric_strings_for_amounts() {
        let profile: Profile = serde_json::from_value(json!({
            "incomeType": "seasonal",
            "monthlyIncome": "12000",
            "incomeStability": "variable",
            "householdExpenses": 6000,
            "purpose": "crop_cultivation"
        }))
        .unwrap();

        assert_eq!(profile.monthly_income, 12000.0);
        assert_eq!(profile.household_expenses, 6000.0);
        assert_eq!(profile.business_expenses, 0.0);
        assert_eq!(profile.existing_debts, 0.0);
        assert!(profile.risk_exposure.is_empty());
    }

    #[test]
    fn profile_rejects_negative_amounts() {
        let result = serde_json::from_value::<Profile>(json!({
            "incomeType": "daily",
            "monthlyIncome": -5,
            "incomeStability": "variable",
            "householdExpenses": 6000,
            "purpose": "emergency"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_risk_exposure_degrades_to_empty() {
        let base = json!({
            "incomeType": "daily",
            "monthlyIncome": 500,
            "incomeStability": "variable",
            "householdExpenses": 300,
            "purpose": "emergency"
        });

        for bad in [json!("weather"), json!(42), json!({"tag": "weather"})] {
            let mut payload = base.clone();
            payload["riskExposure"] = bad;
            let profile: Profile = serde_json::from_value(payload).unwrap();
            assert!(profile.risk_exposure.is_empty());
        }

        // Unknown tags inside an otherwise valid array are skipped
        let mut payload = base.clone();
        payload["riskExposure"] = json!(["weather", "asteroids", "health"]);
        let profile: Profile = serde_json::from_value(payload).unwrap();
        assert_eq!(
            profile.risk_exposure,
            vec![RiskExposure::Weather, RiskExposure::Health]
        );
    }

    #[test]
    fn missing_fields_reported_in_declaration_order() {
        let missing = missing_profile_fields(&json!({
            "monthlyIncome": 12000,
            "householdExpenses": 6000
        }));
        assert_eq!(missing, vec!["incomeType", "incomeStability", "purpose"]);
    }

    #[test]
    fn empty_and_zero_values_count_as_missing() {
        let missing = missing_profile_fields(&json!({
            "incomeType": "",
            "monthlyIncome": 0,
            "incomeStability": "variable",
            "householdExpenses": 6000,
            "purpose": "education"
        }));
        assert_eq!(missing, vec!["incomeType", "monthlyIncome"]);
    }

    #[test]
    fn analysis_decodes_with_missing_optional_fields() {
        let analysis: Analysis = serde_json::from_value(json!({
            "incomePattern": {"type": "seasonal", "volatility": "high"},
            "riskAssessment": {"level": "medium"},
            "repaymentCapacity": {"score": 55, "monthlyCapacity": 3000},
            "recommendations": {"suitableForLoan": true, "suitableForScheme": true}
        }))
        .unwrap();

        assert_eq!(analysis.income_pattern.pattern_type, "seasonal");
        assert!(analysis.warning_flags.is_empty());
        assert_eq!(analysis.confidence_score, 0.0);
    }

    #[test]
    fn recommendation_bundle_rejects_unknown_suitability() {
        let result = serde_json::from_value::<RecommendationBundle>(json!({
            "schemeRecommendations": [
                {"schemeId": "pm_kisan", "suitability": "excellent"}
            ],
            "loanEvaluation": {
                "suitability": "suitable",
                "repaymentFrequency": "monthly"
            },
            "comparison": {"bestOption": "scheme"}
        }));
        assert!(result.is_err());
    }
}
