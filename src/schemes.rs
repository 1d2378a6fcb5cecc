use crate::models::{
    EffortLevel, Eligibility, IncomeType, Profile, Purpose, Scheme, SchemeCategory,
};
use serde::Serialize;
use serde_json::json;

/// The static catalog of government assistance schemes.
///
/// Built once at process start and shared read-only across requests;
/// nothing in the service ever mutates it.
#[derive(Debug, Clone)]
pub struct SchemeCatalog {
    schemes: Vec<Scheme>,
}

/// Schemes partitioned by category, for display grouping only.
#[derive(Debug, Serialize)]
pub struct CategorizedSchemes {
    pub loans: Vec<Scheme>,
    pub subsidies: Vec<Scheme>,
    pub insurance: Vec<Scheme>,
}

fn eligibility(income_types: Vec<IncomeType>, target_group: &str) -> Eligibility {
    Eligibility {
        income_types,
        target_group: target_group.to_string(),
        max_landholding: None,
        business_age: None,
        business_type: None,
        crop_type: None,
        credit_history: None,
        vendor_card: None,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SchemeCatalog {
    pub fn new() -> Self {
        use IncomeType::*;

        let schemes = vec![
            Scheme {
                id: "pm_kisan".to_string(),
                name: "PM-KISAN (Pradhan Mantri Kisan Samman Nidhi)".to_string(),
                description:
                    "Direct income support of ₹6,000 per year to farmer families in three installments"
                        .to_string(),
                category: SchemeCategory::Subsidy,
                eligibility: Eligibility {
                    max_landholding: Some("No limit".to_string()),
                    ..eligibility(vec![Seasonal, Mixed], "Small and marginal farmers")
                },
                benefits: json!({
                    "amount": 6000,
                    "frequency": "yearly",
                    "installments": 3
                }),
                effort: EffortLevel::Low,
                documents: strings(&["Land records", "Aadhaar", "Bank account"]),
                application_url: "https://pmkisan.gov.in/".to_string(),
                processing_time: "30-60 days".to_string(),
            },
            Scheme {
                id: "mudra_shishu".to_string(),
                name: "MUDRA Shishu Loan".to_string(),
                description: "Collateral-free loans up to ₹50,000 for micro-enterprises"
                    .to_string(),
                category: SchemeCategory::Loan,
                eligibility: Eligibility {
                    business_age: Some("Any".to_string()),
                    ..eligibility(
                        vec![Daily, Irregular, Mixed],
                        "Micro-entrepreneurs, street vendors",
                    )
                },
                benefits: json!({
                    "amount": 50000,
                    "interestRate": "8-12%",
                    "tenure": "12-36 months"
                }),
                effort: EffortLevel::Medium,
                documents: strings(&[
                    "Business proof",
                    "Aadhaar",
                    "Bank statements",
                    "Residence proof",
                ]),
                application_url: "https://www.mudra.org.in/".to_string(),
                processing_time: "15-30 days".to_string(),
            },
            Scheme {
                id: "pm_fasal_bima".to_string(),
                name: "PM Fasal Bima Yojana".to_string(),
                description:
                    "Crop insurance scheme covering yield losses due to natural calamities"
                        .to_string(),
                category: SchemeCategory::Insurance,
                eligibility: Eligibility {
                    crop_type: Some("All notified crops".to_string()),
                    ..eligibility(vec![Seasonal], "Farmers")
                },
                benefits: json!({
                    "coverage": "Up to sum insured",
                    "premium": "1.5-5% of sum insured",
                    "subsidized": true
                }),
                effort: EffortLevel::Medium,
                documents: strings(&["Land records", "Sowing certificate", "Bank account"]),
                application_url: "https://pmfby.gov.in/".to_string(),
                processing_time: "Before sowing season".to_string(),
            },
            Scheme {
                id: "kisan_credit_card".to_string(),
                name: "Kisan Credit Card (KCC)".to_string(),
                description: "Revolving credit facility for agricultural expenses".to_string(),
                category: SchemeCategory::Loan,
                eligibility: Eligibility {
                    credit_history: Some("Not required".to_string()),
                    ..eligibility(
                        vec![Seasonal, Mixed],
                        "Farmers with land ownership/tenancy",
                    )
                },
                benefits: json!({
                    "amount": "Based on land holding and cropping pattern",
                    "interestRate": "4% (with subsidy)",
                    "tenure": "Revolving, annual renewal"
                }),
                effort: EffortLevel::Medium,
                documents: strings(&["Land documents", "Identity proof", "Address proof"]),
                application_url: "Visit nearest bank branch".to_string(),
                processing_time: "7-15 days".to_string(),
            },
            Scheme {
                id: "stand_up_india".to_string(),
                name: "Stand-Up India".to_string(),
                description: "Loans for SC/ST and women entrepreneurs (₹10 lakh to ₹1 crore)"
                    .to_string(),
                category: SchemeCategory::Loan,
                eligibility: Eligibility {
                    business_type: Some("Manufacturing, services, trading".to_string()),
                    ..eligibility(
                        vec![Daily, Irregular, Stable, Mixed],
                        "SC/ST/Women entrepreneurs",
                    )
                },
                benefits: json!({
                    "amount": "10 lakh - 1 crore",
                    "interestRate": "Base rate + 3%",
                    "tenure": "Up to 7 years"
                }),
                effort: EffortLevel::High,
                documents: strings(&[
                    "Business plan",
                    "Identity/category proof",
                    "Project report",
                    "Bank statements",
                ]),
                application_url: "https://www.standupmitra.in/".to_string(),
                processing_time: "30-60 days".to_string(),
            },
            Scheme {
                id: "pm_svanidhhi".to_string(),
                name: "PM SVANidhi (Street Vendor Loan)".to_string(),
                description: "Working capital loan for street vendors up to ₹50,000".to_string(),
                category: SchemeCategory::Loan,
                eligibility: Eligibility {
                    vendor_card: Some("Preferred but not mandatory".to_string()),
                    ..eligibility(vec![Daily, Irregular], "Street vendors")
                },
                benefits: json!({
                    "amount": 50000,
                    "interestRate": "7% subsidy on timely repayment",
                    "tenure": "12 months",
                    "digitalIncentive": "₹100/month for digital transactions"
                }),
                effort: EffortLevel::Low,
                documents: strings(&[
                    "Identity proof",
                    "Vendor certificate/recommendation",
                    "Bank account",
                ]),
                application_url: "https://pmsvanidhi.mohua.gov.in/".to_string(),
                processing_time: "7-15 days".to_string(),
            },
        ];

        Self { schemes }
    }

    /// All catalog entries, in catalog order.
    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn scheme_by_id(&self, id: &str) -> Option<&Scheme> {
        self.schemes.iter().find(|scheme| scheme.id == id)
    }

    /// Returns the schemes the profile may qualify for, preserving catalog
    /// order. A scheme passes when the profile's income type is among the
    /// scheme's accepted income types AND the purpose gate holds:
    ///
    /// - `working_capital` / `business_expansion` restrict to loans;
    /// - `crop_cultivation` restricts to loans, insurance, or PM-KISAN;
    /// - every other purpose imposes no category restriction.
    ///
    /// An empty result is valid, not an error.
    pub fn filter_by_profile(&self, profile: &Profile) -> Vec<Scheme> {
        self.schemes
            .iter()
            .filter(|scheme| scheme_matches(scheme, profile))
            .cloned()
            .collect()
    }

    /// Partitions a scheme sequence by category. Used for display grouping
    /// only; every scheme lands in exactly one partition.
    pub fn categorize(schemes: &[Scheme]) -> CategorizedSchemes {
        CategorizedSchemes {
            loans: schemes
                .iter()
                .filter(|s| s.category == SchemeCategory::Loan)
                .cloned()
                .collect(),
            subsidies: schemes
                .iter()
                .filter(|s| s.category == SchemeCategory::Subsidy)
                .cloned()
                .collect(),
            insurance: schemes
                .iter()
                .filter(|s| s.category == SchemeCategory::Insurance)
                .cloned()
                .collect(),
        }
    }
}

impl Default for SchemeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// The eligibility predicate behind [`SchemeCatalog::filter_by_profile`].
/// Pure and deterministic, so filtering is idempotent.
pub fn scheme_matches(scheme: &Scheme, profile: &Profile) -> bool {
    let income_match = scheme
        .eligibility
        .income_types
        .contains(&profile.income_type);

    let purpose_match = match profile.purpose {
        Purpose::WorkingCapital | Purpose::BusinessExpansion => {
            scheme.category == SchemeCategory::Loan
        }
        Purpose::CropCultivation => {
            matches!(
                scheme.category,
                SchemeCategory::Loan | SchemeCategory::Insurance
            ) || scheme.id == "pm_kisan"
        }
        _ => true,
    };

    income_match && purpose_match
}
