/// Property-based tests using proptest
/// Tests invariants of the response extractor and the scheme filter
use financial_suitability_api::extractor::extract_json;
use financial_suitability_api::models::{
    IncomeStability, IncomeType, Profile, Purpose, SchemeCategory,
};
use financial_suitability_api::schemes::{scheme_matches, SchemeCatalog};
use proptest::prelude::*;

fn income_type_strategy() -> impl Strategy<Value = IncomeType> {
    prop::sample::select(vec![
        IncomeType::Seasonal,
        IncomeType::Daily,
        IncomeType::Irregular,
        IncomeType::Stable,
        IncomeType::Mixed,
    ])
}

fn purpose_strategy() -> impl Strategy<Value = Purpose> {
    prop::sample::select(vec![
        Purpose::WorkingCapital,
        Purpose::BusinessExpansion,
        Purpose::CropCultivation,
        Purpose::EquipmentPurchase,
        Purpose::Emergency,
        Purpose::Education,
        Purpose::HomeImprovement,
    ])
}

fn profile_strategy() -> impl Strategy<Value = Profile> {
    (
        income_type_strategy(),
        purpose_strategy(),
        0.0..1_000_000.0f64,
        0.0..1_000_000.0f64,
    )
        .prop_map(|(income_type, purpose, monthly_income, household_expenses)| Profile {
            income_type,
            monthly_income,
            income_stability: IncomeStability::Variable,
            household_expenses,
            business_expenses: 0.0,
            existing_debts: 0.0,
            risk_exposure: Vec::new(),
            purpose,
        })
}

// Property: the extractor never panics, whatever the model replies
proptest! {
    #[test]
    fn extract_json_never_panics(raw in "\\PC*") {
        let _ = extract_json(&raw);
    }

    #[test]
    fn extract_json_round_trips_through_prose(
        object in prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9{} ]{0,12}", 0..6),
        prefix in "[^{}]{0,40}",
        suffix in "[^{}]{0,40}",
    ) {
        let value = serde_json::to_value(&object).unwrap();
        let wrapped = format!("{}{}{}", prefix, serde_json::to_string(&value).unwrap(), suffix);
        let extracted = extract_json(&wrapped).unwrap();
        prop_assert_eq!(extracted, value);
    }

    #[test]
    fn extract_json_fails_without_an_opening_brace(raw in "[^{]*") {
        prop_assert!(extract_json(&raw).is_err());
    }

    #[test]
    fn extract_json_fails_on_unclosed_object(
        prefix in "[^{}]{0,20}",
        body in "[^{}]{0,20}",
    ) {
        let input = format!("{}{{{}", prefix, body);
        prop_assert!(extract_json(&input).is_err());
    }
}

// Property: filter invariants hold for every valid profile
proptest! {
    #[test]
    fn every_filtered_scheme_accepts_the_income_type(profile in profile_strategy()) {
        let catalog = SchemeCatalog::new();
        for scheme in catalog.filter_by_profile(&profile) {
            prop_assert!(scheme.eligibility.income_types.contains(&profile.income_type));
        }
    }

    #[test]
    fn capital_purposes_only_yield_loans(
        income_type in income_type_strategy(),
        purpose in prop::sample::select(vec![
            Purpose::WorkingCapital,
            Purpose::BusinessExpansion,
        ]),
        monthly_income in 0.0..1_000_000.0f64,
    ) {
        let catalog = SchemeCatalog::new();
        let profile = Profile {
            income_type,
            monthly_income,
            income_stability: IncomeStability::Variable,
            household_expenses: 0.0,
            business_expenses: 0.0,
            existing_debts: 0.0,
            risk_exposure: Vec::new(),
            purpose,
        };
        for scheme in catalog.filter_by_profile(&profile) {
            prop_assert_eq!(scheme.category, SchemeCategory::Loan);
        }
    }

    #[test]
    fn seasonal_crop_cultivation_always_includes_pm_kisan(
        monthly_income in 0.0..1_000_000.0f64,
        household_expenses in 0.0..1_000_000.0f64,
    ) {
        let catalog = SchemeCatalog::new();
        let profile = Profile {
            income_type: IncomeType::Seasonal,
            monthly_income,
            income_stability: IncomeStability::HighlyVariable,
            household_expenses,
            business_expenses: 0.0,
            existing_debts: 0.0,
            risk_exposure: Vec::new(),
            purpose: Purpose::CropCultivation,
        };
        let result = catalog.filter_by_profile(&profile);
        prop_assert!(result.iter().any(|s| s.id == "pm_kisan"));
    }

    #[test]
    fn filtering_is_idempotent(profile in profile_strategy()) {
        let catalog = SchemeCatalog::new();
        let once = catalog.filter_by_profile(&profile);
        // Re-applying the predicate to an already-filtered set changes nothing
        let twice: Vec<_> = once
            .iter()
            .filter(|scheme| scheme_matches(scheme, &profile))
            .collect();
        prop_assert_eq!(once.len(), twice.len());
    }

    #[test]
    fn filtering_is_deterministic(profile in profile_strategy()) {
        let catalog = SchemeCatalog::new();
        let first: Vec<String> = catalog
            .filter_by_profile(&profile)
            .into_iter()
            .map(|s| s.id)
            .collect();
        let second: Vec<String> = catalog
            .filter_by_profile(&profile)
            .into_iter()
            .map(|s| s.id)
            .collect();
        prop_assert_eq!(first, second);
    }
}
