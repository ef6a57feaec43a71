/// Property-based tests using proptest.
/// Tests invariants that should hold for all inputs.
use chrono::Utc;
use lead_console::models::{DashboardStats, Lead, LeadFilter, ScoreTier};
use lead_console::validation::is_valid_email;
use lead_console::views::LeadListView;
use proptest::prelude::*;
use serde_json::Value;

fn lead(email: &str, company: Option<String>) -> Lead {
    Lead {
        id: email.to_string(),
        email: email.to_string(),
        first_name: None,
        last_name: None,
        company,
        job_title: None,
        phone: None,
        website: None,
        linkedin_url: None,
        source: Default::default(),
        status: Default::default(),
        score: 0.0,
        score_breakdown: Default::default(),
        score_tier: None,
        enrichment_data: Value::Null,
        intent_signals: Vec::new(),
        intent_score: 0.0,
        tags: Vec::new(),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// Property: email validation should never panic
proptest! {
    #[test]
    fn email_validation_never_panics(email in "\\PC*") {
        let _ = is_valid_email(&email);
    }

    #[test]
    fn well_formed_emails_accepted(
        local in "[a-z][a-z0-9]{0,10}",
        domain in "[a-z][a-z0-9]{1,10}",
        tld in "[a-z]{2,4}"
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email), "rejected: {}", email);
    }
}

// Property: the client-side text filter is a pure, idempotent function of
// (fetched leads, search string)
proptest! {
    #[test]
    fn text_filter_never_panics(
        emails in prop::collection::vec("[a-zA-Z0-9@.]{0,20}", 0..10),
        search in "\\PC{0,15}"
    ) {
        let leads: Vec<Lead> = emails.iter().map(|e| lead(e, None)).collect();
        let mut view = LeadListView::new();
        view.set_search(search);
        let _ = view.visible(&leads);
    }

    #[test]
    fn text_filter_is_idempotent(
        emails in prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 0..12),
        companies in prop::collection::vec(prop::option::of("[A-Za-z ]{0,12}"), 0..12),
        search in "[a-zA-Z]{0,6}"
    ) {
        let leads: Vec<Lead> = emails
            .iter()
            .zip(companies.into_iter().chain(std::iter::repeat(None)))
            .map(|(email, company)| lead(email, company))
            .collect();

        let mut view = LeadListView::new();
        view.set_search(search);

        let once: Vec<String> = view.visible(&leads).iter().map(|l| l.id.clone()).collect();
        let survivors: Vec<Lead> = view.visible(&leads).into_iter().cloned().collect();
        let twice: Vec<String> = view.visible(&survivors).iter().map(|l| l.id.clone()).collect();

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn text_filter_only_keeps_matching_leads(
        emails in prop::collection::vec("[a-z]{1,8}@[a-z]{1,8}\\.com", 0..12),
        search in "[a-z]{1,6}"
    ) {
        let leads: Vec<Lead> = emails.iter().map(|e| lead(e, None)).collect();
        let mut view = LeadListView::new();
        view.set_search(search.clone());

        for kept in view.visible(&leads) {
            prop_assert!(kept.email.to_lowercase().contains(&search.to_lowercase()));
        }
    }
}

// Property: filter cache keys are stable and injective over the tier axis
proptest! {
    #[test]
    fn filter_cache_key_is_deterministic(min_score in prop::option::of(0.0f64..100.0)) {
        let filter = LeadFilter { tier: Some(ScoreTier::Warm), status: None, min_score };
        prop_assert_eq!(filter.cache_key(), filter.clone().cache_key());
    }

    #[test]
    fn filter_param_count_matches_present_fields(
        has_tier in any::<bool>(),
        min_score in prop::option::of(0.0f64..100.0)
    ) {
        let filter = LeadFilter {
            tier: if has_tier { Some(ScoreTier::Cold) } else { None },
            status: None,
            min_score,
        };
        let expected = usize::from(has_tier) + usize::from(min_score.is_some());
        prop_assert_eq!(filter.query_params().len(), expected);
    }
}

// Property: tier distribution never reports zero-count tiers and never
// exceeds the per-tier inputs
proptest! {
    #[test]
    fn tier_distribution_excludes_zeros_and_preserves_counts(
        hot in 0u64..1000,
        warm in 0u64..1000,
        cold in 0u64..1000
    ) {
        let stats = DashboardStats {
            total_leads: hot + warm + cold,
            hot_leads: hot,
            warm_leads: warm,
            cold_leads: cold,
            ..Default::default()
        };
        let distribution = stats.tier_distribution();

        prop_assert!(distribution.iter().all(|(_, count)| *count > 0));
        let sum: u64 = distribution.iter().map(|(_, count)| count).sum();
        prop_assert_eq!(sum, hot + warm + cold);
    }
}
