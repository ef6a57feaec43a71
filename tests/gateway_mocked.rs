/// Integration tests for the gateway client against a mocked backend.
/// Exercises every operation and the status-to-error mapping without
/// touching a real service.
use std::time::Duration;

use lead_console::gateway_client::LeadApiClient;
use lead_console::models::{LeadFilter, LeadStatus, NewLead, ScoreTier};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LeadApiClient {
    LeadApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn lead_json(id: &str, email: &str, score: f64) -> serde_json::Value {
    json!({
        "id": id,
        "email": email,
        "source": "website",
        "status": "new",
        "score": score,
        "score_tier": if score >= 80.0 { Some("hot") } else { None },
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn stats_decode_successfully() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/analytics/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_leads": 10,
            "hot_leads": 2,
            "warm_leads": 3,
            "cold_leads": 1,
            "average_score": 44.5,
            "enriched_leads": 5,
            "enrichment_rate": 0.5
        })))
        .mount(&mock_server)
        .await;

    let stats = client_for(&mock_server).get_stats().await.unwrap();
    assert_eq!(stats.total_leads, 10);
    assert!(stats.hot_leads + stats.warm_leads + stats.cold_leads <= stats.total_leads);
    assert!((0.0..=1.0).contains(&stats.enrichment_rate));
}

#[tokio::test]
async fn list_leads_forwards_only_present_filter_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .and(query_param("tier", "hot"))
        .and(query_param("minScore", "70"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([lead_json("l-1", "a@b.com", 91.0)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let filter = LeadFilter {
        tier: Some(ScoreTier::Hot),
        status: None,
        min_score: Some(70.0),
    };
    let leads = client_for(&mock_server).list_leads(&filter).await.unwrap();
    assert_eq!(leads.len(), 1);
    assert_eq!(leads[0].id, "l-1");
}

#[tokio::test]
async fn list_leads_preserves_backend_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            lead_json("l-3", "c@b.com", 10.0),
            lead_json("l-1", "a@b.com", 90.0),
            lead_json("l-2", "b@b.com", 50.0),
        ])))
        .mount(&mock_server)
        .await;

    let leads = client_for(&mock_server)
        .list_leads(&LeadFilter::default())
        .await
        .unwrap();
    let ids: Vec<&str> = leads.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["l-3", "l-1", "l-2"]);
}

#[tokio::test]
async fn get_lead_maps_404_to_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/leads/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("lead not found"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).get_lead("missing").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn create_lead_sends_payload_and_maps_422_to_validation_error() {
    let mock_server = MockServer::start().await;

    let new_lead = NewLead {
        email: "a@b.com".to_string(),
        company: Some("Acme".to_string()),
        ..Default::default()
    };

    Mock::given(method("POST"))
        .and(path("/api/leads"))
        .and(body_json(json!({ "email": "a@b.com", "company": "Acme" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(lead_json("l-9", "a@b.com", 0.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let lead = client_for(&mock_server).create_lead(&new_lead).await.unwrap();
    assert_eq!(lead.id, "l-9");
    assert_eq!(lead.score, 0.0);
    assert_eq!(lead.status, LeadStatus::New);

    // Backend-rejected payload surfaces as a validation error.
    let rejecting_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/leads"))
        .respond_with(ResponseTemplate::new(422).set_body_string("email already exists"))
        .mount(&rejecting_server)
        .await;

    let err = client_for(&rejecting_server)
        .create_lead(&new_lead)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert!(err.to_string().contains("email already exists"));
}

#[tokio::test]
async fn score_lead_returns_updated_entity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/leads/l-1/score"))
        .respond_with(ResponseTemplate::new(200).set_body_json(lead_json("l-1", "a@b.com", 88.0)))
        .mount(&mock_server)
        .await;

    let lead = client_for(&mock_server).score_lead("l-1").await.unwrap();
    assert_eq!(lead.score, 88.0);
    assert_eq!(lead.score_tier, Some(ScoreTier::Hot));
}

#[tokio::test]
async fn enrich_lead_passes_opaque_payload_through() {
    let mock_server = MockServer::start().await;

    let mut body = lead_json("l-1", "a@b.com", 0.0);
    body["enrichment_data"] = json!({ "employees": 120, "industry": "saas" });
    body["intent_signals"] = json!([{ "type": "pricing_page_visit" }]);
    body["intent_score"] = json!(0.7);

    Mock::given(method("POST"))
        .and(path("/api/leads/l-1/enrich"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let lead = client_for(&mock_server).enrich_lead("l-1").await.unwrap();
    assert_eq!(lead.enrichment_data["industry"], "saas");
    assert_eq!(lead.intent_signals.len(), 1);
    assert_eq!(lead.intent_score, 0.7);
}

#[tokio::test]
async fn server_errors_map_to_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/leads/l-1/score"))
        .respond_with(ResponseTemplate::new(500).set_body_string("scorer crashed"))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).score_lead("l-1").await.unwrap_err();
    assert_eq!(err.kind(), "server");
}

#[tokio::test]
async fn unreachable_backend_maps_to_network_error() {
    // Nothing listens on this port.
    let client = LeadApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    let err = client.get_stats().await.unwrap_err();
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn analytics_payload_is_opaque_passthrough() {
    let mock_server = MockServer::start().await;

    let payload = json!({
        "by_source": { "website": 4, "linkedin": 2 },
        "weekly": [1, 2, 3]
    });
    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&payload))
        .mount(&mock_server)
        .await;

    let analytics = client_for(&mock_server).get_analytics().await.unwrap();
    assert_eq!(analytics, payload);
}
