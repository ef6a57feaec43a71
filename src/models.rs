use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============ Domain Models ============

/// Coarse scoring bucket assigned by the backend.
///
/// Tier thresholds live in the backend; this layer only displays the label.
/// Unknown labels from the backend deserialize to `Unscored` rather than
/// failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Hot,
    Warm,
    Cold,
    #[serde(other)]
    Unscored,
}

impl ScoreTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Hot => "hot",
            ScoreTier::Warm => "warm",
            ScoreTier::Cold => "cold",
            ScoreTier::Unscored => "unscored",
        }
    }
}

/// Lifecycle status of a lead, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Proposal => "proposal",
            LeadStatus::Negotiation => "negotiation",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }
}

/// Provenance of a lead record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Website,
    Referral,
    Linkedin,
    ColdOutreach,
    Event,
    Advertising,
    Other,
}

impl Default for LeadSource {
    fn default() -> Self {
        LeadSource::Website
    }
}

impl LeadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadSource::Website => "website",
            LeadSource::Referral => "referral",
            LeadSource::Linkedin => "linkedin",
            LeadSource::ColdOutreach => "cold_outreach",
            LeadSource::Event => "event",
            LeadSource::Advertising => "advertising",
            LeadSource::Other => "other",
        }
    }

    /// All sources selectable in the creation form, in display order.
    pub fn all() -> &'static [LeadSource] {
        &[
            LeadSource::Website,
            LeadSource::Referral,
            LeadSource::Linkedin,
            LeadSource::ColdOutreach,
            LeadSource::Event,
            LeadSource::Advertising,
            LeadSource::Other,
        ]
    }
}

/// Structured sub-scores plus free-text reasoning produced by the scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Company-fit sub-score.
    pub firmographic: Option<f64>,
    /// Behavioral sub-score.
    pub behavioral: Option<f64>,
    /// Engagement sub-score.
    pub engagement: Option<f64>,
    /// Overall fit sub-score.
    pub fit: Option<f64>,
    /// Free-text reasoning from the scorer.
    pub reasoning: Option<String>,
    /// Recommended next actions.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// A prospective customer record tracked through scoring and enrichment.
///
/// The backend owns every lead; this layer holds transient copies that are
/// invalidated on demand. Scoring and enrichment fields default so that a
/// freshly created, never-scored lead deserializes cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Backend-assigned identifier (opaque string).
    pub id: String,
    /// Contact email. The only required contact field.
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub linkedin_url: Option<String>,
    /// Where the lead came from.
    #[serde(default)]
    pub source: LeadSource,
    /// Lifecycle status.
    #[serde(default)]
    pub status: LeadStatus,
    /// Overall score. Zero means "not yet scored", not a zero score.
    #[serde(default)]
    pub score: f64,
    /// Sub-scores and reasoning from the last scoring run.
    #[serde(default)]
    pub score_breakdown: ScoreBreakdown,
    /// Tier derived from the score by the backend. Only meaningful once
    /// `score > 0`.
    pub score_tier: Option<ScoreTier>,
    /// Opaque enrichment payload, passed through for rendering only.
    #[serde(default)]
    pub enrichment_data: Value,
    /// Opaque, ordered intent signal records.
    #[serde(default)]
    pub intent_signals: Vec<Value>,
    /// Intent score derived from the signals.
    #[serde(default)]
    pub intent_score: f64,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Whether the backend has scored this lead. Absence of a score means
    /// "not yet scored", so the tier badge is suppressed until then.
    pub fn is_scored(&self) -> bool {
        self.score > 0.0
    }

    /// Display name: first/last name when present, otherwise the email.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Creation payload for a new lead. The authoritative record comes back from
/// the backend; email is the only client-enforced required field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewLead {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<LeadSource>,
}

/// Server-side filter for lead list queries.
///
/// The filter participates in query identity: two filters with the same
/// canonical key share one cache entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    pub tier: Option<ScoreTier>,
    pub status: Option<LeadStatus>,
    pub min_score: Option<f64>,
}

impl LeadFilter {
    /// Canonical cache key. Stable across field-set permutations because the
    /// segments are emitted in a fixed order.
    pub fn cache_key(&self) -> String {
        format!(
            "tier={};status={};min_score={}",
            self.tier.map(|t| t.as_str()).unwrap_or(""),
            self.status.map(|s| s.as_str()).unwrap_or(""),
            self.min_score.map(|s| s.to_string()).unwrap_or_default(),
        )
    }

    /// Query parameters to send to the backend. Only present fields are
    /// emitted; the backend treats missing parameters as "no constraint".
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(tier) = self.tier {
            params.push(("tier", tier.as_str().to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(min_score) = self.min_score {
            params.push(("minScore", min_score.to_string()));
        }
        params
    }
}

/// Aggregate dashboard statistics computed by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_leads: u64,
    pub hot_leads: u64,
    pub warm_leads: u64,
    pub cold_leads: u64,
    pub average_score: f64,
    pub enriched_leads: u64,
    /// `enriched_leads / total_leads`, or 0 when there are no leads.
    pub enrichment_rate: f64,
}

impl DashboardStats {
    /// Tier distribution for the pie chart, excluding zero-count tiers.
    pub fn tier_distribution(&self) -> Vec<(&'static str, u64)> {
        [
            ("Hot", self.hot_leads),
            ("Warm", self.warm_leads),
            ("Cold", self.cold_leads),
        ]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lead_deserializes_with_minimal_fields() {
        let lead: Lead = serde_json::from_value(json!({
            "id": "l-1",
            "email": "a@b.com",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(lead.score, 0.0);
        assert!(!lead.is_scored());
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.source, LeadSource::Website);
        assert!(lead.score_tier.is_none());
        assert!(lead.intent_signals.is_empty());
        assert_eq!(lead.display_name(), "a@b.com");
    }

    #[test]
    fn unknown_tier_falls_back_to_unscored() {
        let tier: ScoreTier = serde_json::from_value(json!("volcanic")).unwrap();
        assert_eq!(tier, ScoreTier::Unscored);
    }

    #[test]
    fn filter_cache_key_is_canonical() {
        let a = LeadFilter {
            tier: Some(ScoreTier::Hot),
            ..Default::default()
        };
        let b = LeadFilter {
            tier: Some(ScoreTier::Hot),
            status: None,
            min_score: None,
        };
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), LeadFilter::default().cache_key());
    }

    #[test]
    fn filter_emits_only_present_params() {
        let filter = LeadFilter {
            tier: Some(ScoreTier::Warm),
            status: None,
            min_score: Some(40.0),
        };
        let params = filter.query_params();
        assert_eq!(params.len(), 2);
        assert!(params.contains(&("tier", "warm".to_string())));
        assert!(params.contains(&("minScore", "40".to_string())));
    }

    #[test]
    fn tier_distribution_skips_zero_counts() {
        let stats = DashboardStats {
            total_leads: 5,
            hot_leads: 3,
            warm_leads: 0,
            cold_leads: 2,
            ..Default::default()
        };
        assert_eq!(stats.tier_distribution(), vec![("Hot", 3), ("Cold", 2)]);
    }

    #[test]
    fn new_lead_omits_absent_fields() {
        let payload = serde_json::to_value(NewLead {
            email: "a@b.com".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(payload, json!({ "email": "a@b.com" }));
    }
}
