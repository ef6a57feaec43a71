//! Presentational view models for the console front end.
//!
//! Everything in this module is pure: views consume `QueryState` snapshots
//! and domain values and produce renderable data. The only local state they
//! hold is UI state (search text, tier filter, form drafts); all shared
//! truth lives in the query store.

use crate::models::{DashboardStats, Lead, LeadFilter, LeadSource, NewLead, ScoreTier};
use crate::query_store::{MutationOutcome, QueryState, QueryStore};
use crate::validation::is_valid_email;

// ============ Lead list ============

/// Local state for the lead list screen: a server-side tier filter and a
/// client-only text filter.
///
/// Changing the tier changes the query identity (a new list query is
/// issued); changing the search text never does — it only narrows what is
/// displayed from the already-fetched set.
#[derive(Debug, Default)]
pub struct LeadListView {
    search: String,
    tier: Option<ScoreTier>,
}

/// What the list screen should render for the current query state.
#[derive(Debug)]
pub enum ListRender<'a> {
    /// Fetch in flight with nothing to show yet.
    Loading,
    /// Leads to display, already narrowed by the client-side filter.
    Leads(Vec<&'a Lead>),
    /// The fetch succeeded but nothing matches.
    Empty,
    /// The fetch failed. `visible` carries the last known (filtered) leads
    /// so the screen can keep showing them alongside the message.
    Error {
        message: String,
        visible: Vec<&'a Lead>,
    },
}

impl LeadListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn tier(&self) -> Option<ScoreTier> {
        self.tier
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Sets the server-side tier filter. Returns true when the tier changed,
    /// i.e. when the next read targets a new query identity.
    pub fn set_tier(&mut self, tier: Option<ScoreTier>) -> bool {
        let changed = self.tier != tier;
        self.tier = tier;
        changed
    }

    /// The server-side filter for the current tier selection.
    pub fn filter(&self) -> LeadFilter {
        LeadFilter {
            tier: self.tier,
            ..Default::default()
        }
    }

    /// Applies the client-only substring filter over email and company,
    /// case-insensitively. Pure and idempotent; never hits the network.
    pub fn visible<'a>(&self, leads: &'a [Lead]) -> Vec<&'a Lead> {
        if self.search.is_empty() {
            return leads.iter().collect();
        }
        let needle = self.search.to_lowercase();
        leads
            .iter()
            .filter(|lead| {
                lead.email.to_lowercase().contains(&needle)
                    || lead
                        .company
                        .as_ref()
                        .map(|c| c.to_lowercase().contains(&needle))
                        .unwrap_or(false)
            })
            .collect()
    }

    /// Projects the list query state into a render decision.
    pub fn render<'a>(&self, state: &'a QueryState<Vec<Lead>>) -> ListRender<'a> {
        match state {
            QueryState::Absent | QueryState::Pending { prior: None } => ListRender::Loading,
            QueryState::Pending { prior: Some(prior) } => {
                let visible = self.visible(prior);
                if visible.is_empty() {
                    ListRender::Empty
                } else {
                    ListRender::Leads(visible)
                }
            }
            QueryState::Fresh { value } => {
                let visible = self.visible(value);
                if visible.is_empty() {
                    ListRender::Empty
                } else {
                    ListRender::Leads(visible)
                }
            }
            QueryState::Errored { error, prior } => ListRender::Error {
                message: error.clone(),
                visible: prior.as_deref().map(|p| self.visible(p)).unwrap_or_default(),
            },
        }
    }
}

// ============ Lead card ============

/// Renderable projection of one lead row.
#[derive(Debug, Clone)]
pub struct LeadCard {
    pub title: String,
    /// Tier badge text; suppressed until the lead has been scored.
    pub tier_badge: Option<&'static str>,
    /// "Score: N" label; suppressed while the score is zero.
    pub score_label: Option<String>,
    pub contact_line: String,
    /// Reasoning snippet from the score breakdown, when present.
    pub reasoning: Option<String>,
    /// The Score action is disabled while its own mutation is pending.
    pub score_disabled: bool,
    /// The Enrich action is disabled while its own mutation is pending.
    pub enrich_disabled: bool,
}

/// Pure render of one lead plus its two action triggers.
pub fn lead_card(lead: &Lead, scoring: bool, enriching: bool) -> LeadCard {
    let mut contact_parts = vec![lead.email.clone()];
    if let Some(company) = &lead.company {
        contact_parts.push(company.clone());
    }
    if let Some(job_title) = &lead.job_title {
        contact_parts.push(job_title.clone());
    }

    LeadCard {
        title: lead.display_name(),
        tier_badge: if lead.is_scored() {
            lead.score_tier.map(|t| t.as_str())
        } else {
            None
        },
        score_label: if lead.is_scored() {
            Some(format!("Score: {}", lead.score.round() as i64))
        } else {
            None
        },
        contact_line: contact_parts.join(" | "),
        reasoning: lead.score_breakdown.reasoning.clone(),
        score_disabled: scoring,
        enrich_disabled: enriching,
    }
}

// ============ Creation form ============

/// Draft state for the new-lead form.
///
/// The draft survives a failed submission so nothing the user typed is
/// lost; the form closes itself only on success.
#[derive(Debug, Default)]
pub struct LeadForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    pub source: Option<LeadSource>,
    /// Last submission error, surfaced next to the form.
    pub error: Option<String>,
    open: bool,
}

/// Outcome of a form submission, from the screen's point of view.
#[derive(Debug)]
pub enum FormSubmit {
    /// The lead was created; the form has reset and closed itself.
    Created(Lead),
    /// The submission did not go through; the draft is intact and
    /// `LeadForm::error` explains why.
    Rejected,
}

impl LeadForm {
    pub fn open() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    fn optional(field: &str) -> Option<String> {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Builds the creation payload. Email is the only required field and
    /// must be well-formed; everything else is optional.
    pub fn draft(&self) -> Result<NewLead, String> {
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(format!("'{}' is not a valid email address", email));
        }
        Ok(NewLead {
            email: email.to_string(),
            first_name: Self::optional(&self.first_name),
            last_name: Self::optional(&self.last_name),
            company: Self::optional(&self.company),
            job_title: Self::optional(&self.job_title),
            source: self.source,
        })
    }

    /// Submits the draft through the store's create mutation.
    pub async fn submit(&mut self, store: &QueryStore) -> FormSubmit {
        let new_lead = match self.draft() {
            Ok(new_lead) => new_lead,
            Err(message) => {
                self.error = Some(message);
                return FormSubmit::Rejected;
            }
        };

        match store.create_lead(&new_lead).await {
            Ok(MutationOutcome::Completed(lead)) => {
                *self = Self::default();
                FormSubmit::Created(lead)
            }
            Ok(MutationOutcome::AlreadyPending) => {
                self.error = Some("A submission for this email is already in progress".to_string());
                FormSubmit::Rejected
            }
            Err(e) => {
                self.error = Some(e.to_string());
                FormSubmit::Rejected
            }
        }
    }
}

// ============ Dashboard ============

/// Renderable projection of the dashboard screen.
#[derive(Debug)]
pub struct DashboardRender {
    pub total_leads: String,
    pub hot_leads: String,
    pub warm_leads: String,
    pub cold_leads: String,
    pub average_score: String,
    pub enriched_leads: String,
    pub enrichment_rate: String,
    /// Non-zero tier counts for the distribution chart.
    pub distribution: Vec<(&'static str, u64)>,
    /// Shown in place of the chart when no lead has been scored yet.
    pub distribution_placeholder: Option<&'static str>,
    pub error: Option<String>,
}

const LOADING: &str = "...";

/// Pure render of the stats query state. Stats still loading (and never
/// fetched before) render as placeholders.
pub fn dashboard(state: &QueryState<DashboardStats>) -> DashboardRender {
    let stats = state.visible_value();
    let error = state.error().map(|e| e.to_string());

    match stats {
        Some(stats) => {
            let distribution = stats.tier_distribution();
            let distribution_placeholder = if distribution.is_empty() {
                Some("No leads scored yet")
            } else {
                None
            };
            DashboardRender {
                total_leads: stats.total_leads.to_string(),
                hot_leads: stats.hot_leads.to_string(),
                warm_leads: stats.warm_leads.to_string(),
                cold_leads: stats.cold_leads.to_string(),
                average_score: format!("{:.1}", stats.average_score),
                enriched_leads: stats.enriched_leads.to_string(),
                enrichment_rate: format!("{:.0}%", stats.enrichment_rate * 100.0),
                distribution,
                distribution_placeholder,
                error,
            }
        }
        None => DashboardRender {
            total_leads: LOADING.to_string(),
            hot_leads: LOADING.to_string(),
            warm_leads: LOADING.to_string(),
            cold_leads: LOADING.to_string(),
            average_score: LOADING.to_string(),
            enriched_leads: LOADING.to_string(),
            enrichment_rate: LOADING.to_string(),
            distribution: Vec::new(),
            distribution_placeholder: None,
            error,
        },
    }
}
