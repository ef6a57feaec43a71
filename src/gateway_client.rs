use crate::errors::AppError;
use crate::models::{DashboardStats, Lead, LeadFilter, NewLead};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// Typed client for the lead-scoring backend REST API.
///
/// One method per backend capability. The client performs no retries and no
/// caching; a failed call has no side effects beyond the request itself, and
/// every failure is surfaced to the caller as an `AppError`.
#[derive(Clone)]
pub struct LeadApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl LeadApiClient {
    /// Creates a new `LeadApiClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the backend, without a trailing slash.
    /// * `timeout` - Per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetches aggregate dashboard statistics.
    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        let url = format!("{}/api/analytics/stats", self.base_url);
        tracing::info!("Fetching dashboard stats: {}", url);

        let response = self.client.get(&url).send().await?;
        Self::decode(response, "stats").await
    }

    /// Lists leads matching the server-side filter.
    ///
    /// Only present filter fields are sent as query parameters. The response
    /// order is preserved exactly as the backend returned it; the client
    /// never reorders or dedupes.
    pub async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let params = filter.query_params();
        let url = reqwest::Url::parse_with_params(
            &format!("{}/api/leads", self.base_url),
            params.iter().map(|(k, v)| (*k, v.as_str())),
        )
        .map_err(|e| AppError::InternalError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Listing leads: {}", url);

        let response = self.client.get(url).send().await?;
        Self::decode(response, "lead list").await
    }

    /// Fetches a single lead by id. Fails with `NotFound` when the backend
    /// does not know the id.
    pub async fn get_lead(&self, id: &str) -> Result<Lead, AppError> {
        let url = format!("{}/api/leads/{}", self.base_url, id);
        tracing::info!("Fetching lead {}: {}", id, url);

        let response = self.client.get(&url).send().await?;
        Self::decode(response, &format!("lead {}", id)).await
    }

    /// Creates a new lead. The backend returns the authoritative record with
    /// defaulted status and an unset score.
    pub async fn create_lead(&self, new_lead: &NewLead) -> Result<Lead, AppError> {
        let url = format!("{}/api/leads", self.base_url);
        tracing::info!("Creating lead {}: {}", new_lead.email, url);

        let response = self.client.post(&url).json(new_lead).send().await?;
        Self::decode(response, "lead creation").await
    }

    /// Triggers backend scoring for a lead and returns the updated record.
    pub async fn score_lead(&self, id: &str) -> Result<Lead, AppError> {
        let url = format!("{}/api/leads/{}/score", self.base_url, id);
        tracing::info!("Scoring lead {}: {}", id, url);

        let response = self.client.post(&url).send().await?;
        Self::decode(response, &format!("scoring lead {}", id)).await
    }

    /// Triggers backend enrichment for a lead and returns the updated record.
    pub async fn enrich_lead(&self, id: &str) -> Result<Lead, AppError> {
        let url = format!("{}/api/leads/{}/enrich", self.base_url, id);
        tracing::info!("Enriching lead {}: {}", id, url);

        let response = self.client.post(&url).send().await?;
        Self::decode(response, &format!("enriching lead {}", id)).await
    }

    /// Fetches the raw analytics payload. The shape is backend-owned, so it
    /// is passed through as opaque JSON.
    pub async fn get_analytics(&self) -> Result<Value, AppError> {
        let url = format!("{}/api/analytics", self.base_url);
        tracing::info!("Fetching analytics: {}", url);

        let response = self.client.get(&url).send().await?;
        Self::decode(response, "analytics").await
    }

    /// Checks the status and decodes the JSON body.
    ///
    /// Status mapping: 404 is `NotFound`, 400/422 is `ValidationError`,
    /// everything else non-success is `ServerError`. Transport failures are
    /// converted to `NetworkError` by the `From<reqwest::Error>` impl before
    /// this point.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T, AppError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("Backend returned {} for {}: {}", status, what, body);
            return Err(match status {
                StatusCode::NOT_FOUND => AppError::NotFound(format!("{}: {}", what, body)),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    AppError::ValidationError(format!("{}: {}", what, body))
                }
                _ => AppError::ServerError(format!("{} returned {}: {}", what, status, body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ServerError(format!("Failed to parse {} response: {}", what, e)))
    }
}
