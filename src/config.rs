use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            api_base_url: std::env::var("LEAD_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string())
                .trim()
                .to_string(),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a positive number"))?,
        };

        if config.api_base_url.is_empty() {
            anyhow::bail!("LEAD_API_URL cannot be empty");
        }
        if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://")
        {
            anyhow::bail!("LEAD_API_URL must start with http:// or https://");
        }
        if config.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Lead API base URL: {}", config.api_base_url);
        tracing::debug!("Request timeout: {}s", config.request_timeout_secs);

        Ok(config)
    }
}
