use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::SlotSource;
use crate::config::Config;
use crate::constants::MOCK_SLOTS_PATH;
use crate::error::{Result, SyncError};

/// Envelope the scheduling system wraps its records in
#[derive(Debug, Deserialize)]
struct UpstreamEnvelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Calls the scheduling system over HTTP with Basic auth
pub struct HttpPmsClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl HttpPmsClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.upstream_base_url(),
            username: config.mock_api.username.clone(),
            password: config.mock_api.password.clone(),
        })
    }

    pub fn slots_url(&self) -> String {
        format!("{}{}", self.base_url, MOCK_SLOTS_PATH)
    }
}

#[async_trait::async_trait]
impl SlotSource for HttpPmsClient {
    fn source_name(&self) -> &'static str {
        "http_pms"
    }

    #[instrument(skip(self), fields(url = %self.slots_url()))]
    async fn fetch_records(&self) -> Result<Vec<Value>> {
        info!("Making authenticated request to mock API");

        let response = self
            .client
            .get(self.slots_url())
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::upstream(format!("Mock API responded with {}", status)));
        }

        let envelope: UpstreamEnvelope = response.json().await?;
        if !envelope.success {
            return Err(SyncError::upstream(format!(
                "Mock API error: {}",
                envelope.message.unwrap_or_default()
            )));
        }

        match envelope.data {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(SyncError::upstream("Mock API returned no records array")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_url_defaults_to_own_port() {
        let mut config = Config::default();
        config.server.port = 4321;
        let client = HttpPmsClient::from_config(&config).unwrap();
        assert_eq!(client.slots_url(), "http://127.0.0.1:4321/mock-external-api/slots");
    }

    #[test]
    fn test_slots_url_uses_configured_base() {
        let mut config = Config::default();
        config.upstream.base_url = Some("https://pms.example.com/".to_string());
        let client = HttpPmsClient::from_config(&config).unwrap();
        assert_eq!(client.slots_url(), "https://pms.example.com/mock-external-api/slots");
    }
}
