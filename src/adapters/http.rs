use crate::config::TrendConfig;
use crate::domain::model::TrendSource;
use crate::utils::error::{TrendError, Result};
use reqwest::Client;
use std::time::Duration;

/// 三個 adapter 共用的 HTTP 傳輸層：單次請求、無重試、每次呼叫都有逾時
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| TrendError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &TrendConfig) -> Result<Self> {
        Self::new(config.user_agent(), config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET 並取回 body；連線/逾時歸為 Transport，非 2xx 歸為 UpstreamStatus
    pub async fn get_text(
        &self,
        feed: TrendSource,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<String> {
        tracing::debug!("Requesting {} feed: {}", feed, endpoint);

        let response = self
            .client
            .get(endpoint)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| TrendError::Transport { feed, source })?;

        let status = response.status();
        tracing::debug!("{} response status: {}", feed, status);

        if !status.is_success() {
            return Err(TrendError::UpstreamStatus {
                feed,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| TrendError::Transport { feed, source })
    }
}
