use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use crate::domain::repository::{
    EntitlementGateway, ReleaseTag, ReleaseTagGateway, RemoteCheckError, TagFetch,
};
use crate::infrastructure::config::SupportConfig;

fn build_http_client(config: &SupportConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// HttpEntitlementGateway はエンタープライズリポジトリへトークン付き GET を送る。
pub struct HttpEntitlementGateway {
    http_client: reqwest::Client,
}

impl HttpEntitlementGateway {
    pub fn new(config: &SupportConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl EntitlementGateway for HttpEntitlementGateway {
    async fn probe(&self, url: &str, token: &str) -> Result<u16, RemoteCheckError> {
        // トークンは "user:password" 形式のままエンコードする
        let authorization = format!("Basic {}", STANDARD.encode(token));
        let response = self
            .http_client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .send()
            .await
            .map_err(|e| RemoteCheckError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

/// HttpReleaseTagGateway はリリースタグ一覧 API を呼び出す。
pub struct HttpReleaseTagGateway {
    http_client: reqwest::Client,
    url: String,
    user_agent: String,
}

impl HttpReleaseTagGateway {
    pub fn new(config: &SupportConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: build_http_client(config)?,
            url: config.release_tags_url.clone(),
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl ReleaseTagGateway for HttpReleaseTagGateway {
    async fn fetch_tags(&self) -> Result<TagFetch, RemoteCheckError> {
        let response = self
            .http_client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| RemoteCheckError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Ok(TagFetch::Rejected(status));
        }

        // null 要素や name のない要素が混ざっていても読み飛ばせるよう緩く読む
        let entries: Vec<Value> = response
            .json()
            .await
            .map_err(|e| RemoteCheckError::Decode(e.to_string()))?;
        let tags = entries
            .into_iter()
            .filter(|entry| !entry.is_null())
            .filter_map(|entry| serde_json::from_value::<ReleaseTag>(entry).ok())
            .collect();
        Ok(TagFetch::Listed(tags))
    }
}
