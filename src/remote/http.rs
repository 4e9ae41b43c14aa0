//! REST adapter for the hosted backend.
//!
//! Inserts are `POST /rest/v1/<table>` and the profile update is
//! `PATCH /rest/v1/profiles?id=eq.<user_id>`. Every request carries the project
//! key both as `apikey` and as a bearer token.

use super::service::RemoteDataService;
use crate::config::RemoteConfig;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const TABLE_CHECK_INS: &str = "check_ins";
pub const TABLE_LIKES: &str = "likes";
pub const TABLE_MESSAGES: &str = "messages";
pub const TABLE_PROFILES: &str = "profiles";

pub struct HttpRemoteService {
    base_url: String,
    api_key: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl HttpRemoteService {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            http_client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .timeout(self.timeout)
    }

    async fn insert(&self, table: &str, record: &serde_json::Value) -> Result<()> {
        let request = self.http_client.post(self.table_url(table)).json(record);
        let response = self.authorize(request).send().await?;
        check_status(table, response).await
    }
}

async fn check_status(table: &str, response: reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        tracing::debug!("Remote write to {} accepted ({})", table, status);
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(anyhow::anyhow!(
        "Remote write to {} rejected with status {}: {}",
        table,
        status,
        body
    ))
}

#[async_trait]
impl RemoteDataService for HttpRemoteService {
    async fn insert_check_in(&self, record: &serde_json::Value) -> Result<()> {
        self.insert(TABLE_CHECK_INS, record).await
    }

    async fn insert_like(&self, record: &serde_json::Value) -> Result<()> {
        self.insert(TABLE_LIKES, record).await
    }

    async fn insert_message(&self, record: &serde_json::Value) -> Result<()> {
        self.insert(TABLE_MESSAGES, record).await
    }

    async fn update_profile(&self, user_id: &str, fields: &serde_json::Value) -> Result<()> {
        let filter = format!("eq.{}", user_id);
        let request = self
            .http_client
            .patch(self.table_url(TABLE_PROFILES))
            .query(&[("id", filter.as_str())])
            .json(fields);
        let response = self.authorize(request).send().await?;
        check_status(TABLE_PROFILES, response).await
    }
}
