use crate::domain::model::{ListDetail, ListGroup};
use crate::domain::ports::VenueSource;
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.foursquare.com/v2";
pub const DEFAULT_API_VERSION: &str = "20190425";

/// Foursquare 回應的外層：`{ meta, response }`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(default, rename = "errorType")]
    error_type: Option<String>,
    #[serde(default, rename = "errorDetail")]
    error_detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserListsResponse {
    lists: ListGroups,
}

#[derive(Debug, Deserialize)]
struct ListGroups {
    #[serde(default)]
    groups: Vec<ListGroup>,
}

#[derive(Debug, Deserialize)]
struct ListDetailResponse {
    list: ListDetail,
}

/// Foursquare v2 API 用戶端，建立一次後注入 pipeline 重複使用
#[derive(Debug, Clone)]
pub struct FoursquareClient {
    client: Client,
    base_url: String,
    token: String,
    version: String,
}

impl FoursquareClient {
    pub fn new(base_url: &str, token: &str, version: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            version: version.to_string(),
        })
    }

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("oauth_token", self.token.as_str()),
                ("v", self.version.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ExportError::UpstreamError {
                status: status.as_u16(),
                message: error_message(&body, status.canonical_reason()),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.response)
    }
}

fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(detail) = envelope.meta.error_detail.or(envelope.meta.error_type) {
            return detail;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        reason.unwrap_or("unknown error").to_string()
    } else {
        body.chars().take(200).collect()
    }
}

#[async_trait]
impl VenueSource for FoursquareClient {
    async fn user_lists(&self) -> Result<Vec<ListGroup>> {
        let response: UserListsResponse = self.get("users/self/lists").await?;
        Ok(response.lists.groups)
    }

    async fn list_detail(&self, list_id: &str) -> Result<ListDetail> {
        let response: ListDetailResponse = self.get(&format!("lists/{}", list_id)).await?;
        Ok(response.list)
    }
}
