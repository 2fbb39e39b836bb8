//! NewsAPI article provider

use crate::{
    constants::{NEWS_API_URL, NEWS_EVERYTHING_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
    provider::NewsProvider,
    types::NewsArticle,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// `/v2/everything` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsArticle>,
}

/// Turns a NewsAPI body into articles
///
/// NewsAPI reports some failures as `{"status":"error"}` bodies.
fn parse_everything(body: &str) -> Result<Vec<NewsArticle>, FetchError> {
    let response: EverythingResponse = serde_json::from_str(body).map_err(|e| {
        FetchError::invalid_response(format!("Failed to parse NewsAPI response: {}", e))
    })?;

    if response.status != "ok" {
        return Err(FetchError::invalid_response(
            response
                .message
                .unwrap_or_else(|| format!("NewsAPI status: {}", response.status)),
        ));
    }

    Ok(response.articles)
}

/// NewsAPI provider
pub struct NewsApiProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiProvider {
    /// Creates a provider against the public API
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base_url(NEWS_API_URL, api_key)
    }

    /// Creates a provider against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::config("NEWS_API_KEY is not set"));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, NEWS_EVERYTHING_ENDPOINT)
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn fetch_articles(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<NewsArticle>, FetchError> {
        let url = self.endpoint();
        tracing::debug!(url = %url, query = query, page_size = page_size, "Fetching news");

        let page_size = page_size.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("pageSize", page_size.as_str())])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status, body));
        }

        let body = response.text().await?;
        parse_everything(&body)
    }

    fn provider_name(&self) -> &'static str {
        "newsapi"
    }
}
