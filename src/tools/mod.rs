//! External collaborators: web search, news, and the four resource catalogs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, SearchConfig};
use crate::error::SearchError;
use crate::types::resource::{Backend, BackendHits};
use crate::utils::text::truncate_chars;

pub mod arxiv;
pub mod github;
pub mod huggingface;
pub mod kaggle;
pub mod news;
pub mod web_search;

/// One organic web search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebHit {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn text_search(&self, query: &str) -> Result<Vec<WebHit>, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub published_at: String,
}

/// Dedicated news capability. Empty when unconfigured or on any failure.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn company_news(&self, company: &str) -> Vec<NewsArticle>;
}

/// An isolated search unit for one catalog.
///
/// Implementations own their retry and broadening policy and never fail:
/// upstream errors degrade to an empty or placeholder result.
#[async_trait]
pub trait ResourceSearchAdapter: Send + Sync {
    fn backend(&self) -> Backend;

    async fn search_use_case(&self, query: &str) -> BackendHits;
}

/// Shared HTTP client for every upstream call
pub fn http_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Maps non-success statuses onto [`SearchError`]
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, SearchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SearchError::RateLimited {
            status: status.as_u16(),
        });
    }
    let body = response.text().await.unwrap_or_default();
    Err(SearchError::Api {
        status: status.as_u16(),
        message: truncate_chars(body.trim(), 200, "..."),
    })
}

/// The real collaborators wired against their public endpoints
pub struct Collaborators {
    pub web: Arc<dyn WebSearch>,
    pub news: Arc<dyn NewsSource>,
    pub adapters: Vec<Arc<dyn ResourceSearchAdapter>>,
}

impl Collaborators {
    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        let http = http_client(&config.search)?;
        let search = &config.search;

        let adapters: Vec<Arc<dyn ResourceSearchAdapter>> = vec![
            Arc::new(arxiv::ArxivAdapter::new(
                arxiv::ArxivClient::new(http.clone()),
                search,
            )),
            Arc::new(huggingface::HuggingFaceAdapter::new(
                huggingface::HuggingFaceClient::new(http.clone()),
                search,
            )),
            Arc::new(kaggle::KaggleAdapter::new(
                kaggle::KaggleClient::new(http.clone()),
                search,
            )),
            Arc::new(github::GitHubAdapter::new(
                github::GitHubClient::new(http.clone(), search.github_token.clone()),
                search,
            )),
        ];

        Ok(Self {
            web: Arc::new(web_search::DuckDuckGoSearch::new(http.clone(), search)),
            news: Arc::new(news::NewsApiSource::new(http, &config.news)),
            adapters,
        })
    }
}
