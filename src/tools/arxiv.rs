//! arXiv paper search over the Atom export API

use async_trait::async_trait;

use super::{ResourceSearchAdapter, ensure_success};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::resource::{Backend, BackendHits, Paper, ResourceItem};
use crate::utils::retry::{RetryPolicy, retry_with_delay};
use crate::utils::text::{squash_whitespace, truncate_chars};

const QUERY_ENDPOINT: &str = "https://export.arxiv.org/api/query";
const SUMMARY_CHARS: usize = 200;

#[async_trait]
pub trait PaperApi: Send + Sync {
    async fn search_papers(&self, query: &str, limit: usize) -> Result<Vec<Paper>, SearchError>;
}

pub struct ArxivClient {
    http: reqwest::Client,
}

impl ArxivClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl PaperApi for ArxivClient {
    async fn search_papers(&self, query: &str, limit: usize) -> Result<Vec<Paper>, SearchError> {
        let search_query = format!("all:{}", query);
        let limit = limit.to_string();
        let response = self
            .http
            .get(QUERY_ENDPOINT)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", limit.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        parse_feed(&bytes)
    }
}

/// Turns an Atom response into papers, skipping entries without a title
pub(crate) fn parse_feed(bytes: &[u8]) -> Result<Vec<Paper>, SearchError> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| SearchError::Parse(e.to_string()))?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = squash_whitespace(&entry.title?.content);
            if title.is_empty() {
                return None;
            }
            let url = if entry.id.starts_with("http") {
                entry.id.clone()
            } else {
                entry.links.first().map(|l| l.href.clone())?
            };
            let summary = entry
                .summary
                .map(|s| truncate_chars(&squash_whitespace(&s.content), SUMMARY_CHARS, "..."));
            Some(Paper {
                title,
                url,
                summary,
            })
        })
        .collect())
}

/// Paper search: fixed-delay retries, the query is used as given
pub struct ArxivAdapter<A = ArxivClient> {
    api: A,
    policy: RetryPolicy,
    max_results: usize,
}

impl<A: PaperApi> ArxivAdapter<A> {
    pub fn new(api: A, config: &SearchConfig) -> Self {
        Self {
            api,
            policy: RetryPolicy::from_search_config(config),
            max_results: config.max_results,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl<A: PaperApi> ResourceSearchAdapter for ArxivAdapter<A> {
    fn backend(&self) -> Backend {
        Backend::Arxiv
    }

    async fn search_use_case(&self, query: &str) -> BackendHits {
        let result = retry_with_delay(self.policy, "arXiv search", || {
            self.api.search_papers(query, self.max_results)
        })
        .await;

        match result {
            Ok(papers) => BackendHits::Arxiv(
                papers
                    .into_iter()
                    .take(self.max_results)
                    .map(ResourceItem::Real)
                    .collect(),
            ),
            Err(e) => {
                tracing::warn!(backend = Backend::Arxiv.key(), query, error = %e, "giving up on paper search");
                BackendHits::empty(Backend::Arxiv)
            }
        }
    }
}
