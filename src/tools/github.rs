//! GitHub repository search

use async_trait::async_trait;
use serde::Deserialize;

use super::{ResourceSearchAdapter, ensure_success};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::resource::{Backend, BackendHits, Repository, ResourceItem};
use crate::utils::query::broadening_levels;
use crate::utils::retry::{RetryPolicy, retry_with_delay};
use crate::utils::text::truncate_chars;

const SEARCH_ENDPOINT: &str = "https://api.github.com/search/repositories";
const DESCRIPTION_CHARS: usize = 150;

#[async_trait]
pub trait RepositoryApi: Send + Sync {
    async fn search_repositories(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Repository>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<RawRepository>,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    full_name: String,
    html_url: String,
    #[serde(default)]
    stargazers_count: u64,
    description: Option<String>,
}

pub struct GitHubClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(http: reqwest::Client, token: Option<String>) -> Self {
        Self { http, token }
    }
}

#[async_trait]
impl RepositoryApi for GitHubClient {
    async fn search_repositories(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Repository>, SearchError> {
        let per_page = limit.to_string();
        let mut request = self
            .http
            .get(SEARCH_ENDPOINT)
            .header("Accept", "application/vnd.github.v3+json")
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let body = ensure_success(request.send().await?).await?.text().await?;
        parse_search_response(&body, limit)
    }
}

pub(crate) fn parse_search_response(
    body: &str,
    limit: usize,
) -> Result<Vec<Repository>, SearchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .take(limit)
        .map(|raw| Repository {
            name: raw.full_name,
            url: raw.html_url,
            stars: raw.stargazers_count,
            description: raw
                .description
                .filter(|d| !d.is_empty())
                .map(|d| truncate_chars(&d, DESCRIPTION_CHARS, "")),
        })
        .collect())
}

/// Repository search with three-level query broadening
pub struct GitHubAdapter<A = GitHubClient> {
    api: A,
    policy: RetryPolicy,
    max_results: usize,
}

impl<A: RepositoryApi> GitHubAdapter<A> {
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

    async fn search_level(&self, query: &str) -> Vec<Repository> {
        let result = retry_with_delay(self.policy, "GitHub search", || async move {
            let result = self.api.search_repositories(query, self.max_results).await;
            if let Err(e) = &result
                && e.is_rate_limited()
            {
                tracing::warn!(
                    backend = Backend::GitHub.key(),
                    query,
                    "GitHub API rate limit exceeded, consider setting GITHUB_TOKEN"
                );
            }
            result
        })
        .await;

        result.unwrap_or_else(|e| {
            tracing::warn!(backend = Backend::GitHub.key(), query, error = %e, "repository search exhausted");
            Vec::new()
        })
    }
}

#[async_trait]
impl<A: RepositoryApi> ResourceSearchAdapter for GitHubAdapter<A> {
    fn backend(&self) -> Backend {
        Backend::GitHub
    }

    async fn search_use_case(&self, query: &str) -> BackendHits {
        for (level, attempt) in broadening_levels(query).iter().enumerate() {
            if level > 0 {
                tracing::info!(backend = Backend::GitHub.key(), query = %attempt, "retrying with broader query");
            }

            let repositories = self.search_level(attempt).await;
            if !repositories.is_empty() {
                return BackendHits::GitHub(
                    repositories
                        .into_iter()
                        .take(self.max_results)
                        .map(ResourceItem::Real)
                        .collect(),
                );
            }
        }

        BackendHits::empty(Backend::GitHub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    enum Reply {
        Hits(usize),
        RateLimited,
    }

    struct FakeRepos {
        replies: Vec<(&'static str, Reply)>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRepos {
        fn new(replies: Vec<(&'static str, Reply)>) -> Self {
            Self {
                replies,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RepositoryApi for FakeRepos {
        async fn search_repositories(
            &self,
            query: &str,
            _limit: usize,
        ) -> Result<Vec<Repository>, SearchError> {
            self.calls.lock().unwrap().push(query.to_string());
            match self.replies.iter().find(|(q, _)| *q == query) {
                Some((_, Reply::Hits(n))) => Ok((0..*n)
                    .map(|i| Repository {
                        name: format!("owner/repo-{}", i),
                        url: format!("https://github.com/owner/repo-{}", i),
                        stars: 100 - i as u64,
                        description: None,
                    })
                    .collect()),
                Some((_, Reply::RateLimited)) => Err(SearchError::RateLimited { status: 403 }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn adapter(api: FakeRepos) -> GitHubAdapter<FakeRepos> {
        GitHubAdapter::new(api, &SearchConfig::default()).with_policy(RetryPolicy::immediate(2))
    }

    #[test]
    fn test_parse_search_response() {
        let long = "x".repeat(300);
        let body = format!(
            r#"{{"total_count": 2, "items": [
                {{"full_name": "a/b", "html_url": "https://github.com/a/b", "stargazers_count": 12, "description": "{}"}},
                {{"full_name": "c/d", "html_url": "https://github.com/c/d", "stargazers_count": 3, "description": null}}
            ]}}"#,
            long
        );
        let repos = parse_search_response(&body, 5).unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].stars, 12);
        assert_eq!(repos[0].description.as_ref().map(|d| d.len()), Some(150));
        assert_eq!(repos[1].description, None);
    }

    #[tokio::test]
    async fn test_zero_hits_broaden_to_two_word_prefix() {
        let adapter = adapter(FakeRepos::new(vec![("demand forecasting", Reply::Hits(2))]));
        let hits = adapter.search_use_case("demand forecasting xgboost retail").await;

        assert_eq!(hits.len(), 2);
        let calls = adapter.api.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec![
                "demand forecasting xgboost retail",
                "demand forecasting xgboost",
                "demand forecasting",
            ]
        );
        assert_eq!(calls.last().map(String::as_str), Some("demand forecasting"));
    }

    #[tokio::test]
    async fn test_rate_limited_every_level_gives_empty() {
        let adapter = adapter(FakeRepos::new(vec![
            ("fraud detection banking", Reply::RateLimited),
            ("fraud detection", Reply::RateLimited),
        ]));
        let hits = adapter.search_use_case("fraud detection banking").await;

        assert!(hits.is_empty());
        // two attempts per level, two levels
        assert_eq!(adapter.api.calls.lock().unwrap().len(), 4);
    }
}
