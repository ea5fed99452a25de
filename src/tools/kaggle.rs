//! Kaggle dataset and notebook search, scraped from the public search page

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::LazyLock;

use super::{ResourceSearchAdapter, ensure_success};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::resource::{Backend, BackendHits, KaggleEntry, ResourceItem};
use crate::utils::query::broadening_levels;
use crate::utils::retry::{RetryPolicy, retry_with_delay};

const SITE_ROOT: &str = "https://www.kaggle.com";
const MIN_TITLE_CHARS: usize = 5;

static ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\b[^>]*?href="([^"]+)"[^>]*>(.*?)</a>"#).expect("valid anchor pattern")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid html tag pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KaggleKind {
    Dataset,
    Notebook,
}

impl KaggleKind {
    fn matches(self, href: &str) -> bool {
        match self {
            KaggleKind::Dataset => href.contains("/datasets/"),
            KaggleKind::Notebook => href.contains("/code/") || href.contains("/notebooks/"),
        }
    }
}

impl Display for KaggleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KaggleKind::Dataset => write!(f, "datasets"),
            KaggleKind::Notebook => write!(f, "notebooks"),
        }
    }
}

#[async_trait]
pub trait KaggleApi: Send + Sync {
    async fn search(
        &self,
        kind: KaggleKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<KaggleEntry>, SearchError>;
}

pub struct KaggleClient {
    http: reqwest::Client,
}

impl KaggleClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl KaggleApi for KaggleClient {
    async fn search(
        &self,
        kind: KaggleKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<KaggleEntry>, SearchError> {
        let response = self
            .http
            .get(format!("{}/search", SITE_ROOT))
            .query(&[("q", query)])
            .send()
            .await?;
        let html = ensure_success(response).await?.text().await?;
        Ok(parse_search_page(&html, kind, limit))
    }
}

/// Collects anchors of the requested kind, de-duplicated by URL
pub(crate) fn parse_search_page(
    html: &str,
    kind: KaggleKind,
    limit: usize,
) -> Vec<KaggleEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for cap in ANCHOR_RE.captures_iter(html) {
        let href = cap.get(1).map_or("", |m| m.as_str());
        if !kind.matches(href) {
            continue;
        }
        let text = TAG_RE.replace_all(cap.get(2).map_or("", |m| m.as_str()), " ");
        let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.chars().count() <= MIN_TITLE_CHARS {
            continue;
        }
        let url = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("{}{}", SITE_ROOT, href)
        };
        if seen.insert(url.clone()) {
            entries.push(KaggleEntry { title, url });
        }
        if entries.len() >= limit {
            break;
        }
    }
    entries
}

/// Dataset/notebook search with three-level query broadening
pub struct KaggleAdapter<A = KaggleClient> {
    api: A,
    policy: RetryPolicy,
    max_results: usize,
}

impl<A: KaggleApi> KaggleAdapter<A> {
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

    /// One sub-type search. Exhausted retries yield a single placeholder.
    async fn search_kind(&self, kind: KaggleKind, query: &str) -> Vec<ResourceItem<KaggleEntry>> {
        let result = retry_with_delay(self.policy, "Kaggle search", || {
            self.api.search(kind, query, self.max_results)
        })
        .await;

        match result {
            Ok(entries) => entries.into_iter().map(ResourceItem::Real).collect(),
            Err(e) => {
                tracing::warn!(backend = Backend::Kaggle.key(), %kind, query, error = %e, "sub-search exhausted");
                vec![placeholder(&kind.to_string(), query)]
            }
        }
    }
}

fn placeholder(kind_label: &str, query: &str) -> ResourceItem<KaggleEntry> {
    ResourceItem::Placeholder(KaggleEntry {
        title: format!("Search Kaggle {} for: {}", kind_label, query),
        url: Backend::Kaggle.search_page_url(query),
    })
}

#[async_trait]
impl<A: KaggleApi> ResourceSearchAdapter for KaggleAdapter<A> {
    fn backend(&self) -> Backend {
        Backend::Kaggle
    }

    async fn search_use_case(&self, query: &str) -> BackendHits {
        for (level, attempt) in broadening_levels(query).iter().enumerate() {
            if level > 0 {
                tracing::info!(backend = Backend::Kaggle.key(), query = %attempt, "retrying with broader query");
            }

            let datasets = self.search_kind(KaggleKind::Dataset, attempt).await;
            let notebooks = self.search_kind(KaggleKind::Notebook, attempt).await;

            let merged: Vec<_> = datasets
                .into_iter()
                .chain(notebooks)
                .filter(|item| !item.is_placeholder())
                .take(self.max_results)
                .collect();
            if !merged.is_empty() {
                return BackendHits::Kaggle(merged);
            }
        }

        BackendHits::Kaggle(vec![placeholder("datasets + notebooks", query.trim())])
    }
}
