//! Hugging Face Hub model and dataset search

use async_trait::async_trait;
use serde::Deserialize;

use super::{ResourceSearchAdapter, ensure_success};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::resource::{Backend, BackendHits, HubEntry, HubKind, ResourceItem};
use crate::utils::retry::{RetryPolicy, retry_with_delay};

const API_BASE: &str = "https://huggingface.co/api";

#[async_trait]
pub trait HubApi: Send + Sync {
    async fn search(
        &self,
        kind: HubKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<HubEntry>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct HubListing {
    id: String,
    #[serde(default)]
    downloads: Option<u64>,
}

pub struct HuggingFaceClient {
    http: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HubApi for HuggingFaceClient {
    async fn search(
        &self,
        kind: HubKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<HubEntry>, SearchError> {
        let collection = match kind {
            HubKind::Model => "models",
            HubKind::Dataset => "datasets",
        };
        let limit = limit.to_string();
        let response = self
            .http
            .get(format!("{}/{}", API_BASE, collection))
            .query(&[
                ("search", query),
                ("limit", limit.as_str()),
                ("sort", "downloads"),
                ("direction", "-1"),
            ])
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        parse_listing(&body, kind)
    }
}

pub(crate) fn parse_listing(body: &str, kind: HubKind) -> Result<Vec<HubEntry>, SearchError> {
    let listings: Vec<HubListing> = serde_json::from_str(body)?;
    Ok(listings
        .into_iter()
        .map(|listing| {
            let url = match kind {
                HubKind::Model => format!("https://huggingface.co/{}", listing.id),
                HubKind::Dataset => format!("https://huggingface.co/datasets/{}", listing.id),
            };
            HubEntry {
                name: listing.id,
                url,
                downloads: Some(listing.downloads.unwrap_or(0)),
                kind: Some(kind),
            }
        })
        .collect())
}

/// Model/dataset search: two independent sub-searches, models first
pub struct HuggingFaceAdapter<A = HuggingFaceClient> {
    api: A,
    policy: RetryPolicy,
    max_results: usize,
}

impl<A: HubApi> HuggingFaceAdapter<A> {
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

    async fn search_kind(&self, kind: HubKind, query: &str) -> Vec<HubEntry> {
        let label = match kind {
            HubKind::Model => "Hugging Face model search",
            HubKind::Dataset => "Hugging Face dataset search",
        };
        retry_with_delay(self.policy, label, || {
            self.api.search(kind, query, self.max_results)
        })
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(backend = Backend::HuggingFace.key(), ?kind, query, error = %e, "sub-search exhausted");
            Vec::new()
        })
    }
}

#[async_trait]
impl<A: HubApi> ResourceSearchAdapter for HuggingFaceAdapter<A> {
    fn backend(&self) -> Backend {
        Backend::HuggingFace
    }

    async fn search_use_case(&self, query: &str) -> BackendHits {
        let models = self.search_kind(HubKind::Model, query).await;
        let datasets = self.search_kind(HubKind::Dataset, query).await;

        BackendHits::HuggingFace(
            models
                .into_iter()
                .chain(datasets)
                .take(self.max_results)
                .map(ResourceItem::Real)
                .collect(),
        )
    }
}
