//! NewsAPI backed news source

use async_trait::async_trait;
use serde::Deserialize;

use super::{NewsArticle, NewsSource, ensure_success};
use crate::config::NewsConfig;
use crate::error::SearchError;

const EVERYTHING_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Query matching the company alongside business and funding terms
pub fn company_news_query(company: &str) -> String {
    format!(
        "\"{}\" AND (funding OR investment OR business OR startup OR finance OR growth OR launch)",
        company
    )
}

pub struct NewsApiSource {
    http: reqwest::Client,
    api_key: Option<String>,
    page_size: usize,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
}

impl NewsApiSource {
    pub fn new(http: reqwest::Client, config: &NewsConfig) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            page_size: config.max_articles,
        }
    }

    async fn fetch(&self, api_key: &str, company: &str) -> Result<Vec<NewsArticle>, SearchError> {
        let page_size = self.page_size.to_string();
        let query = company_news_query(company);
        let response = self
            .http
            .get(EVERYTHING_ENDPOINT)
            .query(&[
                ("q", query.as_str()),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;
        let body = ensure_success(response).await?.text().await?;
        parse_articles(&body)
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn company_news(&self, company: &str) -> Vec<NewsArticle> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("NEWS_API_KEY not set, skipping news lookup");
            return Vec::new();
        };

        match self.fetch(api_key, company).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(error = %e, company, "news lookup failed");
                Vec::new()
            }
        }
    }
}

pub(crate) fn parse_articles(body: &str) -> Result<Vec<NewsArticle>, SearchError> {
    let response: EverythingResponse = serde_json::from_str(body)?;
    Ok(response
        .articles
        .into_iter()
        .map(|raw| NewsArticle {
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            published_at: raw
                .published_at
                .unwrap_or_default()
                .chars()
                .take(10)
                .collect(),
        })
        .collect())
}
