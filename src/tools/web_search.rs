//! DuckDuckGo HTML search

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use super::{WebHit, WebSearch, ensure_success};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::utils::retry::{RetryPolicy, retry_with_delay};

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]+class="result__a"[^>]+href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid result title pattern")
});
static SNIPPET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]+class="result__snippet"[^>]*>(.*?)</a>"#)
        .expect("valid result snippet pattern")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid html tag pattern"));

/// Query used for the company-info phase
pub fn company_info_query(company: &str) -> String {
    format!("{} company what does it do business overview", company)
}

pub struct DuckDuckGoSearch {
    http: reqwest::Client,
    max_results: usize,
    policy: RetryPolicy,
}

impl DuckDuckGoSearch {
    pub fn new(http: reqwest::Client, config: &SearchConfig) -> Self {
        Self {
            http,
            max_results: config.max_results,
            policy: RetryPolicy::from_search_config(config),
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<WebHit>, SearchError> {
        let response = self
            .http
            .post(SEARCH_ENDPOINT)
            .form(&[("q", query), ("kl", "wt-wt")])
            .send()
            .await?;
        let html = ensure_success(response).await?.text().await?;
        Ok(parse_results(&html, self.max_results))
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn text_search(&self, query: &str) -> Result<Vec<WebHit>, SearchError> {
        retry_with_delay(self.policy, "web search", || self.fetch(query)).await
    }
}

/// Extracts result titles, links and snippets from the HTML results page.
///
/// Titles and snippets are paired by position.
pub(crate) fn parse_results(html: &str, max_results: usize) -> Vec<WebHit> {
    let snippets: Vec<String> = SNIPPET_RE
        .captures_iter(html)
        .map(|cap| strip_html_tags(cap.get(1).map_or("", |m| m.as_str())))
        .collect();

    TITLE_RE
        .captures_iter(html)
        .enumerate()
        .map(|(i, cap)| WebHit {
            link: extract_real_url(cap.get(1).map_or("", |m| m.as_str())),
            title: strip_html_tags(cap.get(2).map_or("", |m| m.as_str())),
            snippet: snippets.get(i).cloned().unwrap_or_default(),
        })
        .filter(|hit| !hit.link.is_empty() && !hit.title.is_empty())
        .take(max_results)
        .collect()
}

/// Result links go through `//duckduckgo.com/l/?uddg=<target>&...`
fn extract_real_url(raw: &str) -> String {
    match raw.find("uddg=") {
        Some(pos) => {
            let rest = &raw[pos + 5..];
            let end = rest.find('&').unwrap_or(rest.len());
            urlencoding::decode(&rest[..end])
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| rest[..end].to_string())
        }
        None => raw.to_string(),
    }
}

fn strip_html_tags(s: &str) -> String {
    TAG_RE
        .replace_all(s, "")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}
