use std::sync::Arc;

use crate::llm::TextGeneration;
use crate::tools::{NewsArticle, NewsSource, WebHit, WebSearch};

/// Returned when neither the news source nor the web search found anything
pub const NO_NEWS_AVAILABLE: &str = "No recent news or funding data available.";

/// Returned when the digest could not be generated
pub const NEWS_SUMMARY_FAILED: &str = "Error generating news summary.";

/// Hits kept from each fallback web search
const FALLBACK_HITS_PER_QUERY: usize = 3;

pub fn funding_query(company: &str) -> String {
    format!("{} funding rounds investors crunchbase", company)
}

pub fn general_news_query(company: &str) -> String {
    format!("{} latest business news", company)
}

/// Builds the news and funding digest, falling back from the dedicated news
/// source to two web searches.
pub struct NewsFallbackResolver {
    news: Arc<dyn NewsSource>,
    web: Arc<dyn WebSearch>,
    llm: Arc<dyn TextGeneration>,
}

impl NewsFallbackResolver {
    pub fn new(
        news: Arc<dyn NewsSource>,
        web: Arc<dyn WebSearch>,
        llm: Arc<dyn TextGeneration>,
    ) -> Self {
        Self { news, web, llm }
    }

    pub async fn resolve(&self, company: &str) -> String {
        let articles = self.news.company_news(company).await;
        let collected = if articles.is_empty() {
            tracing::info!(company, "no articles from the news source, falling back to web search");
            self.collect_from_web(company).await
        } else {
            format_articles(&articles)
        };

        if collected.trim().is_empty() {
            return NO_NEWS_AVAILABLE.to_string();
        }

        let prompt_user = format!(include_str!("prompts/news_user.tpl"), company, collected);
        match self
            .llm
            .generate_text(include_str!("prompts/news_sys.tpl"), &prompt_user)
            .await
        {
            Ok(summary) => summary.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "news summary generation failed");
                NEWS_SUMMARY_FAILED.to_string()
            }
        }
    }

    async fn collect_from_web(&self, company: &str) -> String {
        let mut hits = Vec::new();
        for query in [funding_query(company), general_news_query(company)] {
            match self.web.text_search(&query).await {
                Ok(found) => hits.extend(found.into_iter().take(FALLBACK_HITS_PER_QUERY)),
                Err(e) => tracing::warn!(%query, error = %e, "fallback news search failed"),
            }
        }
        format_hits(&hits)
    }
}

fn format_articles(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                "Title: {}\nDate: {}\nDescription: {}",
                a.title, a.published_at, a.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_hits(hits: &[WebHit]) -> String {
    hits.iter()
        .map(|h| format!("Title: {}\nContent: {}\nSource: {}", h.title, h.snippet, h.link))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, SearchError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeNews(Vec<NewsArticle>);

    #[async_trait]
    impl NewsSource for FakeNews {
        async fn company_news(&self, _company: &str) -> Vec<NewsArticle> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct FakeWeb {
        hits_per_query: usize,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl WebSearch for FakeWeb {
        async fn text_search(&self, query: &str) -> Result<Vec<WebHit>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok((0..self.hits_per_query)
                .map(|i| WebHit {
                    title: format!("{} #{}", query, i),
                    snippet: "snippet".to_string(),
                    link: format!("https://example.com/{}", i),
                })
                .collect())
        }
    }

    /// Echoes the user prompt, or fails when `fail` is set
    #[derive(Default)]
    struct EchoLlm {
        fail: bool,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGeneration for EchoLlm {
        async fn generate_text(&self, _s: &str, user: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(user.to_string());
            if self.fail {
                return Err(GenerationError::EmptyResponse);
            }
            Ok(format!("digest of: {}", user))
        }
    }

    fn article() -> NewsArticle {
        NewsArticle {
            title: "Acme raises $20M".to_string(),
            description: "Series B".to_string(),
            published_at: "2024-03-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_articles_skip_web_fallback() {
        let web = Arc::new(FakeWeb {
            hits_per_query: 5,
            ..Default::default()
        });
        let llm = Arc::new(EchoLlm::default());
        let resolver = NewsFallbackResolver::new(
            Arc::new(FakeNews(vec![article()])),
            web.clone(),
            llm.clone(),
        );

        let summary = resolver.resolve("Acme").await;
        assert!(summary.contains("Acme raises $20M"));
        assert!(web.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_web_fallback_caps_each_query() {
        let web = Arc::new(FakeWeb {
            hits_per_query: 5,
            ..Default::default()
        });
        let llm = Arc::new(EchoLlm::default());
        let resolver =
            NewsFallbackResolver::new(Arc::new(FakeNews(Vec::new())), web.clone(), llm.clone());

        resolver.resolve("Acme").await;

        assert_eq!(
            *web.queries.lock().unwrap(),
            vec![
                "Acme funding rounds investors crunchbase",
                "Acme latest business news"
            ]
        );
        let prompt = llm.prompts.lock().unwrap()[0].clone();
        assert_eq!(prompt.matches("Title: ").count(), 6);
    }

    #[tokio::test]
    async fn test_nothing_found_returns_sentinel_without_generation() {
        let llm = Arc::new(EchoLlm::default());
        let resolver = NewsFallbackResolver::new(
            Arc::new(FakeNews(Vec::new())),
            Arc::new(FakeWeb::default()),
            llm.clone(),
        );

        assert_eq!(resolver.resolve("Acme").await, NO_NEWS_AVAILABLE);
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_returns_sentinel() {
        let resolver = NewsFallbackResolver::new(
            Arc::new(FakeNews(vec![article()])),
            Arc::new(FakeWeb::default()),
            Arc::new(EchoLlm {
                fail: true,
                ..Default::default()
            }),
        );

        assert_eq!(resolver.resolve("Acme").await, NEWS_SUMMARY_FAILED);
    }
}
