use std::sync::Arc;

use tokio::task::JoinSet;

use crate::generator::context::AnalysisContext;
use crate::generator::news::NewsFallbackResolver;
use crate::generator::progress::ProgressObserver;
use crate::tools::web_search::company_info_query;
use crate::tools::{ResourceSearchAdapter, WebHit};
use crate::types::analysis::{AnalysisResult, UseCaseResult};
use crate::types::plan::ExecutionPlan;
use crate::types::resource::ResourceMap;
use crate::types::use_case::{UseCase, UseCasePayload, default_use_cases};

/// Info results fed to the summarizer
const SUMMARY_SOURCES: usize = 3;

/// Summary used when the company cannot be summarized
pub fn generic_summary(company: &str) -> String {
    format!("{} is a company in the technology/business sector.", company)
}

/// Runs the five analysis phases for a plan.
///
/// Phases run one after another and each degrades to a fallback value instead
/// of failing. The only concurrency is the per use case resource fan-out.
pub struct ExecutionOrchestrator<'a> {
    context: &'a AnalysisContext,
    progress: &'a dyn ProgressObserver,
}

impl<'a> ExecutionOrchestrator<'a> {
    pub fn new(context: &'a AnalysisContext, progress: &'a dyn ProgressObserver) -> Self {
        Self { context, progress }
    }

    pub async fn execute(&self, plan: &ExecutionPlan) -> AnalysisResult {
        let company = plan.company.as_str();
        for step in &plan.steps {
            tracing::debug!(
                run_id = %self.context.run_id,
                step = step.id,
                action = %step.action,
                tools = ?step.tool.names(),
                "plan step"
            );
        }

        self.progress.notify("🔍 Searching company information...");
        let company_info = self.search_company_info(company).await;

        self.progress.notify("📰 Collecting recent news and funding information...");
        let news_summary = NewsFallbackResolver::new(
            self.context.news.clone(),
            self.context.web.clone(),
            self.context.executor_llm.clone(),
        )
        .resolve(company)
        .await;

        self.progress.notify("📝 Summarizing the company...");
        let company_summary = self.summarize_company(company, &company_info).await;

        self.progress.notify("💡 Generating AI use cases...");
        let use_cases = self.generate_use_cases(company, &company_summary).await;

        let total = use_cases.len();
        let mut use_case_results = Vec::with_capacity(total);
        for (index, use_case) in use_cases.into_iter().enumerate() {
            self.progress.notify(&format!(
                "🔬 Searching resources for use case {}/{}: {}",
                index + 1,
                total,
                use_case.name
            ));
            let query = use_case.search_query();
            let resources = fan_out(&self.context.adapters, &query).await;
            use_case_results.push(UseCaseResult {
                use_case: use_case.name,
                description: use_case.description,
                search_keywords: query,
                resources,
            });
        }

        AnalysisResult {
            company: company.to_string(),
            company_summary,
            news_summary,
            use_case_results,
        }
    }

    async fn search_company_info(&self, company: &str) -> Vec<WebHit> {
        match self.context.web.text_search(&company_info_query(company)).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!(error = %e, "company info search failed");
                Vec::new()
            }
        }
    }

    async fn summarize_company(&self, company: &str, company_info: &[WebHit]) -> String {
        let sources = company_info
            .iter()
            .take(SUMMARY_SOURCES)
            .map(|hit| format!("Title: {}\nContent: {}", hit.title, hit.snippet))
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt_user = format!(include_str!("prompts/summary_user.tpl"), company, sources);

        match self
            .context
            .executor_llm
            .generate_text(include_str!("prompts/summary_sys.tpl"), &prompt_user)
            .await
        {
            Ok(summary) => summary.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "company summary generation failed");
                generic_summary(company)
            }
        }
    }

    async fn generate_use_cases(&self, company: &str, company_summary: &str) -> Vec<UseCase> {
        let count = self.context.config.use_case_count.max(1);
        let schema = serde_json::to_string_pretty(&schemars::schema_for!(
            crate::types::use_case::UseCaseDraft
        ))
        .unwrap_or_default();
        let prompt_sys = format!(include_str!("prompts/use_cases_sys.tpl"), count, schema);
        let prompt_user = format!(
            include_str!("prompts/use_cases_user.tpl"),
            company, company_summary, count
        );

        let payload = match self
            .context
            .executor_llm
            .generate_structured(&prompt_sys, &prompt_user)
            .await
        {
            Ok(value) => UseCasePayload::decode(value),
            Err(e) => UseCasePayload::Malformed(e.to_string()),
        };

        if let UseCasePayload::Malformed(reason) = &payload {
            tracing::warn!(%reason, "use case generation unusable, using defaults");
        }
        payload
            .into_use_cases()
            .unwrap_or_else(|| default_use_cases(company))
    }
}

/// Dispatches `query` to every adapter concurrently and waits for all of them.
///
/// Each task writes only its own backend slot, so completion order does not
/// affect the result.
pub async fn fan_out(adapters: &[Arc<dyn ResourceSearchAdapter>], query: &str) -> ResourceMap {
    let mut tasks = JoinSet::new();
    for adapter in adapters {
        let adapter = Arc::clone(adapter);
        let query = query.to_string();
        tasks.spawn(async move { adapter.search_use_case(&query).await });
    }

    let mut resources = ResourceMap::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(hits) => {
                tracing::debug!(backend = %hits.backend(), hits = hits.len(), "backend finished");
                resources.insert(hits);
            }
            Err(e) => tracing::error!(error = %e, "resource search task aborted"),
        }
    }
    resources
}
