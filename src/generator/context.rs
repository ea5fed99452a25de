use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use crate::config::{Config, LLMConfig};
use crate::llm::{LLMClient, TextGeneration};
use crate::tools::{Collaborators, NewsSource, ResourceSearchAdapter, WebSearch};

/// Everything one analysis run needs, created fresh per run
#[derive(Clone)]
pub struct AnalysisContext {
    /// Generation for summaries, news digests and use cases
    pub executor_llm: Arc<dyn TextGeneration>,
    /// Low temperature generation for plans
    pub planner_llm: Arc<dyn TextGeneration>,
    pub web: Arc<dyn WebSearch>,
    pub news: Arc<dyn NewsSource>,
    /// One adapter per resource catalog
    pub adapters: Vec<Arc<dyn ResourceSearchAdapter>>,
    pub config: Config,
    pub run_id: Uuid,
}

impl AnalysisContext {
    /// Context wired to the real LLM provider and public search endpoints
    pub fn new(config: Config, llm_client: &LLMClient) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config)?;
        let planner = planning_client(llm_client, &config.llm);

        Ok(Self::from_parts(
            config,
            Arc::new(llm_client.clone()),
            Arc::new(planner),
            collaborators,
        ))
    }

    pub fn from_parts(
        config: Config,
        executor_llm: Arc<dyn TextGeneration>,
        planner_llm: Arc<dyn TextGeneration>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            executor_llm,
            planner_llm,
            web: collaborators.web,
            news: collaborators.news,
            adapters: collaborators.adapters,
            config,
            run_id: Uuid::new_v4(),
        }
    }
}

/// Planner variant of the client: low temperature and a single attempt, so a
/// dead provider falls through to the default plan without waiting on retries
pub fn planning_client(llm_client: &LLMClient, config: &LLMConfig) -> LLMClient {
    llm_client
        .with_temperature(config.planning_temperature)
        .with_retry_attempts(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planning_client_makes_one_attempt() {
        let config = LLMConfig {
            api_key: "gsk-test".to_string(),
            ..LLMConfig::default()
        };
        let executor = LLMClient::new(&config).unwrap();
        let planner = planning_client(&executor, &config);

        assert_eq!(planner.retry_attempts(), 1);
        assert_eq!(planner.temperature(), 0.1);
        assert_eq!(planner.model(), executor.model());
        // the executor keeps the configured budget
        assert_eq!(executor.retry_attempts(), 2);
        assert_eq!(executor.temperature(), 0.7);
    }
}
