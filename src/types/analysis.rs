use serde::Serialize;

use crate::types::resource::{Backend, ResourceMap};

/// Resources gathered for one use case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseCaseResult {
    pub use_case: String,
    pub description: String,
    /// Query the resources were searched with
    pub search_keywords: String,
    pub resources: ResourceMap,
}

impl UseCaseResult {
    pub fn is_complete(&self) -> bool {
        Backend::ALL
            .iter()
            .all(|backend| self.resources.len_of(*backend) > 0)
    }
}

/// Outcome of one analysis run, the only value handed back to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub company: String,
    pub company_summary: String,
    pub news_summary: String,
    #[serde(rename = "ai_use_cases")]
    pub use_case_results: Vec<UseCaseResult>,
}

impl AnalysisResult {
    pub fn total_resources(&self) -> usize {
        self.use_case_results
            .iter()
            .map(|u| u.resources.total())
            .sum()
    }
}
