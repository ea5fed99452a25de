use std::sync::Arc;

use crate::llm::TextGeneration;
use crate::types::plan::{ExecutionPlan, PlanDraft};

/// Produces the execution plan for a company with a single generation attempt
pub struct PlanGenerator {
    llm: Arc<dyn TextGeneration>,
}

impl PlanGenerator {
    pub fn new(llm: Arc<dyn TextGeneration>) -> Self {
        Self { llm }
    }

    /// Never fails: any generation, parse or shape problem yields the
    /// default plan. The returned plan always names `company`.
    pub async fn create_plan(&self, company: &str) -> ExecutionPlan {
        let schema = serde_json::to_string_pretty(&schemars::schema_for!(PlanDraft))
            .unwrap_or_default();
        let prompt_sys = format!(include_str!("prompts/plan_sys.tpl"), schema);
        let prompt_user = format!(include_str!("prompts/plan_user.tpl"), company);

        let value = match self.llm.generate_structured(&prompt_sys, &prompt_user).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "plan generation failed, using default plan");
                return ExecutionPlan::default_for(company);
            }
        };

        let plan = serde_json::from_value::<PlanDraft>(value)
            .map_err(|e| e.to_string())
            .and_then(|draft| {
                ExecutionPlan::from_draft(draft, company)
                    .ok_or_else(|| "plan without company or steps".to_string())
            });

        match plan {
            Ok(plan) => {
                tracing::debug!(steps = plan.steps.len(), "generated plan accepted");
                plan
            }
            Err(reason) => {
                tracing::warn!(%reason, "generated plan rejected, using default plan");
                ExecutionPlan::default_for(company)
            }
        }
    }
}
