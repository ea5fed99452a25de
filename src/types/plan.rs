use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Tool reference of a plan step, either a single tool or a group of tools
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum StepTool {
    Single(String),
    Many(Vec<String>),
}

impl StepTool {
    pub fn names(&self) -> Vec<&str> {
        match self {
            StepTool::Single(name) => vec![name.as_str()],
            StepTool::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// One ordered step of an execution plan
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct PlanStep {
    /// 1-based position of the step
    pub id: u32,
    /// Machine readable action name, e.g. `search_company_info`
    pub action: String,
    /// Tool(s) responsible for the action
    pub tool: StepTool,
}

impl PlanStep {
    pub fn new(id: u32, action: &str, tool: StepTool) -> Self {
        Self {
            id,
            action: action.to_string(),
            tool,
        }
    }
}

/// Ordered step description consumed by the orchestrator.
///
/// Built once by the plan generator and never mutated afterwards; the
/// `company` field always carries the name the run was started with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ExecutionPlan {
    pub company: String,
    pub steps: Vec<PlanStep>,
}

/// Plan shape as returned by the text generator, before validation.
///
/// Every field is optional so that a missing company or missing steps can be
/// told apart from a parse failure.
#[derive(Debug, Deserialize, Clone, JsonSchema)]
pub struct PlanDraft {
    pub company: Option<String>,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

impl ExecutionPlan {
    /// Hardcoded plan mirroring the five orchestrator phases
    pub fn default_for(company: &str) -> Self {
        Self {
            company: company.to_string(),
            steps: vec![
                PlanStep::new(
                    1,
                    "search_company_info",
                    StepTool::Single("WebSearch".to_string()),
                ),
                PlanStep::new(
                    2,
                    "resolve_news",
                    StepTool::Many(vec!["NewsApi".to_string(), "WebSearch".to_string()]),
                ),
                PlanStep::new(3, "summarize_company", StepTool::Single("LLM".to_string())),
                PlanStep::new(
                    4,
                    "generate_ai_use_cases",
                    StepTool::Single("LLM".to_string()),
                ),
                PlanStep::new(
                    5,
                    "search_resources",
                    StepTool::Many(vec![
                        "ArxivTool".to_string(),
                        "HuggingFaceTool".to_string(),
                        "KaggleTool".to_string(),
                        "GitHubTool".to_string(),
                    ]),
                ),
            ],
        }
    }

    /// Validates a generated draft and pins the company name to `company`.
    ///
    /// Returns `None` when the draft has no company field or no steps, in which
    /// case the caller falls back to [`ExecutionPlan::default_for`].
    pub fn from_draft(draft: PlanDraft, company: &str) -> Option<Self> {
        draft.company.as_ref()?;
        if draft.steps.is_empty() {
            return None;
        }
        Some(Self {
            company: company.to_string(),
            steps: draft.steps,
        })
    }
}
