use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use usecase_radar::config::{Config, ExportConfig, SearchConfig};
use usecase_radar::error::{GenerationError, SearchError};
use usecase_radar::generator::context::AnalysisContext;
use usecase_radar::generator::outlet::{DiskOutlet, Outlet};
use usecase_radar::generator::progress::SilentProgress;
use usecase_radar::generator::workflow::{TimingScope, run};
use usecase_radar::llm::TextGeneration;
use usecase_radar::tools::github::{GitHubAdapter, RepositoryApi};
use usecase_radar::tools::{
    Collaborators, NewsArticle, NewsSource, ResourceSearchAdapter, WebHit, WebSearch,
};
use usecase_radar::types::analysis::{AnalysisResult, UseCaseResult};
use usecase_radar::types::resource::{
    Backend, BackendHits, HubEntry, HubKind, Paper, Repository, ResourceItem, ResourceMap,
};
use usecase_radar::utils::query::broadening_levels;
use usecase_radar::utils::retry::RetryPolicy;
use usecase_radar::ResultVerifier;

/// Generation that succeeds for every phase except the ones listed in `failing`
struct ScriptedLlm {
    failing: Vec<&'static str>,
}

#[async_trait]
impl TextGeneration for ScriptedLlm {
    async fn generate_text(&self, system: &str, _user: &str) -> Result<String, GenerationError> {
        let phase = if system.contains("planning agent") {
            "plan"
        } else if system.contains("business analyst") {
            "summary"
        } else if system.contains("AI consultant") {
            "use_cases"
        } else {
            "news"
        };
        if self.failing.contains(&phase) {
            return Err(GenerationError::Provider(format!("{} unavailable", phase)));
        }
        let reply = match phase {
            "plan" => r#"{"company": "Someone Else", "steps": [{"id": 1, "action": "search_company_info", "tool": "WebSearch"}]}"#,
            "summary" => "Acme manufactures precision anvils for logistics customers.",
            "use_cases" => {
                r#"[{"use_case": "Demand Forecasting", "description": "Forecast anvil demand.", "search_keywords": "demand forecasting xgboost retail"}]"#
            }
            _ => "Funding & Financials: Series B.",
        };
        Ok(reply.to_string())
    }
}

/// Records queries and answers each with `hits_per_query` results
struct RecordingWeb {
    hits_per_query: usize,
    queries: Mutex<Vec<String>>,
}

impl RecordingWeb {
    fn new(hits_per_query: usize) -> Arc<Self> {
        Arc::new(Self {
            hits_per_query,
            queries: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl WebSearch for RecordingWeb {
    async fn text_search(&self, query: &str) -> Result<Vec<WebHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok((0..self.hits_per_query)
            .map(|i| WebHit {
                title: format!("{} [{}]", query, i),
                snippet: "snippet".to_string(),
                link: format!("https://search.example/{}", i),
            })
            .collect())
    }
}

struct EmptyNews;

#[async_trait]
impl NewsSource for EmptyNews {
    async fn company_news(&self, _company: &str) -> Vec<NewsArticle> {
        Vec::new()
    }
}

/// Adapter that always comes back empty
struct FailingAdapter(Backend);

#[async_trait]
impl ResourceSearchAdapter for FailingAdapter {
    fn backend(&self) -> Backend {
        self.0
    }

    async fn search_use_case(&self, _query: &str) -> BackendHits {
        BackendHits::empty(self.0)
    }
}

/// Repository API with hits only for the exact queries it knows
struct KnownRepos {
    known: Vec<&'static str>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl RepositoryApi for KnownRepos {
    async fn search_repositories(
        &self,
        query: &str,
        _limit: usize,
    ) -> Result<Vec<Repository>, SearchError> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.known.contains(&query) {
            Ok(vec![Repository {
                name: "owner/forecast".to_string(),
                url: "https://github.com/owner/forecast".to_string(),
                stars: 420,
                description: Some("Forecasting toolkit".to_string()),
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

fn failing_adapters() -> Vec<Arc<dyn ResourceSearchAdapter>> {
    Backend::ALL
        .into_iter()
        .map(|b| Arc::new(FailingAdapter(b)) as Arc<dyn ResourceSearchAdapter>)
        .collect()
}

fn context(
    llm: ScriptedLlm,
    web: Arc<RecordingWeb>,
    adapters: Vec<Arc<dyn ResourceSearchAdapter>>,
) -> AnalysisContext {
    let llm: Arc<dyn TextGeneration> = Arc::new(llm);
    AnalysisContext::from_parts(
        Config::default(),
        llm.clone(),
        llm,
        Collaborators {
            web,
            news: Arc::new(EmptyNews),
            adapters,
        },
    )
}

/// Asserts the canonical JSON shape of a finalized result
fn assert_canonical_schema(result: &AnalysisResult) {
    let value = serde_json::to_value(result).unwrap();
    let keys = |v: &Value| -> BTreeSet<String> {
        v.as_object().unwrap().keys().cloned().collect()
    };
    let expect = |names: &[&str]| -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    };

    assert_eq!(
        keys(&value),
        expect(&["company", "company_summary", "news_summary", "ai_use_cases"])
    );
    for use_case in value["ai_use_cases"].as_array().unwrap() {
        assert_eq!(
            keys(use_case),
            expect(&["use_case", "description", "search_keywords", "resources"])
        );
        let resources = &use_case["resources"];
        assert_eq!(
            keys(resources),
            expect(&["arxiv", "huggingface", "kaggle", "github"])
        );
        let shapes = [
            ("arxiv", expect(&["title", "url"])),
            ("huggingface", expect(&["name", "url"])),
            ("kaggle", expect(&["title", "url"])),
            ("github", expect(&["name", "url", "stars"])),
        ];
        for (backend, shape) in shapes {
            let items = resources[backend].as_array().unwrap();
            assert!(!items.is_empty(), "{} is empty", backend);
            for item in items {
                assert_eq!(keys(item), shape, "bad {} item", backend);
            }
        }
    }
}

#[tokio::test]
async fn test_use_case_generation_unavailable_yields_three_defaults() {
    let ctx = context(
        ScriptedLlm {
            failing: vec!["use_cases"],
        },
        RecordingWeb::new(2),
        failing_adapters(),
    );
    let (result, _) = run(&ctx, "Acme", &SilentProgress, &mut TimingScope::new()).await;

    let names: Vec<_> = result
        .use_case_results
        .iter()
        .map(|u| u.use_case.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Customer Service Chatbot",
            "Predictive Analytics",
            "Process Automation"
        ]
    );
    assert_canonical_schema(&result);
}

#[tokio::test]
async fn test_all_adapters_failing_get_four_placeholders() {
    let raw = AnalysisResult {
        company: "Acme".to_string(),
        company_summary: "Acme manufactures anvils.".to_string(),
        news_summary: String::new(),
        use_case_results: vec![UseCaseResult {
            use_case: "X".to_string(),
            description: "d".to_string(),
            search_keywords: "X".to_string(),
            resources: ResourceMap::default(),
        }],
    };

    let (result, report) = ResultVerifier::verify(raw);
    assert_eq!(report.placeholders_added(), 4);

    let value = serde_json::to_value(&result).unwrap();
    let resources = &value["ai_use_cases"][0]["resources"];
    for (backend, label_key) in [
        ("arxiv", "title"),
        ("huggingface", "name"),
        ("kaggle", "title"),
        ("github", "name"),
    ] {
        let items = resources[backend].as_array().unwrap();
        assert_eq!(items.len(), 1);
        let label = items[0][label_key].as_str().unwrap().to_lowercase();
        assert!(label.contains("search"), "{}", label);
        assert!(label.ends_with("for: x"), "{}", label);
    }
}

#[tokio::test]
async fn test_repository_search_broadens_to_two_words() {
    let api = KnownRepos {
        known: vec!["demand forecasting"],
        calls: Mutex::new(Vec::new()),
    };
    let adapter = GitHubAdapter::new(api, &SearchConfig::default())
        .with_policy(RetryPolicy::immediate(2));

    let hits = adapter
        .search_use_case("demand forecasting xgboost retail")
        .await;

    assert_eq!(hits.len(), 1);
    assert_eq!(
        broadening_levels("demand forecasting xgboost retail"),
        vec![
            "demand forecasting xgboost retail",
            "demand forecasting xgboost",
            "demand forecasting"
        ]
    );
}

#[tokio::test]
async fn test_news_fallback_issues_two_capped_queries() {
    let web = RecordingWeb::new(5);
    let ctx = context(ScriptedLlm { failing: vec![] }, web.clone(), failing_adapters());

    run(&ctx, "Acme", &SilentProgress, &mut TimingScope::new()).await;

    let queries = web.queries.lock().unwrap().clone();
    let news_queries: Vec<_> = queries
        .iter()
        .filter(|q| !q.contains("what does it do"))
        .cloned()
        .collect();
    assert_eq!(
        news_queries,
        vec![
            "Acme funding rounds investors crunchbase",
            "Acme latest business news"
        ]
    );
}

#[tokio::test]
async fn test_end_to_end_with_real_adapter_and_export() {
    let github: Arc<dyn ResourceSearchAdapter> = Arc::new(
        GitHubAdapter::new(
            KnownRepos {
                known: vec!["demand forecasting"],
                calls: Mutex::new(Vec::new()),
            },
            &SearchConfig::default(),
        )
        .with_policy(RetryPolicy::immediate(1)),
    );
    let mut adapters = failing_adapters();
    adapters.retain(|a| a.backend() != Backend::GitHub);
    adapters.push(github);

    let ctx = context(
        ScriptedLlm {
            failing: vec!["plan"],
        },
        RecordingWeb::new(3),
        adapters,
    );
    let (result, report) = run(&ctx, "Acme", &SilentProgress, &mut TimingScope::new()).await;

    assert_eq!(result.company, "Acme");
    assert_eq!(report.placeholders_added(), 3);
    let use_case = &result.use_case_results[0];
    assert_eq!(use_case.search_keywords, "demand forecasting xgboost retail");
    assert!(!use_case.resources.github[0].is_placeholder());
    assert_eq!(use_case.resources.github[0].inner().description, None);
    assert_canonical_schema(&result);

    let temp_dir = TempDir::new().unwrap();
    let outlet = DiskOutlet::new(&ExportConfig {
        enabled: true,
        output_path: temp_dir.path().join("reports"),
        json: true,
        report: true,
    });
    let written = outlet.save(&result).await.unwrap();

    assert_eq!(written.len(), 2);
    let json_path = temp_dir.path().join("reports/Acme_ai_analysis.json");
    let exported: Value = serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(exported["company"], "Acme");
    assert_eq!(exported["ai_use_cases"][0]["resources"]["github"][0]["stars"], 420);

    let report_text =
        std::fs::read_to_string(temp_dir.path().join("reports/Acme_ai_analysis.txt")).unwrap();
    assert!(report_text.contains("1. Demand Forecasting"));
    assert!(report_text.contains("GitHub 1"));
}

#[test]
fn test_finalize_is_idempotent_and_shuffle_invariant() {
    let paper = |i: u32| {
        ResourceItem::Real(Paper {
            title: format!("paper {}", i),
            url: format!("https://arxiv.org/abs/{}", i),
            summary: Some("abstract".to_string()),
        })
    };
    let hub = ResourceItem::Real(HubEntry {
        name: "org/model".to_string(),
        url: "https://huggingface.co/org/model".to_string(),
        downloads: Some(9),
        kind: Some(HubKind::Model),
    });

    let build = |order: &[usize]| {
        let batches = [
            BackendHits::Arxiv(vec![paper(1), paper(2)]),
            BackendHits::HuggingFace(vec![hub.clone()]),
            BackendHits::Kaggle(Vec::new()),
            BackendHits::GitHub(Vec::new()),
        ];
        let mut resources = ResourceMap::default();
        for i in order {
            resources.insert(batches[*i].clone());
        }
        AnalysisResult {
            company: "Acme".to_string(),
            company_summary: "ok".to_string(),
            news_summary: "none".to_string(),
            use_case_results: vec![UseCaseResult {
                use_case: "Forecasting".to_string(),
                description: "d".to_string(),
                search_keywords: "forecasting".to_string(),
                resources,
            }],
        }
    };

    let a = ResultVerifier::finalize(build(&[0, 1, 2, 3]));
    let b = ResultVerifier::finalize(build(&[3, 1, 0, 2]));
    assert_eq!(a, b);

    let again = ResultVerifier::finalize(a.clone());
    assert_eq!(again, a);
    assert_canonical_schema(&a);
}
