use crate::config::{Config, LLMProvider};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// usecase-radar - AI opportunity reports for any company
#[derive(Parser, Debug)]
#[command(name = "usecase-radar")]
#[command(
    about = "Turns a company name into a business summary, a news and funding digest, and AI use cases backed by papers, models, datasets and repositories."
)]
#[command(version)]
pub struct Args {
    /// Company to analyze
    pub company: String,

    /// Configuration file, defaults to ./radar.toml when present
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// LLM provider (openai, groq, deepseek, openrouter, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API base URL (Groq by default; non-OpenAI providers use their own endpoint unless set)
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API key
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature for summaries and use cases
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Number of use cases to request
    #[arg(short = 'u', long)]
    pub use_cases: Option<usize>,

    /// Maximum hits kept per resource catalog
    #[arg(long)]
    pub max_results: Option<usize>,

    /// Do not write any report files
    #[arg(long)]
    pub no_export: bool,

    /// Skip the JSON export
    #[arg(long)]
    pub no_json: bool,

    /// Skip the text report
    #[arg(long)]
    pub no_report: bool,

    /// Skip the model connection check
    #[arg(long)]
    pub skip_connection_check: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Loads the configuration file and applies the command line overrides
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(provider_str) = self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(e) => eprintln!("⚠️ {}, keeping provider {}", e, config.llm.provider),
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(use_cases) = self.use_cases {
            config.use_case_count = use_cases;
        }
        if let Some(max_results) = self.max_results {
            config.search.max_results = max_results;
        }

        if let Some(output_path) = self.output_path {
            config.export.output_path = output_path;
        }
        if self.no_export {
            config.export.enabled = false;
        }
        if self.no_json {
            config.export.json = false;
        }
        if self.no_report {
            config.export.report = false;
        }

        config.skip_connection_check |= self.skip_connection_check;
        config.verbose |= self.verbose;

        Ok(config)
    }
}
