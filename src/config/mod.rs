use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::LaunchError;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "radar.toml";

/// OpenAI compatible endpoint used when no base URL is configured (Groq)
pub const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// LLM provider type
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    /// Any OpenAI compatible endpoint (Groq by default)
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl LLMProvider {
    /// Local providers run without an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, LLMProvider::Ollama)
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" | "groq" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Number of use cases requested from the generator
    pub use_case_count: usize,

    /// LLM settings
    pub llm: LLMConfig,

    /// Resource and web search settings
    pub search: SearchConfig,

    /// News source settings
    pub news: NewsConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Skip the model round-trip performed before the pipeline starts
    pub skip_connection_check: bool,

    /// Verbose logging
    pub verbose: bool,
}

/// LLM settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,

    pub api_key: String,

    pub api_base_url: String,

    pub model: String,

    pub max_tokens: u32,

    /// Temperature for summaries, news digests and use cases
    pub temperature: f64,

    /// Temperature for plan generation
    pub planning_temperature: f64,

    pub retry_attempts: u32,

    pub retry_delay_ms: u64,

    pub timeout_seconds: u64,
}

/// Search settings shared by the web search and the four resource catalogs
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of hits kept per backend
    pub max_results: usize,

    /// Attempts per upstream call
    pub retry_attempts: u32,

    /// Fixed delay between attempts
    pub retry_delay_ms: u64,

    pub timeout_seconds: u64,

    pub user_agent: String,

    /// Optional GitHub token for higher rate limits
    pub github_token: Option<String>,
}

/// News source settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct NewsConfig {
    /// NewsAPI key; without it the news source yields nothing
    pub api_key: Option<String>,

    pub max_articles: usize,
}

/// Export settings
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub enabled: bool,

    pub output_path: PathBuf,

    /// Write `<company>_ai_analysis.json`
    pub json: bool,

    /// Write `<company>_ai_analysis.txt`
    pub report: bool,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Load from `path` when given, else from [`DEFAULT_CONFIG_FILE`] when it
    /// exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Credential check performed once before any pipeline work
    pub fn validate_credentials(&self) -> Result<(), LaunchError> {
        if self.llm.provider.requires_api_key() && self.llm.api_key.trim().is_empty() {
            return Err(LaunchError::MissingCredential {
                provider: self.llm.provider.to_string(),
            });
        }
        Ok(())
    }
}

impl LLMConfig {
    /// Base URL set by the user, if it differs from the Groq default.
    ///
    /// Providers other than the OpenAI compatible one keep their own endpoint
    /// unless this returns `Some`.
    pub fn custom_base_url(&self) -> Option<&str> {
        let url = self.api_base_url.trim();
        if url.is_empty() || url == DEFAULT_API_BASE_URL {
            None
        } else {
            Some(url)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_case_count: 3,
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            news: NewsConfig::default(),
            export: ExportConfig::default(),
            skip_connection_check: false,
            verbose: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            model: String::from("llama-3.1-8b-instant"),
            max_tokens: 4096,
            temperature: 0.7,
            planning_temperature: 0.1,
            retry_attempts: 2,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            retry_attempts: 2,
            retry_delay_ms: 2000,
            timeout_seconds: 10,
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            ),
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("NEWS_API_KEY").ok().filter(|k| !k.is_empty()),
            max_articles: 5,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: PathBuf::from("./radar.reports"),
            json: true,
            report: true,
        }
    }
}
