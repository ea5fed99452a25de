use thiserror::Error;

/// Failure of the text generation capability
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("unparsable structured output: {message}")]
    Unparsable { message: String, excerpt: String },
}

impl From<anyhow::Error> for GenerationError {
    fn from(err: anyhow::Error) -> Self {
        GenerationError::Provider(format!("{:#}", err))
    }
}

/// Failure of a single upstream search call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited (status {status})")]
    RateLimited { status: u16 },

    #[error("parse error: {0}")]
    Parse(String),
}

impl SearchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SearchError::RateLimited { .. })
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Parse(err.to_string())
    }
}

/// Conditions that stop a run before the pipeline starts
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no API key configured for LLM provider `{provider}`")]
    MissingCredential { provider: String },

    #[error("company name must not be empty")]
    EmptyCompany,
}
