//! Text generation capability and its rig-backed implementation

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GenerationError;

pub mod client;

pub use client::LLMClient;

/// Text generation capability consumed by the pipeline
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// Free-form completion for a system/user prompt pair
    async fn generate_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError>;

    /// Completion parsed as JSON, tolerating code fences and surrounding prose
    async fn generate_structured(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Value, GenerationError> {
        let raw = self.generate_text(system_prompt, user_prompt).await?;
        client::utils::parse_structured_output(&raw)
    }
}
