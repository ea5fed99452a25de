//! LLM client - a uniform interface over the configured provider

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::error::GenerationError;
use crate::llm::TextGeneration;

mod providers;
pub mod utils;

use providers::ProviderClient;

/// LLM client backed by one of the rig providers
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(config)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Same provider and model, different sampling temperature
    pub fn with_temperature(&self, temperature: f64) -> Self {
        let mut config = self.config.clone();
        config.temperature = temperature;
        Self {
            config,
            client: self.client.clone(),
        }
    }

    /// Same client, at most `attempts` provider calls per prompt
    pub fn with_retry_attempts(&self, attempts: u32) -> Self {
        let mut config = self.config.clone();
        config.retry_attempts = attempts.max(1);
        Self {
            config,
            client: self.client.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn temperature(&self) -> f64 {
        self.config.temperature
    }

    pub fn retry_attempts(&self) -> u32 {
        self.config.retry_attempts
    }

    /// Round-trip a trivial prompt to make sure the model is reachable
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 Checking model connection ({})...", self.config.model);
        match self
            .prompt_without_react("You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ Model connection OK");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ Model connection failed: {}", e);
                Err(e)
            }
        }
    }

    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    tracing::warn!(
                        attempt = retries,
                        max = max_retries,
                        error = %err,
                        "model call failed"
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// Single-turn prompt without tools
    pub async fn prompt_without_react(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String> {
        let agent = self.client.create_agent(system_prompt, &self.config);
        let timeout = Duration::from_secs(self.config.timeout_seconds);

        self.retry_with_backoff(|| async {
            tokio::time::timeout(timeout, agent.prompt(user_prompt))
                .await
                .map_err(|_| anyhow!("model call timed out after {:?}", timeout))?
        })
        .await
    }
}

#[async_trait]
impl TextGeneration for LLMClient {
    async fn generate_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let content = self.prompt_without_react(system_prompt, user_prompt).await?;
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(content)
    }
}
