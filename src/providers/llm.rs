//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Generates a completion from a system instruction and a user turn
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a reply
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
