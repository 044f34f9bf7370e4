use anyhow::Result;

/// One chat completion
#[derive(Debug, Clone, PartialEq)]
pub struct LlmChatCompletion {
    pub llm_name: String,
    pub content: String,
    pub token_cost: u32,
}

/// Minimal chat completion trait the oracles are written against
#[async_trait::async_trait]
pub trait LlmChatClient: Send + Sync + std::fmt::Debug {
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<LlmChatCompletion>;
}
