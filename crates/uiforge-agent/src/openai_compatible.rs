use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uiforge_core::config::LlmSettings;

use crate::client::{LlmChatClient, LlmChatCompletion};

/// Client for any `/chat/completions` endpoint speaking the OpenAI wire format
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    pub name: String,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    headers: HashMap<String, String>,
    http_client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(
        name: impl Into<String>,
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            temperature: 0.2,
            max_tokens: 4096,
            headers: HashMap::new(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Build from config; the key is read from `settings.api_key_env` if set.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("{} is not set, sending unauthenticated requests", settings.api_key_env);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let mut client = Self::new("openai-compatible", api_key, &settings.base_url, &settings.model)
            .with_temperature(settings.temperature)
            .with_max_tokens(settings.max_tokens);
        client.http_client = http_client;
        Ok(client)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
        }
    }

    async fn request_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<(String, u32)> {
        let request = self.build_request(system_prompt, user_prompt);

        let mut builder = self
            .http_client
            .post(self.endpoint())
            .header("Content-Type", "application/json");

        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", api_key));
        }

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        let response = builder
            .json(&request)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat completion API error ({}): {}", status, error_text);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse chat completion response")?;

        Ok(completion.into_content())
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<UsageInfo>,
}

impl ChatCompletionResponse {
    fn into_content(self) -> (String, u32) {
        let tokens = self.usage.and_then(|u| u.total_tokens).unwrap_or(0);
        let content = self
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        (content, tokens)
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    total_tokens: Option<u32>,
}

#[async_trait::async_trait]
impl LlmChatClient for OpenAiCompatibleClient {
    async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<LlmChatCompletion> {
        let (content, tokens) = self.request_completion(system_prompt, user_prompt).await?;
        tracing::debug!("{} answered with {} tokens", self.name, tokens);
        Ok(LlmChatCompletion {
            llm_name: self.name.clone(),
            content,
            token_cost: tokens,
        })
    }
}
