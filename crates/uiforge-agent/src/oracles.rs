use async_trait::async_trait;
use std::sync::Arc;
use uiforge_core::oracle::{CodeRepairOracle, IrRepairOracle, IrSynthesisOracle, SynthesisRequest};
use uiforge_core::{CompileDiagnostic, OracleError};

use crate::client::LlmChatClient;
use crate::prompts::{
    code_repair_prompt, ir_repair_prompt, ir_synthesis_prompt, CODE_SYSTEM_PROMPT, IR_SYSTEM_PROMPT,
};

/// The three generative oracles on top of one chat client.
///
/// Answers are returned as-is; fence stripping and JSON extraction happen in
/// the core.
#[derive(Debug)]
pub struct LlmOracles<C> {
    client: Arc<C>,
}

impl<C> Clone for LlmOracles<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: LlmChatClient> LlmOracles<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn ask(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError> {
        let completion = self
            .client
            .chat_completion(system_prompt, user_prompt)
            .await
            .map_err(|e| OracleError::Transport(format!("{:#}", e)))?;

        if completion.content.trim().is_empty() {
            tracing::warn!("{} returned an empty answer", completion.llm_name);
            return Err(OracleError::EmptyResponse);
        }
        Ok(completion.content)
    }
}

#[async_trait]
impl<C: LlmChatClient> IrSynthesisOracle for LlmOracles<C> {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<String, OracleError> {
        self.ask(IR_SYSTEM_PROMPT, &ir_synthesis_prompt(request)).await
    }
}

#[async_trait]
impl<C: LlmChatClient> IrRepairOracle for LlmOracles<C> {
    async fn repair_ir(&self, raw_json: &str, errors: &[String]) -> Result<String, OracleError> {
        self.ask(IR_SYSTEM_PROMPT, &ir_repair_prompt(raw_json, errors)).await
    }
}

#[async_trait]
impl<C: LlmChatClient> CodeRepairOracle for LlmOracles<C> {
    async fn repair_code(
        &self,
        source: &str,
        diagnostic: &CompileDiagnostic,
    ) -> Result<String, OracleError> {
        self.ask(CODE_SYSTEM_PROMPT, &code_repair_prompt(source, diagnostic)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmChatCompletion;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct MockClient {
        answer: Option<String>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl LlmChatClient for MockClient {
        async fn chat_completion(
            &self,
            system_prompt: &str,
            user_prompt: &str,
        ) -> anyhow::Result<LlmChatCompletion> {
            self.prompts
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            match &self.answer {
                Some(content) => Ok(LlmChatCompletion {
                    llm_name: "mock".to_string(),
                    content: content.clone(),
                    token_cost: 10,
                }),
                None => anyhow::bail!("connection refused"),
            }
        }
    }

    fn oracles(answer: Option<&str>) -> LlmOracles<MockClient> {
        LlmOracles::new(MockClient {
            answer: answer.map(str::to_string),
            ..MockClient::default()
        })
    }

    #[tokio::test]
    async fn test_synthesis_returns_raw_answer() {
        let oracles = oracles(Some("```json\n{}\n```"));
        let answer = oracles
            .synthesize(&SynthesisRequest::new("HeroBanner", "big title"))
            .await
            .unwrap();
        assert_eq!(answer, "```json\n{}\n```");

        let prompts = oracles.client().prompts.lock().unwrap();
        assert_eq!(prompts[0].0, IR_SYSTEM_PROMPT);
        assert!(prompts[0].1.contains("Component name: HeroBanner"));
    }

    #[tokio::test]
    async fn test_ir_repair_sends_errors() {
        let oracles = oracles(Some("{}"));
        let errors = vec!["layout: unknown value \"masonry\"".to_string()];
        oracles.repair_ir("{\"layout\":\"masonry\"}", &errors).await.unwrap();

        let prompts = oracles.client().prompts.lock().unwrap();
        assert!(prompts[0].1.contains("1. layout: unknown value"));
    }

    #[tokio::test]
    async fn test_code_repair_uses_code_prompt() {
        let oracles = oracles(Some("<section></section>"));
        let diagnostic = CompileDiagnostic::new("Unexpected EOF");
        let fixed = oracles.repair_code("<section>", &diagnostic).await.unwrap();
        assert_eq!(fixed, "<section></section>");

        let prompts = oracles.client().prompts.lock().unwrap();
        assert_eq!(prompts[0].0, CODE_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_empty_answer() {
        let err = oracles(Some("  \n")).repair_code("x", &CompileDiagnostic::new("e")).await.unwrap_err();
        assert_eq!(err, OracleError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let err = oracles(None)
            .synthesize(&SynthesisRequest::new("HeroBanner", "x"))
            .await
            .unwrap_err();
        assert_eq!(err, OracleError::Transport("connection refused".to_string()));
    }
}
