use async_trait::async_trait;
use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMMessage, LLMProvider, LLMRequest, LLMResponse};
use tracing::debug;

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Configuration for LLM provider
pub struct LLMProviderConfig {
    pub name: String,
    pub api_key: String,
    pub api_base: Option<String>,
}

/// A remote model bound to one provider and one model identifier.
pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    provider_name: String,
    model: String,
}

impl LLM {
    pub fn new(provider: LLMProviderConfig, model: impl Into<String>) -> AppResult<Self> {
        let adapter: Box<dyn LLMAdapter> = match LLMProvider::from_id(&provider.name) {
            Some(LLMProvider::Google) => match provider.api_base.as_deref() {
                Some(base) => Box::new(crate::llm::google::GoogleAdapter::with_api_base(&provider.api_key, base)),
                None => Box::new(crate::llm::google::GoogleAdapter::new(&provider.api_key)),
            },
            None => {
                return Err(AppError::Configuration(format!(
                    "Unsupported provider: {}",
                    provider.name
                )))
            }
        };

        Ok(Self {
            adapter,
            provider_name: provider.name,
            model: model.into(),
        })
    }

    pub fn from_config(config: &LLMConfig) -> AppResult<Self> {
        Self::new(
            LLMProviderConfig {
                name: config.provider.to_string(),
                api_key: config.api_key.clone(),
                api_base: Some(config.api_base.clone()),
            },
            config.model.clone(),
        )
    }

    /// Wrap an arbitrary adapter, e.g. a stub in tests.
    pub fn with_adapter(adapter: Box<dyn LLMAdapter>, provider_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            adapter,
            provider_name: provider_name.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }

    /// Send a single user prompt to the configured model and return its text.
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = LLMRequest {
            provider: self.provider_name.clone(),
            model: self.model.clone(),
            messages: vec![LLMMessage::user(prompt)],
            max_tokens: None,
            temperature: None,
            system_instruction: None,
        };

        let response = self.create_chat_completion(&request).await?;
        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            response_len = response.content.len(),
            total_tokens = response.usage.total_tokens,
            "Model call complete"
        );
        Ok(response.content)
    }
}
