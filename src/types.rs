// Type definitions and enums

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LLMProvider {
    Google,
}

impl LLMProvider {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "google" | "gemini" => Some(LLMProvider::Google),
            _ => None,
        }
    }
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Google => write!(f, "google"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub provider: String,
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: String,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Failed to process document (chunk {chunk}): {source}")]
    Processing {
        chunk: usize,
        #[source]
        source: Box<AppError>,
    },

    #[error("Failed to get answer: {0}")]
    Answer(#[source] Box<AppError>),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_id() {
        assert_eq!(LLMProvider::from_id("google"), Some(LLMProvider::Google));
        assert_eq!(LLMProvider::from_id("Gemini"), Some(LLMProvider::Google));
        assert_eq!(LLMProvider::from_id("openai"), None);
    }

    #[test]
    fn test_wrapped_errors_keep_cause_in_message() {
        let err = AppError::Processing {
            chunk: 3,
            source: Box::new(AppError::LLMApi("quota exceeded".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("chunk 3"));
        assert!(message.contains("quota exceeded"));

        let err = AppError::Answer(Box::new(AppError::LLMApi("timeout".to_string())));
        assert_eq!(err.to_string(), "Failed to get answer: LLM API error: timeout");
    }
}
