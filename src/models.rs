use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Prompt template family chosen for a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Detailed,
    Summary,
    Comparison,
    General,
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionCategory::Detailed => write!(f, "detailed"),
            QuestionCategory::Summary => write!(f, "summary"),
            QuestionCategory::Comparison => write!(f, "comparison"),
            QuestionCategory::General => write!(f, "general"),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QAPair {
    pub question: String,
    pub answer: String,
    pub category: QuestionCategory,
    pub answered_at: DateTime<Utc>,
}

impl QAPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, category: QuestionCategory) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category,
            answered_at: Utc::now(),
        }
    }
}

/// State of one interactive session.
///
/// The history is cleared exactly when a new context replaces the old one,
/// and only grows otherwise.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    context: Option<String>,
    history: Vec<QAPair>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            context: None,
            history: Vec::new(),
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// True once a processed document with non-empty context is available.
    pub fn is_ready(&self) -> bool {
        self.context.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn history(&self) -> &[QAPair] {
        &self.history
    }

    /// Install a freshly processed context and start a new history.
    pub fn replace_context(&mut self, context: String) {
        self.context = Some(context);
        self.history.clear();
    }

    pub fn record(&mut self, pair: QAPair) {
        self.history.push(pair);
    }
}
