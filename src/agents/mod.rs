//! Agent System
//!
//! The two model-backed steps of the assistant and the session glue around
//! them:
//!
//! - **Analysis Agent**: chunks the extracted text and builds the context
//! - **Reply Agent**: classifies a question and answers it from the context
//!
//! ## Pipeline Overview
//!
//! ```text
//! Document ──extract──▶ text
//!                        │
//!                        ▼
//!                 ┌─────────────┐
//!                 │  Analysis   │  → one model call per chunk
//!                 │   Agent     │
//!                 └─────────────┘
//!                        │ context (replaces session context, clears history)
//!                        ▼
//! Question ──────▶┌─────────────┐
//!                 │   Reply     │  → classify, prompt, one model call
//!                 │   Agent     │
//!                 └─────────────┘
//!                        │
//!                        ▼
//!                 session history
//! ```

pub mod analysis;
pub mod reply;

pub use analysis::AnalysisAgent;
pub use reply::ReplyAgent;

use crate::config::ProcessingConfig;
use crate::llm::LLM;
use crate::models::{QAPair, Session};
use crate::types::{AppError, AppResult};
use tracing::{info, warn};

/// Analyse `text` and install the result as the session's context.
///
/// On failure the session is left exactly as it was.
pub async fn process_document(
    session: &mut Session,
    llm: &LLM,
    text: &str,
    options: &ProcessingConfig,
) -> AppResult<()> {
    let context = AnalysisAgent::process(llm, text, options).await?;
    session.replace_context(context);
    info!(session_id = %session.id, "Session context replaced, history cleared");
    Ok(())
}

/// Answer `question` against the session context and append it to history.
///
/// The question is embedded and stored exactly as given. A failed answer is
/// not recorded.
pub async fn answer_question<'a>(
    session: &'a mut Session,
    llm: &LLM,
    question: &str,
) -> AppResult<&'a QAPair> {
    if question.trim().is_empty() {
        return Err(AppError::InvalidRequest("question is empty".to_string()));
    }
    let context = match session.context() {
        Some(context) if !context.is_empty() => context,
        _ => {
            warn!(session_id = %session.id, "Question asked before a document was processed");
            return Err(AppError::InvalidRequest(
                "no processed document to answer from".to_string(),
            ));
        }
    };

    let (category, answer) = ReplyAgent::ask(llm, question, context).await?;
    session.record(QAPair::new(question, answer, category));
    info!(
        session_id = %session.id,
        history_len = session.history().len(),
        category = %category,
        "Question answered"
    );

    session
        .history()
        .last()
        .ok_or_else(|| AppError::InvalidRequest("history unexpectedly empty".to_string()))
}
