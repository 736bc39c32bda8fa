// doc-qa - Ask questions about PDF, DOCX and text documents with an LLM

pub mod config;
pub mod models;
pub mod types;
pub mod documents; // Text extraction and chunking
pub mod agents;
pub mod llm;
pub mod utils;
pub mod tui; // Terminal User Interface

// Re-exports for convenience
pub use config::Config;
pub use models::{QAPair, QuestionCategory, Session};
pub use types::{AppError, AppResult};
