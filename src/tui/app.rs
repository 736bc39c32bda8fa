//! Application State
//!
//! Owns the session and drives the load → process → ask flow. Model calls
//! run on spawned tasks and report back through [`AppEvent`]s; only this
//! struct ever mutates the session.

use crate::agents::{AnalysisAgent, ReplyAgent};
use crate::config::Config;
use crate::documents::Document;
use crate::llm::LLM;
use crate::models::{QAPair, Session};
use crate::tui::event::AppAction;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tui_textarea::TextArea;

const QUESTION_PLACEHOLDER: &str = "Type your question here...";

/// Pipeline stage
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipelineStage {
    /// Idle, waiting for input
    #[default]
    Idle,
    /// Reading and extracting a document
    Extracting,
    /// Running the analysis pass
    Analyzing { done: usize, total: usize },
    /// Context available, waiting for questions
    Ready,
    /// Waiting for the model's answer
    Answering,
    /// Error occurred
    Error(String),
}

impl PipelineStage {
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            PipelineStage::Extracting | PipelineStage::Analyzing { .. } | PipelineStage::Answering
        )
    }
}

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Chat,
    /// Path prompt for loading a document
    Open,
    Help,
}

/// One-line status shown above the history
#[derive(Debug, Clone, PartialEq)]
pub enum Banner {
    Info(String),
    Success(String),
    Warning(String),
    Error(String),
}

/// A document whose text has been extracted but not necessarily processed
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub filename: String,
    pub format_tag: String,
    pub text: String,
}

impl LoadedDocument {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    DocumentLoaded(LoadedDocument),
    ExtractionFailed(String),
    ChunkAnalyzed { done: usize, total: usize },
    ProcessingComplete(String),
    ProcessingFailed(String),
    AnswerComplete(QAPair),
    AnswerFailed(String),
}

/// Main application state
pub struct App {
    pub config: Config,
    llm: Arc<LLM>,

    // UI State
    pub view: View,
    pub should_quit: bool,
    pub banner: Option<Banner>,

    // Document and session
    pub document: Option<LoadedDocument>,
    pub session: Session,
    pub pending_question: Option<String>,

    // Input State
    pub input: TextArea<'static>,
    pub path_input: String,
    pub scroll_offset: u16,
    pub max_scroll: u16,

    pub stage: PipelineStage,

    // Async communication
    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, llm: Arc<LLM>) -> Self {
        let (tx, rx) = mpsc::channel(100);

        Self {
            config,
            llm,
            view: View::Chat,
            should_quit: false,
            banner: Some(Banner::Info(
                "Press Ctrl+O to load a PDF, DOCX or TXT file.".to_string(),
            )),
            document: None,
            session: Session::new(),
            pending_question: None,
            input: Self::new_question_input(),
            path_input: String::new(),
            scroll_offset: 0,
            max_scroll: 0,
            stage: PipelineStage::Idle,
            event_rx: rx,
            event_tx: tx,
        }
    }

    fn new_question_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(QUESTION_PLACEHOLDER);
        input
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Drain events from background tasks
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Apply an event from a background task
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::DocumentLoaded(document) => {
                let chars = document.char_count();
                self.banner = Some(if chars == 0 {
                    Banner::Warning(format!(
                        "No text found in {} (empty or unsupported format).",
                        document.filename
                    ))
                } else {
                    Banner::Info(format!(
                        "Loaded {} ({} characters). Press Ctrl+P to process it.",
                        document.filename, chars
                    ))
                });
                self.document = Some(document);
                self.stage = self.settled_stage();
            }
            AppEvent::ExtractionFailed(message) => {
                self.banner = Some(Banner::Error(format!("Failed to load document: {}", message)));
                self.stage = PipelineStage::Error(message);
            }
            AppEvent::ChunkAnalyzed { done, total } => {
                self.stage = PipelineStage::Analyzing { done, total };
            }
            AppEvent::ProcessingComplete(context) => {
                self.session.replace_context(context);
                self.banner = Some(Banner::Success("Document processed successfully!".to_string()));
                self.stage = PipelineStage::Ready;
                self.scroll_offset = 0;
            }
            AppEvent::ProcessingFailed(message) => {
                self.banner = Some(Banner::Error(message.clone()));
                self.stage = PipelineStage::Error(message);
            }
            AppEvent::AnswerComplete(pair) => {
                self.session.record(pair);
                self.pending_question = None;
                self.banner = None;
                self.stage = PipelineStage::Ready;
                self.scroll_to_bottom();
            }
            AppEvent::AnswerFailed(message) => {
                self.pending_question = None;
                self.banner = Some(Banner::Error(message.clone()));
                self.stage = PipelineStage::Error(message);
            }
        }
    }

    /// Stage to fall back to once nothing is running
    fn settled_stage(&self) -> PipelineStage {
        if self.session.is_ready() {
            PipelineStage::Ready
        } else {
            PipelineStage::Idle
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::Submit => match self.view {
                View::Open => {
                    let path = std::mem::take(&mut self.path_input);
                    self.view = View::Chat;
                    self.load_document(PathBuf::from(path.trim()));
                }
                View::Chat => self.submit_question(),
                View::Help => self.view = View::Chat,
            },
            AppAction::OpenDocument => {
                if self.reject_if_busy() {
                    return;
                }
                self.path_input.clear();
                self.view = View::Open;
            }
            AppAction::ProcessDocument => self.process_document(),
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Chat
                } else {
                    View::Help
                };
            }
            AppAction::Escape => {
                self.view = View::Chat;
                self.path_input.clear();
            }
            AppAction::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                if self.scroll_offset < self.max_scroll {
                    self.scroll_offset += 1;
                }
            }
            AppAction::ScrollPageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            AppAction::ScrollPageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
            }
            AppAction::Input(key_event) => {
                self.handle_input(key_event);
            }
            AppAction::Tick => {}
        }
    }

    fn handle_input(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        match self.view {
            View::Open => match key.code {
                KeyCode::Char(c) => self.path_input.push(c),
                KeyCode::Backspace => {
                    self.path_input.pop();
                }
                _ => {}
            },
            View::Chat => {
                self.input.input(key);
            }
            View::Help => {
                self.view = View::Chat;
            }
        }
    }

    /// Processing and answering never overlap; refuse while something runs.
    fn reject_if_busy(&mut self) -> bool {
        if self.stage.is_busy() {
            self.banner = Some(Banner::Warning(
                "Still working on the previous request, please wait.".to_string(),
            ));
            true
        } else {
            false
        }
    }

    /// Read and extract a document in the background
    pub fn load_document(&mut self, path: PathBuf) {
        if self.reject_if_busy() {
            return;
        }
        if path.as_os_str().is_empty() {
            self.banner = Some(Banner::Warning("No file path given.".to_string()));
            return;
        }

        info!(path = %path.display(), "Loading document");
        self.stage = PipelineStage::Extracting;
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match Self::extract(path).await {
                Ok(document) => AppEvent::DocumentLoaded(document),
                Err(e) => {
                    error!(error = %e, "Document extraction failed");
                    AppEvent::ExtractionFailed(e.to_string())
                }
            };
            tx.send(event).await.ok();
        });
    }

    async fn extract(path: PathBuf) -> anyhow::Result<LoadedDocument> {
        let document = Document::from_path(&path).await?;
        let filename = document.filename.clone();
        let format_tag = document.format_tag.clone();
        let text = tokio::task::spawn_blocking(move || document.extract_text()).await??;
        Ok(LoadedDocument {
            filename,
            format_tag,
            text,
        })
    }

    /// Run the analysis pass over the loaded document in the background
    pub fn process_document(&mut self) {
        if self.reject_if_busy() {
            return;
        }
        let Some(document) = &self.document else {
            self.banner = Some(Banner::Warning(
                "Load a document first (Ctrl+O).".to_string(),
            ));
            return;
        };

        info!(filename = %document.filename, "Processing document");
        let text = document.text.clone();
        let llm = self.llm.clone();
        let options = self.config.processing;
        let tx = self.event_tx.clone();

        self.stage = PipelineStage::Analyzing { done: 0, total: 0 };
        self.banner = Some(Banner::Info("Processing document...".to_string()));

        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let result = AnalysisAgent::process_with_progress(&llm, &text, &options, |done, total| {
                // Progress is cosmetic; drop updates if the UI lags behind.
                let _ = progress_tx.try_send(AppEvent::ChunkAnalyzed { done, total });
            })
            .await;

            let event = match result {
                Ok(context) => AppEvent::ProcessingComplete(context),
                Err(e) => {
                    error!(error = %e, "Document processing failed");
                    AppEvent::ProcessingFailed(e.to_string())
                }
            };
            tx.send(event).await.ok();
        });
    }

    /// Submit the question in the input box
    pub fn submit_question(&mut self) {
        let question = self.input.lines().join("\n");
        if question.trim().is_empty() {
            return;
        }
        if self.reject_if_busy() {
            return;
        }
        let context = match self.session.context() {
            Some(context) if !context.is_empty() => context.to_string(),
            _ => {
                warn!("Question submitted without a processed document");
                self.banner = Some(Banner::Warning(
                    "Process a document first (Ctrl+O to load, Ctrl+P to process).".to_string(),
                ));
                return;
            }
        };

        self.input = Self::new_question_input();
        self.pending_question = Some(question.clone());
        self.stage = PipelineStage::Answering;
        self.banner = None;
        self.scroll_to_bottom();

        let llm = self.llm.clone();
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let event = match ReplyAgent::ask(&llm, &question, &context).await {
                Ok((category, answer)) => AppEvent::AnswerComplete(QAPair::new(question, answer, category)),
                Err(e) => AppEvent::AnswerFailed(e.to_string()),
            };
            tx.send(event).await.ok();
        });
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll;
    }

    /// Update max scroll based on content
    pub fn update_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.max_scroll = content_height.saturating_sub(viewport_height);
        if self.scroll_offset > self.max_scroll {
            self.scroll_offset = self.max_scroll;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::StubAdapter;
    use crate::config::{LLMConfig, ProcessingConfig};
    use crate::models::QuestionCategory;
    use crate::types::LLMProvider;

    fn test_app(stub: StubAdapter) -> App {
        let config = Config {
            llm: LLMConfig {
                provider: LLMProvider::Google,
                api_key: "test".to_string(),
                model: "stub-model".to_string(),
                api_base: "http://localhost".to_string(),
            },
            processing: ProcessingConfig::default(),
        };
        App::new(config, Arc::new(stub.into_llm()))
    }

    fn loaded(text: &str) -> LoadedDocument {
        LoadedDocument {
            filename: "notes.txt".to_string(),
            format_tag: "txt".to_string(),
            text: text.to_string(),
        }
    }

    async fn next_event(app: &mut App) -> AppEvent {
        app.event_rx.recv().await.expect("event channel closed")
    }

    #[test]
    fn test_processing_complete_replaces_context_and_clears_history() {
        let (stub, _) = StubAdapter::echo();
        let mut app = test_app(stub);
        app.handle_event(AppEvent::ProcessingComplete("old".to_string()));
        app.handle_event(AppEvent::AnswerComplete(QAPair::new("q", "a", QuestionCategory::General)));
        assert_eq!(app.session.history().len(), 1);

        app.handle_event(AppEvent::ProcessingComplete("new".to_string()));
        assert_eq!(app.session.context(), Some("new"));
        assert!(app.session.history().is_empty());
        assert_eq!(app.stage, PipelineStage::Ready);
        assert_eq!(
            app.banner,
            Some(Banner::Success("Document processed successfully!".to_string()))
        );
    }

    #[test]
    fn test_failures_leave_session_untouched() {
        let (stub, _) = StubAdapter::echo();
        let mut app = test_app(stub);
        app.handle_event(AppEvent::ProcessingComplete("ctx".to_string()));
        app.handle_event(AppEvent::AnswerComplete(QAPair::new("q", "a", QuestionCategory::General)));

        app.handle_event(AppEvent::AnswerFailed("Failed to get answer: boom".to_string()));
        app.handle_event(AppEvent::ProcessingFailed("Failed to process document: boom".to_string()));

        assert_eq!(app.session.context(), Some("ctx"));
        assert_eq!(app.session.history().len(), 1);
        assert!(matches!(app.banner, Some(Banner::Error(_))));
    }

    #[test]
    fn test_empty_document_warns() {
        let (stub, _) = StubAdapter::echo();
        let mut app = test_app(stub);
        app.handle_event(AppEvent::DocumentLoaded(loaded("")));
        assert!(matches!(app.banner, Some(Banner::Warning(_))));
        assert_eq!(app.stage, PipelineStage::Idle);
    }

    #[tokio::test]
    async fn test_process_then_ask_round_trip() {
        let (stub, prompts) = StubAdapter::scripted(vec![Ok("analysis"), Ok("the answer")]);
        let mut app = test_app(stub);
        app.handle_event(AppEvent::DocumentLoaded(loaded("Hello world")));

        app.process_document();
        assert!(app.stage.is_busy());
        loop {
            let event = next_event(&mut app).await;
            let done = matches!(event, AppEvent::ProcessingComplete(_));
            app.handle_event(event);
            if done {
                break;
            }
        }
        assert_eq!(app.session.context(), Some("analysis"));

        app.input.insert_str("Please summarize");
        app.submit_question();
        assert_eq!(app.stage, PipelineStage::Answering);
        assert_eq!(app.pending_question.as_deref(), Some("Please summarize"));

        let event = next_event(&mut app).await;
        app.handle_event(event);

        let history = app.session.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].answer, "the answer");
        assert_eq!(history[0].category, QuestionCategory::Summary);
        assert!(app.pending_question.is_none());
        assert!(prompts.lock().unwrap()[1].starts_with("Provide a brief summary based on the context: analysis"));
    }

    #[tokio::test]
    async fn test_busy_rejects_new_work() {
        let (stub, prompts) = StubAdapter::echo();
        let mut app = test_app(stub);
        app.handle_event(AppEvent::ProcessingComplete("ctx".to_string()));
        app.stage = PipelineStage::Analyzing { done: 1, total: 3 };

        app.input.insert_str("explain");
        app.submit_question();
        app.process_document();

        assert!(matches!(app.banner, Some(Banner::Warning(_))));
        assert!(app.pending_question.is_none());
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submitted_question_is_not_trimmed() {
        let (stub, prompts) = StubAdapter::scripted(vec![Ok("answer")]);
        let mut app = test_app(stub);
        app.handle_event(AppEvent::ProcessingComplete("ctx".to_string()));

        app.input.insert_str("  who wrote it? ");
        app.submit_question();
        assert_eq!(app.pending_question.as_deref(), Some("  who wrote it? "));

        let event = next_event(&mut app).await;
        app.handle_event(event);
        assert_eq!(app.session.history()[0].question, "  who wrote it? ");
        assert!(prompts.lock().unwrap()[0].ends_with("Question:   who wrote it? "));
    }

    #[tokio::test]
    async fn test_question_before_processing_is_refused() {
        let (stub, prompts) = StubAdapter::echo();
        let mut app = test_app(stub);
        app.input.insert_str("what is this?");
        app.submit_question();

        assert!(matches!(app.banner, Some(Banner::Warning(_))));
        assert_eq!(app.stage, PipelineStage::Idle);
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_document_from_disk() {
        let (stub, _) = StubAdapter::echo();
        let mut app = test_app(stub);
        let path = std::env::temp_dir().join(format!("doc-qa-tui-{}.txt", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "Some notes").await.unwrap();

        app.load_document(path.clone());
        assert_eq!(app.stage, PipelineStage::Extracting);
        let event = next_event(&mut app).await;
        app.handle_event(event);
        tokio::fs::remove_file(&path).await.ok();

        let document = app.document.as_ref().expect("document loaded");
        assert_eq!(document.text, "Some notes");
        assert_eq!(document.format_tag, "txt");
        assert_eq!(app.stage, PipelineStage::Idle);
    }
}
