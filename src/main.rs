use clap::{Parser, Subcommand};
use doc_qa::agents::{self, AnalysisAgent};
use doc_qa::documents::Document;
use doc_qa::llm::LLM;
use doc_qa::utils::{default_log_dir, init_logger, LogTarget};
use doc_qa::{Config, Session};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "doc-qa", version, about = "Ask questions about a PDF, DOCX or text document")]
struct Cli {
    /// JSON config file (defaults to ./config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal interface (default)
    Tui {
        /// Document to load on start
        file: Option<PathBuf>,
    },
    /// Process a document and print the resulting context
    Process { file: PathBuf },
    /// Process a document once, then answer each question in order
    Ask {
        file: PathBuf,
        #[arg(required = true)]
        questions: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui { file: None });

    // The TUI owns the screen, so its logs go to a file.
    let target = match command {
        Command::Tui { .. } => LogTarget::File(default_log_dir()),
        _ => LogTarget::Stderr,
    };
    let _guard = init_logger(target)?;

    let config = Config::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    info!(model = %config.llm.model, provider = %config.llm.provider, "Configuration loaded");

    let llm = LLM::from_config(&config.llm)?;

    match command {
        Command::Tui { file } => doc_qa::tui::run(config, llm, file).await,
        Command::Process { file } => {
            let text = load_text(&file).await?;
            let context = AnalysisAgent::process(&llm, &text, &config.processing).await?;
            println!("{}", context);
            Ok(())
        }
        Command::Ask { file, questions } => {
            let text = load_text(&file).await?;
            let mut session = Session::new();
            agents::process_document(&mut session, &llm, &text, &config.processing).await?;
            println!("Document processed successfully!\n");

            for (i, question) in questions.iter().enumerate() {
                match agents::answer_question(&mut session, &llm, question).await {
                    Ok(pair) => {
                        println!("Question {}: {}", i + 1, pair.question);
                        println!("Answer {}: {}\n", i + 1, pair.answer);
                    }
                    Err(e) => {
                        error!(error = %e, "Question failed");
                        eprintln!("Question {}: {}", i + 1, question);
                        eprintln!("{}\n", e);
                    }
                }
            }
            Ok(())
        }
    }
}

async fn load_text(path: &Path) -> anyhow::Result<String> {
    let document = Document::from_path(path).await?;
    let text = tokio::task::spawn_blocking(move || document.extract_text()).await??;
    Ok(text)
}
