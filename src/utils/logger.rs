// Logger initialization

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "doc_qa=info";
const LOG_FILE_PREFIX: &str = "doc-qa.log";

/// Where log output goes
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// Human-readable logs on stderr (one-shot CLI commands)
    Stderr,
    /// Daily rolling files in a directory (TUI mode, keeps the screen clean)
    File(PathBuf),
}

/// Default log directory for TUI sessions
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doc-qa")
        .join("logs")
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global tracing subscriber.
///
/// For [`LogTarget::File`] the returned guard must be held until exit so
/// buffered lines are flushed.
pub fn init_logger(target: LogTarget) -> anyhow::Result<Option<WorkerGuard>> {
    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
            Ok(None)
        }
        LogTarget::File(dir) => {
            let guard = init_file_logger(&dir)?;
            Ok(Some(guard))
        }
    }
}

fn init_file_logger(dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(guard)
}
