//! Analysis Agent
//!
//! First pass over a document: every chunk is sent to the model with a fixed
//! analysis prompt and the replies are joined into the context used for
//! answering questions.

use crate::config::ProcessingConfig;
use crate::documents::chunk_text;
use crate::llm::LLM;
use crate::types::{AppError, AppResult};
use futures::StreamExt;
use tracing::{debug, info};

pub const ANALYSIS_PROMPT: &str = "Analyze this document chunk: ";

pub struct AnalysisAgent;

impl AnalysisAgent {
    pub fn analysis_prompt(chunk: &str) -> String {
        format!("{}{}", ANALYSIS_PROMPT, chunk)
    }

    /// Analyse `text` chunk by chunk and return the space-joined replies.
    pub async fn process(llm: &LLM, text: &str, options: &ProcessingConfig) -> AppResult<String> {
        Self::process_with_progress(llm, text, options, |_, _| {}).await
    }

    /// Like [`AnalysisAgent::process`], calling `on_progress(done, total)`
    /// after each chunk.
    ///
    /// With `analysis_concurrency` above one, up to that many calls are in
    /// flight at once; replies are still joined in chunk order. Any failed
    /// call aborts the whole pass.
    pub async fn process_with_progress<F>(
        llm: &LLM,
        text: &str,
        options: &ProcessingConfig,
        mut on_progress: F,
    ) -> AppResult<String>
    where
        F: FnMut(usize, usize) + Send,
    {
        // Owned, so the stream stays `Send` inside a spawned task.
        let chunks: Vec<String> = chunk_text(text, options.max_chunk_size)
            .into_iter()
            .map(str::to_string)
            .collect();
        let total = chunks.len();
        info!(
            chars = text.chars().count(),
            chunks = total,
            concurrency = options.analysis_concurrency,
            "Starting document analysis"
        );

        let mut replies = futures::stream::iter(chunks.into_iter().enumerate().map(|(index, chunk)| async move {
            let prompt = Self::analysis_prompt(&chunk);
            llm.generate(&prompt).await.map_err(|e| AppError::Processing {
                chunk: index + 1,
                source: Box::new(e),
            })
        }))
        .buffered(options.analysis_concurrency.max(1));

        let mut responses = Vec::with_capacity(total);
        while let Some(reply) = replies.next().await {
            responses.push(reply?);
            debug!(chunk = responses.len(), total, "Chunk analysed");
            on_progress(responses.len(), total);
        }

        let context = responses.join(" ");
        info!(context_len = context.len(), "Document analysis complete");
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::StubAdapter;

    fn options(max_chunk_size: usize) -> ProcessingConfig {
        ProcessingConfig {
            max_chunk_size,
            analysis_concurrency: 1,
        }
    }

    #[tokio::test]
    async fn test_replies_joined_in_chunk_order() {
        let (stub, prompts) = StubAdapter::scripted(vec![Ok("X"), Ok("Y")]);
        let llm = stub.into_llm();

        let context = AnalysisAgent::process(&llm, "abcd", &options(2)).await.unwrap();

        assert_eq!(context, "X Y");
        assert_eq!(
            *prompts.lock().unwrap(),
            vec![
                "Analyze this document chunk: ab".to_string(),
                "Analyze this document chunk: cd".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_one_call_per_chunk() {
        let (stub, prompts) = StubAdapter::echo();
        let llm = stub.into_llm();
        let text = "z".repeat(4001);

        let mut progress = Vec::new();
        AnalysisAgent::process_with_progress(&llm, &text, &ProcessingConfig::default(), |done, total| {
            progress.push((done, total))
        })
        .await
        .unwrap();

        assert_eq!(prompts.lock().unwrap().len(), 3);
        assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_calls() {
        let (stub, prompts) = StubAdapter::echo();
        let llm = stub.into_llm();

        let context = AnalysisAgent::process(&llm, "", &options(10)).await.unwrap();
        assert_eq!(context, "");
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_aborts_without_partial_result() {
        let (stub, prompts) = StubAdapter::scripted(vec![Ok("X"), Err("quota exceeded"), Ok("Z")]);
        let llm = stub.into_llm();

        let err = AnalysisAgent::process(&llm, "aabbcc", &options(2)).await.unwrap_err();

        match err {
            AppError::Processing { chunk, source } => {
                assert_eq!(chunk, 2);
                assert!(source.to_string().contains("quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // Sequential mode stops at the failing chunk.
        assert_eq!(prompts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_runs_inside_spawned_task() {
        let (stub, _prompts) = StubAdapter::scripted(vec![Ok("first"), Ok("second")]);
        let llm = std::sync::Arc::new(stub.into_llm());

        let handle = tokio::spawn(async move {
            AnalysisAgent::process_with_progress(&llm, "abcd", &options(2), |_, _| {}).await
        });

        assert_eq!(handle.await.unwrap().unwrap(), "first second");
    }

    #[tokio::test]
    async fn test_concurrent_mode_preserves_order() {
        let (stub, _prompts) = StubAdapter::echo();
        let llm = stub.into_llm();
        let opts = ProcessingConfig {
            max_chunk_size: 1,
            analysis_concurrency: 4,
        };

        let context = AnalysisAgent::process(&llm, "abcdef", &opts).await.unwrap();
        let expected: Vec<String> = "abcdef"
            .chars()
            .map(|c| format!("Analyze this document chunk: {c}"))
            .collect();
        assert_eq!(context, expected.join(" "));
    }
}
