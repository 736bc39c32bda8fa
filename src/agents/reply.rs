//! Reply Agent
//!
//! Answers a question against the processed document context. The question
//! is classified by keyword into a [`QuestionCategory`], which picks the
//! prompt template.

use crate::llm::LLM;
use crate::models::QuestionCategory;
use crate::types::{AppError, AppResult};
use tracing::{error, info};

const DETAILED_KEYWORDS: [&str; 4] = ["explain", "detail", "in-depth", "elaborate"];
const SUMMARY_KEYWORDS: [&str; 3] = ["summarize", "brief", "short"];
const COMPARISON_KEYWORDS: [&str; 2] = ["compare", "contrast"];

pub struct ReplyAgent;

impl ReplyAgent {
    /// Classify a question by case-insensitive keyword containment.
    ///
    /// Groups are checked in order (detailed, summary, comparison) and the
    /// first hit wins; anything else is general.
    pub fn classify(question: &str) -> QuestionCategory {
        let question_lower = question.to_lowercase();
        let matches_any = |keywords: &[&str]| keywords.iter().any(|k| question_lower.contains(k));

        if matches_any(&DETAILED_KEYWORDS[..]) {
            QuestionCategory::Detailed
        } else if matches_any(&SUMMARY_KEYWORDS[..]) {
            QuestionCategory::Summary
        } else if matches_any(&COMPARISON_KEYWORDS[..]) {
            QuestionCategory::Comparison
        } else {
            QuestionCategory::General
        }
    }

    /// Compose the answer prompt for `category`, embedding context and question verbatim.
    pub fn build_prompt(question: &str, context: &str, category: QuestionCategory) -> String {
        let lead_in = match category {
            QuestionCategory::Detailed => "Provide a detailed explanation based on the context:",
            QuestionCategory::Summary => "Provide a brief summary based on the context:",
            QuestionCategory::Comparison => "Compare and contrast based on the context:",
            QuestionCategory::General => "Answer the following question based on the context:",
        };
        format!("{} {} Question: {}", lead_in, context, question)
    }

    pub async fn answer(
        llm: &LLM,
        question: &str,
        context: &str,
        category: QuestionCategory,
    ) -> AppResult<String> {
        info!(
            question_len = question.len(),
            context_len = context.len(),
            category = %category,
            "Generating answer"
        );

        let prompt = Self::build_prompt(question, context, category);
        match llm.generate(&prompt).await {
            Ok(answer) => {
                info!(response_len = answer.len(), "Generated answer successfully");
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, "Answer generation failed");
                Err(AppError::Answer(Box::new(e)))
            }
        }
    }

    /// Classify, then answer.
    pub async fn ask(llm: &LLM, question: &str, context: &str) -> AppResult<(QuestionCategory, String)> {
        let category = Self::classify(question);
        let answer = Self::answer(llm, question, context, category).await?;
        Ok((category, answer))
    }
}
