//! Progress Widget
//!
//! Displays the document pipeline: Load → Analyze → Ready → Answer.

use crate::tui::app::{LoadedDocument, PipelineStage};
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const STAGE_NAMES: [&str; 4] = ["Load", "Analyze", "Ready", "Answer"];

/// Render the progress indicator
pub fn render_progress(
    frame: &mut Frame,
    area: Rect,
    stage: &PipelineStage,
    document: Option<&LoadedDocument>,
    has_context: bool,
) {
    let block = Block::default()
        .title(" Document ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();

    // Document line
    if let Some(doc) = document {
        let detail = format!("{} ({}, {} chars)", doc.filename, doc.format_tag, doc.char_count());
        lines.push(Line::from(vec![
            Span::styled("File: ", Theme::text_secondary()),
            Span::styled(
                truncate_string(&detail, (inner.width as usize).saturating_sub(6)),
                Theme::text(),
            ),
        ]));
    } else {
        lines.push(Line::from(vec![Span::styled(
            "No document loaded",
            Theme::text_dim(),
        )]));
    }

    let states = stage_states(stage, document.is_some(), has_context);
    let mut spans = build_progress_line(&states);
    if let PipelineStage::Analyzing { done, total } = stage {
        if *total > 0 {
            spans.push(Span::styled(
                format!("   chunk {}/{}", done, total),
                Theme::text_secondary(),
            ));
        }
    }
    lines.push(Line::from(spans));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Build the progress line with stage indicators
fn build_progress_line(states: &[StageState; 4]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, (name, state)) in STAGE_NAMES.iter().zip(states).enumerate() {
        let (icon, style) = match state {
            StageState::Complete => (Icons::COMPLETE, Theme::complete()),
            StageState::Active => (Icons::ACTIVE, Theme::active()),
            StageState::Pending => (Icons::PENDING, Theme::pending()),
            StageState::Error => (Icons::ERROR, Theme::error()),
        };

        spans.push(Span::styled(format!("{} ", icon), style));
        spans.push(Span::styled(name.to_string(), style));

        if i < STAGE_NAMES.len() - 1 {
            spans.push(Span::styled(format!(" {} ", Icons::ARROW), Theme::text_dim()));
        }
    }

    spans
}

/// State of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq)]
enum StageState {
    Pending,
    Active,
    Complete,
    Error,
}

impl StageState {
    fn done_if(flag: bool) -> Self {
        if flag {
            StageState::Complete
        } else {
            StageState::Pending
        }
    }
}

fn stage_states(stage: &PipelineStage, has_document: bool, has_context: bool) -> [StageState; 4] {
    let mut states = [
        StageState::done_if(has_document),
        StageState::done_if(has_context),
        StageState::done_if(has_context),
        StageState::Pending,
    ];

    match stage {
        PipelineStage::Extracting => states[0] = StageState::Active,
        PipelineStage::Analyzing { .. } => states[1] = StageState::Active,
        PipelineStage::Answering => states[3] = StageState::Active,
        PipelineStage::Error(_) => {
            // Blame the first stage that has not completed.
            let failed = states
                .iter()
                .position(|s| *s == StageState::Pending)
                .unwrap_or(states.len() - 1);
            states[failed] = StageState::Error;
        }
        PipelineStage::Idle | PipelineStage::Ready => {}
    }

    states
}

/// Truncate a string to fit within a given width
fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let head: String = s.chars().take(max_width - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max_width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StageState::*;

    #[test]
    fn test_stage_states_follow_pipeline() {
        assert_eq!(stage_states(&PipelineStage::Idle, false, false), [Pending; 4]);
        assert_eq!(
            stage_states(&PipelineStage::Extracting, false, false),
            [Active, Pending, Pending, Pending]
        );
        assert_eq!(
            stage_states(&PipelineStage::Analyzing { done: 1, total: 2 }, true, false),
            [Complete, Active, Pending, Pending]
        );
        assert_eq!(
            stage_states(&PipelineStage::Ready, true, true),
            [Complete, Complete, Complete, Pending]
        );
        assert_eq!(
            stage_states(&PipelineStage::Answering, true, true),
            [Complete, Complete, Complete, Active]
        );
    }

    #[test]
    fn test_error_marks_first_incomplete_stage() {
        let err = PipelineStage::Error("boom".to_string());
        assert_eq!(stage_states(&err, true, false), [Complete, Error, Pending, Pending]);
        assert_eq!(stage_states(&err, true, true), [Complete, Complete, Complete, Error]);
    }

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("résumé.pdf", 20), "résumé.pdf");
        assert_eq!(truncate_string("résumé.pdf", 7), "résu...");
    }
}
