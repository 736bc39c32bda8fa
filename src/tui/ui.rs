//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::tui::app::{App, Banner, PipelineStage, View};
use crate::tui::theme::{Icons, Theme};
use crate::tui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const INDENT: &str = "  ";

/// Render the main UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(4), // Progress
            Constraint::Min(10),   // History
            Constraint::Length(4), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    widgets::render_progress(
        frame,
        chunks[1],
        &app.stage,
        app.document.as_ref(),
        app.session.is_ready(),
    );
    render_history(frame, chunks[2], app);
    render_input(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);

    match app.view {
        View::Open => render_open_prompt(frame, app),
        View::Help => render_help(frame),
        View::Chat => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let dot_style = if app.session.is_ready() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title_text = vec![Line::from(vec![
        Span::raw("📄 "),
        Span::styled("Document Q&A", Theme::title()),
        Span::styled(format!(" · {}", app.model()), Theme::text_secondary()),
        Span::raw("  "),
        Span::styled("●", dot_style),
    ])];

    let title = Paragraph::new(title_text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(title, area);
}

/// Render the banner and the question/answer history
fn render_history(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .title(" Questions & Answers ")
        .borders(Borders::ALL)
        .border_style(if app.view == View::Chat {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let width = inner_area.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    if let Some(banner) = &app.banner {
        let (text, style) = match banner {
            Banner::Info(t) => (t, Theme::text_secondary()),
            Banner::Success(t) => (t, Theme::success()),
            Banner::Warning(t) => (t, Theme::warning()),
            Banner::Error(t) => (t, Theme::error()),
        };
        for piece in wrap_line(text, width) {
            lines.push(Line::from(Span::styled(piece.to_string(), style)));
        }
        lines.push(Line::from(""));
    }

    for (i, pair) in app.session.history().iter().enumerate() {
        push_entry(&mut lines, format!("Question {}:", i + 1), Theme::question(), &pair.question, width);
        push_entry(&mut lines, format!("Answer {}:", i + 1), Theme::answer(), &pair.answer, width);
        lines.push(Line::from(""));
    }

    if let Some(question) = &app.pending_question {
        let n = app.session.history().len() + 1;
        push_entry(&mut lines, format!("Question {}:", n), Theme::question(), question, width);
        lines.push(Line::from(vec![
            Span::styled(format!("Answer {}: ", n), Theme::answer()),
            Span::styled(Icons::CURSOR, Theme::active()),
        ]));
    }

    app.update_scroll_bounds(lines.len() as u16, inner_area.height);

    let paragraph = Paragraph::new(lines).scroll((app.scroll_offset, 0));
    frame.render_widget(paragraph, inner_area);
}

fn push_entry(lines: &mut Vec<Line<'static>>, label: String, style: Style, body: &str, width: usize) {
    lines.push(Line::from(Span::styled(label, style)));
    let max_width = width.saturating_sub(INDENT.len());

    for line in body.lines() {
        if line.is_empty() {
            lines.push(Line::from(INDENT));
            continue;
        }
        for piece in wrap_line(line, max_width) {
            lines.push(Line::from(vec![
                Span::raw(INDENT),
                Span::styled(piece.to_string(), Theme::text()),
            ]));
        }
    }
}

/// Split `line` into pieces of at most `max_width` chars, preferring to
/// break after whitespace or punctuation.
fn wrap_line(line: &str, max_width: usize) -> Vec<&str> {
    if max_width == 0 {
        return vec![line];
    }

    let mut pieces = Vec::new();
    let mut remaining = line;
    while !remaining.is_empty() {
        if remaining.chars().count() <= max_width {
            pieces.push(remaining);
            break;
        }

        let mut break_byte = None;
        let mut hard_break = remaining.len();
        for (seen, (idx, ch)) in remaining.char_indices().enumerate() {
            if seen >= max_width {
                hard_break = idx;
                if ch.is_whitespace() {
                    break_byte = Some(idx);
                }
                break;
            }
            if ch.is_whitespace() || ch == ',' || ch == '.' || ch == ';' {
                break_byte = Some(idx + ch.len_utf8());
            }
        }

        let (piece, rest) = remaining.split_at(break_byte.unwrap_or(hard_break));
        pieces.push(piece.trim_end());
        remaining = rest.trim_start();
    }

    pieces
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.view == View::Chat;

    let block = Block::default()
        .title(" Your Question ")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.input, inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status = match &app.stage {
        PipelineStage::Idle => Span::styled("Idle", Theme::text_secondary()),
        PipelineStage::Extracting => Span::styled("Extracting text...", Theme::active()),
        PipelineStage::Analyzing { done, total } if *total > 0 => Span::styled(
            format!("Processing document ({}/{})", done, total),
            Theme::active(),
        ),
        PipelineStage::Analyzing { .. } => Span::styled("Processing document...", Theme::active()),
        PipelineStage::Ready => Span::styled("Ready", Theme::complete()),
        PipelineStage::Answering => Span::styled("Generating answer...", Theme::active()),
        PipelineStage::Error(_) => Span::styled("Error", Theme::error()),
    };

    let shortcuts = vec![
        Span::styled(" [Ctrl+O]", Theme::shortcut_key()),
        Span::styled(" Open ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+P]", Theme::shortcut_key()),
        Span::styled(" Process ", Theme::shortcut_desc()),
        Span::styled("[Enter]", Theme::shortcut_key()),
        Span::styled(" Ask ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    let line = Line::from(
        std::iter::once(status)
            .chain(std::iter::once(Span::raw(" │ ")))
            .chain(shortcuts)
            .collect::<Vec<_>>(),
    );

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the document path prompt
fn render_open_prompt(frame: &mut Frame, app: &App) {
    let area = centered_rect(70, 20, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("Path to a PDF, DOCX or TXT file:", Theme::heading())),
        Line::from(""),
        Line::from(vec![
            Span::styled(app.path_input.clone(), Theme::text()),
            Span::styled(Icons::CURSOR, Theme::active()),
        ]),
        Line::from(""),
        Line::from(Span::styled("[Enter] Load   [Esc] Cancel", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Open Document ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let shortcut = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, Theme::shortcut_key()),
            Span::styled(desc, Theme::text()),
        ])
    };

    let help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
        shortcut("Ctrl+O       ", "Open a document"),
        shortcut("Ctrl+P       ", "Process the loaded document"),
        shortcut("Enter        ", "Ask question / Confirm"),
        shortcut("↑/↓          ", "Scroll history"),
        shortcut("PageUp/Down  ", "Scroll page"),
        shortcut("Esc          ", "Close modal / Cancel"),
        shortcut("Ctrl+Q       ", "Quit application"),
        shortcut("Ctrl+C       ", "Force quit"),
        shortcut("F1 / Ctrl+H  ", "Show this help"),
        Line::from(""),
        Line::from(Span::styled(
            "Processing a new document clears the question history.",
            Theme::text_secondary(),
        )),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Theme::text_dim())),
    ];

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_prefers_word_boundaries() {
        assert_eq!(wrap_line("hello brave new world", 11), vec!["hello brave", "new world"]);
    }

    #[test]
    fn test_wrap_hard_splits_long_words() {
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_line("ééééé", 2), vec!["éé", "éé", "é"]);
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap_line("fits", 10), vec!["fits"]);
        assert_eq!(wrap_line("anything", 0), vec!["anything"]);
    }
}
