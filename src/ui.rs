pub mod screen;
pub mod window;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    controller::Phase,
    session::TimeBudget,
    stats::format_timer,
    ui::window::{visible_window, WordView},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn italic() -> Style {
    Style::default().add_modifier(Modifier::ITALIC)
}

/// Rows of the typing and results screens.
struct SessionLayout {
    stats: Rect,
    words: Rect,
    detail: Rect,
    legend: Rect,
}

fn session_layout(area: Rect) -> SessionLayout {
    let content_height = 5;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(content_height) / 2),
            Constraint::Length(1), // stats
            Constraint::Length(1), // padding
            Constraint::Length(1), // words
            Constraint::Length(1), // input echo / summary detail
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    SessionLayout {
        stats: chunks[1],
        words: chunks[3],
        detail: chunks[4],
        legend: chunks[6],
    }
}

fn word_spans<'a>(views: &'a [WordView<'a>]) -> Vec<Span<'a>> {
    let correct = Style::default().fg(Color::Green);
    let incorrect = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT);
    let typed = Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED);

    let mut spans = Vec::with_capacity(views.len() * 2);
    for (idx, view) in views.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        match view {
            WordView::Correct(w) => spans.push(Span::styled(*w, correct)),
            WordView::Incorrect(w) => spans.push(Span::styled(*w, incorrect)),
            WordView::Current {
                typed: prefix,
                remaining,
            } => {
                if prefix.is_empty() {
                    spans.push(Span::styled(
                        *remaining,
                        bold().add_modifier(Modifier::UNDERLINED),
                    ));
                } else {
                    spans.push(Span::styled(prefix.as_str(), typed));
                    spans.push(Span::styled(*remaining, bold()));
                }
            }
            WordView::Upcoming(w) => spans.push(Span::styled(*w, dim())),
        }
    }
    spans
}

/// Terminal cell where the caret belongs while a session is active.
pub fn caret_position(app: &App, area: Rect) -> Option<(u16, u16)> {
    if app.phase() != Phase::Active {
        return None;
    }
    let session = app.controller.session()?;
    let (_, views) = visible_window(session, true);
    let line_width: usize = views
        .iter()
        .map(|v| v.display_text().width())
        .sum::<usize>()
        + views.len().saturating_sub(1);

    let mut offset: usize = 0;
    for view in &views {
        if let WordView::Current { typed, .. } = view {
            offset = offset.saturating_add(typed.width());
            break;
        }
        offset = offset.saturating_add(view.display_text().width() + 1);
    }

    // a single long word can be wider than any terminal
    let row = session_layout(area).words;
    let row_x = usize::from(row.x);
    let row_width = usize::from(row.width);
    let left = row_x + row_width.saturating_sub(line_width) / 2;
    let x = left
        .saturating_add(offset)
        .min(row_x + row_width.saturating_sub(1));
    Some((u16::try_from(x).unwrap_or(u16::MAX), row.y))
}

fn render_idle(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // padding
            Constraint::Min(3),    // custom text
            Constraint::Length(1), // time budget
            Constraint::Length(1), // voice
            Constraint::Length(1), // notice
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("wordpace", bold().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let text = if app.custom_text.is_empty() {
        Paragraph::new(Span::styled(
            "type or paste practice text here, or leave empty for a built-in passage",
            dim().add_modifier(Modifier::ITALIC),
        ))
    } else {
        Paragraph::new(app.custom_text.as_str())
    };
    text.wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("text"))
        .render(chunks[2], buf);

    Paragraph::new(budget_line(app.budget))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let voice = if app.controller.voice_enabled() {
        "voice: on"
    } else {
        "voice: off"
    };
    Paragraph::new(Span::styled(voice, dim()))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(
            notice.as_str(),
            bold().fg(Color::Red),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
    }

    Paragraph::new(Span::styled(
        "(enter) start / (tab) time / (ctrl-v) voice / (esc)ape",
        italic(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn budget_line(selected: TimeBudget) -> Line<'static> {
    let mut spans = vec![Span::styled("time: ", dim())];
    for (idx, option) in TimeBudget::OPTIONS.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw("  "));
        }
        let label = format_timer(option.secs());
        if *option == selected {
            spans.push(Span::styled(
                format!("[{label}]"),
                bold().fg(Color::Yellow),
            ));
        } else {
            spans.push(Span::styled(label, dim()));
        }
    }
    Line::from(spans)
}

fn render_active(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.controller.session() else {
        return;
    };
    let layout = session_layout(area);
    let live = app.controller.live_stats();

    let voice = if app.controller.voice_enabled() {
        "   ♪"
    } else {
        ""
    };
    Paragraph::new(Span::styled(
        format!(
            "{}   {} wpm   {} cpm   {}% acc{}",
            format_timer(session.seconds_remaining()),
            live.wpm,
            live.cpm,
            live.accuracy,
            voice
        ),
        dim().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(layout.stats, buf);

    let (_, views) = visible_window(session, true);
    Paragraph::new(Line::from(word_spans(&views)))
        .alignment(Alignment::Center)
        .render(layout.words, buf);

    Paragraph::new(Span::styled(app.input.as_str(), dim()))
        .alignment(Alignment::Center)
        .render(layout.detail, buf);

    Paragraph::new(Span::styled("(esc) reset / (ctrl-v) voice", italic()))
        .render(layout.legend, buf);
}

fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = session_layout(area);

    if let Some(session) = app.controller.session() {
        let (_, views) = visible_window(session, false);
        Paragraph::new(Line::from(word_spans(&views)))
            .alignment(Alignment::Center)
            .render(layout.words, buf);
    }

    if let Some(summary) = app.controller.summary() {
        Paragraph::new(Span::styled(
            format!("{} WPM   {}% accuracy", summary.wpm, summary.accuracy),
            bold(),
        ))
        .alignment(Alignment::Center)
        .render(layout.stats, buf);

        Paragraph::new(Span::styled(
            format!(
                "{} words typed   {} correct   {} incorrect",
                summary.words_typed, summary.correct, summary.incorrect
            ),
            dim(),
        ))
        .alignment(Alignment::Center)
        .render(layout.detail, buf);
    }

    Paragraph::new(Span::styled("(r)estart / (q)uit", italic())).render(layout.legend, buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.phase() {
            Phase::Idle => render_idle(self, area, buf),
            Phase::Active => render_active(self, area, buf),
            Phase::Finished => render_finished(self, area, buf),
        }
    }
}
