use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::letter::LetterState;
use crate::session::Session;
use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Summary => render_summary(self, area, buf),
        }
    }
}

fn letter_span(session: &Session, global_index: usize, ch: char, is_current_line: bool) -> Span<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let drill = session.drill();
    let state = drill
        .letter_states
        .get(global_index)
        .copied()
        .unwrap_or(LetterState::Normal);
    let visible = session.letter_visible(global_index);

    let shown = if visible { ch.to_string() } else { "_".to_string() };

    let mut style = match state {
        LetterState::Correct => bold.fg(Color::Green),
        LetterState::Wrong => bold.fg(Color::Red),
        LetterState::Normal => bold.add_modifier(Modifier::DIM),
    };

    // cursor position
    if global_index == drill.input.len() && !drill.is_finished() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if !is_current_line {
        style = style.add_modifier(Modifier::DIM);
    }

    Span::styled(shown, style)
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let drill = session.drill();

    let range = session.visible_range();
    let visible = &session.lines()[range.clone()];

    let mut text_lines: Vec<Line> = Vec::with_capacity(visible.len().max(1));
    for (offset, wline) in visible.iter().enumerate() {
        let line_index = range.start + offset;
        let is_current = line_index == session.current_line();
        let spans: Vec<Span> = wline
            .text
            .chars()
            .enumerate()
            .map(|(ci, ch)| letter_span(session, wline.start_index + ci, ch, is_current))
            .collect();
        text_lines.push(Line::from(spans));
    }
    if text_lines.is_empty() {
        text_lines.push(Line::from(""));
    }

    let prompt_height = text_lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(prompt_height),
                Constraint::Length(1), // translation
                Constraint::Length(1), // status
                Constraint::Length(1), // tip
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    let fits = drill.unit().display_text.width() as u16 + 1 < chunks[1].width;
    let prompt = Paragraph::new(text_lines)
        .alignment(if fits { Alignment::Center } else { Alignment::Left })
        .wrap(Wrap { trim: false });
    prompt.render(chunks[1], buf);

    if let Some(ref trans) = app.trans {
        let style = Style::default()
            .add_modifier(Modifier::ITALIC)
            .add_modifier(Modifier::DIM);
        Paragraph::new(Span::styled(trans.clone(), style))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
    }

    let status = format!(
        "{} · chapter {} · {}/{} · mistakes {}",
        app.feed.dict().name,
        app.feed.chapter_index() + 1,
        (app.feed.word_index() + 1).min(app.feed.chapter_len()),
        app.feed.chapter_len(),
        drill.wrong_count,
    );
    if status.width() as u16 <= chunks[3].width {
        Paragraph::new(Span::styled(
            status,
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    if app.tip_visible {
        let tip = Paragraph::new(Span::styled(
            "Stuck? Press Tab to reveal the answer, or keep going to skip this one.",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        tip.render(chunks[4], buf);
    }
}

fn render_summary(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "practice complete",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("units finished   {}", app.finished_units)),
        Line::from(format!("units skipped    {}", app.skipped_units)),
        Line::from(format!("total mistakes   {}", app.total_mistakes)),
    ];

    if let Some(avg) = app.avg_wpm {
        lines.push(Line::from(format!("average wpm      {avg:.1}")));
    }

    if !app.most_missed.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "most missed",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (word, misses) in &app.most_missed {
            lines.push(Line::from(Span::styled(
                format!("{word}  x{misses}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(r)etry chapter · (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    )));

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Min(1),
                Constraint::Length(height),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);
}
