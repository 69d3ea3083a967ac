//! Single-page chat layout: persona and model sidebar, header, transcript,
//! status line, input box and footer.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::message::Role;
use crate::core::session::SessionState;

pub const TITLE: &str = "Stephen Wolf";
pub const SUBTITLE: &str = "Adaptive Intelligence Interface";
pub const PLACEHOLDER: &str = "Select a personality and send a message to begin.";
pub const INPUT_TITLE: &str = "Enter your message";

const SIDEBAR_WIDTH: u16 = 30;
const KEY_HINTS: &[&str] = &[
    "Enter   send",
    "F2      next persona",
    "F3      next model",
    "Ctrl+L  clear",
    "Ctrl+S  save",
    "Ctrl+E  export",
    "Ctrl+C  quit",
    "/help   commands",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line status message shown under the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, text)
    }

    fn style(&self) -> Style {
        let color = match self.kind {
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Success => Color::Green,
            NoticeKind::Warning => Color::Yellow,
            NoticeKind::Error => Color::Red,
        };
        Style::default().fg(color)
    }
}

/// Everything the page shows that is not part of the session itself.
#[derive(Debug, Default)]
pub struct PageState {
    pub input: String,
    pub notice: Option<Notice>,
    /// Lines scrolled up from the bottom of the transcript. Zero follows new
    /// output.
    pub scroll: u16,
    /// Transient assistant text while a response is arriving.
    pub streaming: Option<String>,
}

impl PageState {
    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = 0;
    }
}

pub fn draw(frame: &mut Frame, session: &SessionState, page: &PageState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(frame.area());

    draw_sidebar(frame, columns[0], session);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(3),    // transcript
            Constraint::Length(1), // status
            Constraint::Length(3), // input
            Constraint::Length(1), // footer
        ])
        .split(columns[1]);

    draw_header(frame, rows[0]);
    draw_transcript(frame, rows[1], session, page);
    draw_status(frame, rows[2], page);
    draw_input(frame, rows[3], page);
    draw_footer(frame, rows[4], session);
}

fn draw_sidebar(frame: &mut Frame, area: Rect, session: &SessionState) {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let value = Style::default().fg(Color::Cyan);
    let muted = Style::default().fg(Color::DarkGray);
    let persona = session.active_persona();

    let mut lines = vec![
        Line::from(Span::styled("Configuration", heading)),
        Line::from(vec![
            Span::raw("Model: "),
            Span::styled(session.active_model().display_name, value),
        ]),
        Line::from(vec![
            Span::raw("Persona: "),
            Span::styled(persona.name, value),
        ]),
        Line::from(Span::styled(persona.description, muted)),
        Line::default(),
        Line::from(Span::styled("Session", heading)),
        Line::from(format!("Messages: {}", session.message_count())),
        Line::default(),
        Line::from(Span::styled("Keys", heading)),
    ];
    lines.extend(
        KEY_HINTS
            .iter()
            .map(|hint| Line::from(Span::styled(*hint, muted))),
    );

    let sidebar = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::RIGHT));
    frame.render_widget(sidebar, area);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            SUBTITLE,
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

/// Flatten the conversation (plus any in-flight response) into styled lines,
/// already wrapped to `width` columns so one line is one screen row.
pub fn transcript_lines(
    session: &SessionState,
    streaming: Option<&str>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in session.messages() {
        push_entry(&mut lines, message.role, &message.content, width);
    }
    if let Some(partial) = streaming {
        push_entry(&mut lines, Role::Assistant, partial, width);
    }
    lines
}

fn push_entry(lines: &mut Vec<Line<'static>>, role: Role, content: &str, width: usize) {
    let label_style = match role {
        Role::User => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Role::Assistant => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    };
    lines.push(Line::from(Span::styled(role.label(), label_style)));
    if content.is_empty() {
        lines.push(Line::default());
    }
    for text in content.lines() {
        lines.extend(wrap_text(text, width).into_iter().map(Line::from));
    }
    lines.push(Line::default());
}

/// Greedy word wrap to `width` columns. Words wider than a row are split
/// at character boundaries; a single trailing space may hang past the edge.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.width() <= width {
        return vec![text.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for token in text.split_inclusive(' ') {
        let word = token.trim_end_matches(' ');
        let word_width = word.width();

        if current_width + word_width > width && !current.is_empty() {
            rows.push(current.trim_end_matches(' ').to_string());
            current.clear();
            current_width = 0;
        }

        if word_width > width {
            for ch in word.chars() {
                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                if current_width + ch_width > width && !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += ch_width;
            }
        } else {
            current.push_str(word);
            current_width += word_width;
        }

        if token.len() > word.len() {
            current.push(' ');
            current_width += 1;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current.trim_end_matches(' ').to_string());
    }
    rows
}

fn draw_transcript(frame: &mut Frame, area: Rect, session: &SessionState, page: &PageState) {
    if session.is_empty() && page.streaming.is_none() {
        let placeholder = Paragraph::new(Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        let middle = Rect {
            y: area.y + area.height / 2,
            height: area.height - area.height / 2,
            ..area
        };
        frame.render_widget(placeholder, middle);
        return;
    }

    let lines = transcript_lines(session, page.streaming.as_deref(), usize::from(area.width));
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(area.height);
    let top = max_offset - page.scroll.min(max_offset);

    let transcript = Paragraph::new(lines).scroll((top, 0));
    frame.render_widget(transcript, area);
}

fn draw_status(frame: &mut Frame, area: Rect, page: &PageState) {
    let status = match (&page.notice, &page.streaming) {
        (_, Some(_)) => Line::from(Span::styled(
            format!("{TITLE} is responding…"),
            Style::default().fg(Color::Magenta),
        )),
        (Some(notice), None) => Line::from(Span::styled(notice.text.clone(), notice.style())),
        (None, None) => Line::from(Span::styled("Ready", Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(status), area);
}

fn draw_input(frame: &mut Frame, area: Rect, page: &PageState) {
    let inner_width = usize::from(area.width.saturating_sub(2));
    let visible = tail_to_width(&page.input, inner_width.saturating_sub(1));

    let input = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .title(INPUT_TITLE)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(input, area);

    if page.streaming.is_none() {
        let cursor_x = area.x + 1 + u16::try_from(visible.width()).unwrap_or(0);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

/// Longest suffix of `text` that fits in `width` columns.
fn tail_to_width(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (index, ch) in text.char_indices().rev() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        start = index;
    }
    &text[start..]
}

pub fn footer_text(session: &SessionState) -> String {
    format!(
        "Active: {} • Model: {} • Messages: {}",
        session.active_persona().name,
        session.active_model().display_name,
        session.message_count()
    )
}

fn draw_footer(frame: &mut Frame, area: Rect, session: &SessionState) {
    let footer = Paragraph::new(Span::styled(
        footer_text(session),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(footer, area);
}
