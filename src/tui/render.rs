use crate::session::{NoticeLevel, Session, INFO_LINES};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub const INSTRUCTIONS: &str =
    "Up/Down navigate | Type to filter | Enter select | Esc or Ctrl+C quit";
pub const FILTER_PLACEHOLDER: &str = "Type to filter...";
pub const LIST_TITLE: &str = "Select an AWS profile";
pub const DETAIL_TITLE: &str = "Selected profile";
pub const NO_SELECTION_TEXT: &str = "No profile selected.";
pub const NO_KEYS_TEXT: &str = "No keys in this profile.";
pub const NO_MATCHES_TEXT: &str = "No profiles match the filter.";

const ACCENT: Color = Color::Indexed(205);
const KEY_COLOR: Color = Color::Indexed(12);
const VALUE_COLOR: Color = Color::Indexed(10);
const INFO_COLOR: Color = Color::Rgb(0x81, 0xD4, 0xFA);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    NoSelection,
    Profile {
        title: String,
        entries: Vec<(String, String)>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub before_cursor: String,
    pub at_cursor: Option<char>,
    pub after_cursor: String,
    pub profiles: Vec<String>,
    pub selected: Option<usize>,
    pub detail: DetailView,
    pub info_lines: Vec<String>,
    pub warnings: Vec<String>,
    pub notice: Option<(NoticeLevel, String)>,
}

impl SessionView {
    fn query_is_empty(&self) -> bool {
        self.before_cursor.is_empty() && self.at_cursor.is_none()
    }

    // Rows needed by the message area once its lines wrap at `width` columns.
    fn message_rows(&self, width: u16) -> u16 {
        let width = usize::from(width.saturating_sub(2)).max(1);
        let wrapped = |text: &str| text.chars().count().max(1).div_ceil(width);
        let notice = self
            .notice
            .as_ref()
            .map_or(0, |(_, text)| wrapped(format!("Status: {text}").as_str()));
        let rows = self
            .info_lines
            .iter()
            .chain(&self.warnings)
            .map(|line| wrapped(line.as_str()))
            .sum::<usize>()
            + notice;
        u16::try_from(rows).unwrap_or(u16::MAX)
    }
}

pub fn project_session_view(session: &Session) -> SessionView {
    let (before, at, after) = session.input().split_at_cursor();
    let detail = match session.selected_profile() {
        None => DetailView::NoSelection,
        Some(profile) => DetailView::Profile {
            title: format!("[{}]", profile.section_name()),
            entries: session
                .selected_section()
                .map(|section| {
                    section
                        .entries()
                        .map(|pair| (pair.key.clone(), pair.value.clone()))
                        .collect()
                })
                .unwrap_or_default(),
        },
    };
    let info_lines = if session.show_info() {
        INFO_LINES.iter().map(|line| (*line).to_string()).collect()
    } else {
        Vec::new()
    };
    SessionView {
        before_cursor: before.to_string(),
        at_cursor: at,
        after_cursor: after.to_string(),
        profiles: session
            .filtered()
            .iter()
            .map(|profile| profile.name().to_string())
            .collect(),
        selected: session.selection(),
        detail,
        info_lines,
        warnings: session
            .warnings()
            .iter()
            .map(|warning| format!("(warning) {warning}"))
            .collect(),
        notice: session
            .notice()
            .map(|notice| (notice.level, notice.text.clone())),
    }
}

pub fn draw_session(frame: &mut Frame<'_>, view: &SessionView) {
    let area = frame.area();
    let message_height = view
        .message_rows(area.width)
        .saturating_add(2)
        .clamp(3, (area.height / 3).max(3));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(message_height),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            INSTRUCTIONS,
            Style::default().fg(Color::DarkGray),
        ))),
        rows[0],
    );

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(columns[0]);

    draw_filter_input(frame, left[0], view);
    draw_profile_list(frame, left[1], view);
    draw_detail(frame, columns[1], view);
    draw_messages(frame, rows[2], view);
}

fn draw_filter_input(frame: &mut Frame<'_>, area: Rect, view: &SessionView) {
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let line = if view.query_is_empty() {
        Line::from(vec![
            Span::styled(" ", cursor_style),
            Span::styled(FILTER_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        let under_cursor = view.at_cursor.map_or_else(|| " ".to_string(), String::from);
        Line::from(vec![
            Span::raw(view.before_cursor.clone()),
            Span::styled(under_cursor, cursor_style),
            Span::raw(view.after_cursor.clone()),
        ])
    };
    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .title("Filter"),
    );
    frame.render_widget(input, area);
}

fn draw_profile_list(frame: &mut Frame<'_>, area: Rect, view: &SessionView) {
    let block = Block::default().borders(Borders::ALL).title(LIST_TITLE);
    if view.profiles.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            NO_MATCHES_TEXT,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }
    let items = view
        .profiles
        .iter()
        .map(|name| ListItem::new(Line::from(Span::raw(name.clone()))))
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(view.selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_detail(frame: &mut Frame<'_>, area: Rect, view: &SessionView) {
    let muted = Style::default().fg(Color::DarkGray);
    let lines = match &view.detail {
        DetailView::NoSelection => vec![Line::from(Span::styled(NO_SELECTION_TEXT, muted))],
        DetailView::Profile { title, entries } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    title.clone(),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            if entries.is_empty() {
                lines.push(Line::from(Span::styled(NO_KEYS_TEXT, muted)));
            }
            for (key, value) in entries {
                lines.push(Line::from(vec![
                    Span::styled(key.clone(), Style::default().fg(KEY_COLOR)),
                    Span::raw("="),
                    Span::styled(value.clone(), Style::default().fg(VALUE_COLOR)),
                ]));
            }
            lines
        }
    };
    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(DETAIL_TITLE));
    frame.render_widget(detail, area);
}

fn draw_messages(frame: &mut Frame<'_>, area: Rect, view: &SessionView) {
    let mut lines = Vec::new();
    for info in &view.info_lines {
        lines.push(Line::from(Span::styled(
            info.clone(),
            Style::default().fg(INFO_COLOR),
        )));
    }
    for warning in &view.warnings {
        lines.push(Line::from(Span::styled(
            warning.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some((level, text)) = &view.notice {
        let color = match level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        lines.push(Line::from(Span::styled(
            format!("Status: {text}"),
            Style::default().fg(color),
        )));
    }
    let messages = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(messages, area);
}
