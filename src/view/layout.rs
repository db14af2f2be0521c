//! Screen layout: header, message list, input box and status bar.

use super::constants::{HEADER_HEIGHT, INPUT_HEIGHT, STATUS_BAR_HEIGHT};
use super::list::{render_list, ListStats};
use super::live_indicator::{follow_badge, LiveIndicator};
use super::row::RowCache;
use super::MessageStyles;
use crate::state::ChatState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Title shown in the header bar.
pub const TITLE: &str = "AI Chat Interface";

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatLayout {
    /// Title bar.
    pub header: Rect,
    /// Message list.
    pub list: Rect,
    /// Bordered input box.
    pub input: Rect,
    /// Status bar.
    pub status: Rect,
}

/// Split `area` into header, list, input and status rows.
pub fn chat_layout(area: Rect) -> ChatLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    ChatLayout {
        header: chunks[0],
        list: chunks[1],
        input: chunks[2],
        status: chunks[3],
    }
}

/// Draw the whole frame.
pub fn render_layout(
    frame: &mut Frame,
    state: &ChatState,
    rows: &mut RowCache,
    styles: &MessageStyles,
    blink_on: bool,
) -> ListStats {
    let layout = chat_layout(frame.area());
    render_header(frame, layout.header, state, styles);
    let stats = render_list(frame, layout.list, state, rows, styles);
    render_input(frame, layout.input, state, styles);
    render_status_bar(frame, layout.status, state, styles, blink_on);
    stats
}

fn render_header(frame: &mut Frame, area: Rect, state: &ChatState, styles: &MessageStyles) {
    let line = Line::from(vec![
        Span::raw(format!(" {TITLE} ")),
        Span::raw(format!(
            " {} messages • {}",
            state.store().len(),
            state.strategy()
        )),
    ]);
    frame.render_widget(Paragraph::new(line).style(styles.header()), area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &ChatState, styles: &MessageStyles) {
    let (title, body) = if state.is_generating() {
        (" Generating… (Esc to stop) ", Span::styled("", styles.input_disabled()))
    } else if state.input().is_empty() {
        (
            " Message (Enter to send) ",
            Span::styled("Type a message or press Enter...", styles.input_disabled()),
        )
    } else {
        (" Message (Enter to send) ", Span::raw(state.input().to_owned()))
    };

    let mut block = Block::default().borders(Borders::ALL).title(title);
    if state.is_generating() {
        block = block.border_style(styles.input_disabled());
    }
    frame.render_widget(Paragraph::new(Line::from(body)).block(block), area);
}

fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &ChatState,
    styles: &MessageStyles,
    blink_on: bool,
) {
    let virtualizer = state.virtualizer();
    let position = match virtualizer.range() {
        Some(range) => format!(
            "rows {}-{}/{} ",
            range.first + 1,
            range.last + 1,
            virtualizer.item_count()
        ),
        None => String::new(),
    };

    let line = Line::from(vec![
        LiveIndicator::new(state.is_generating(), blink_on).render(),
        follow_badge(state.follow().state()),
        Span::styled(position, styles.status()),
        Span::styled(
            "Enter send · Esc stop · Tab strategy · End follow · Ctrl+C quit",
            styles.status(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
