//! Message row rendering.
//!
//! A row is a role header line, the content (markdown or plain), a streaming
//! cursor while the message streams, and a blank separator. [`RowCache`]
//! keeps formatted rows per message and re-renders one only when its content
//! or streaming flag changed.
//!
//! Lines are wrapped here, at the list width, rather than by the paragraph
//! widget, so the number of lines a row occupies on screen is `lines.len()`.

use crate::model::{Message, MessageId};
use crate::view::MessageStyles;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use tracing::{trace, warn};
use unicode_width::UnicodeWidthChar;

/// Glyph appended after streaming content.
pub const STREAMING_CURSOR: &str = "▌";

/// Format one message into display lines.
pub fn render_row(message: &Message, markdown: bool, styles: &MessageStyles) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        message.role().label(),
        styles.style_for_role(message.role()),
    )));

    let mut content = if message.content().is_empty() {
        Vec::new()
    } else if markdown {
        render_markdown_safe(message.content())
    } else {
        plain_text(message.content())
    };

    if message.is_streaming() {
        let cursor = Span::styled(STREAMING_CURSOR, styles.cursor());
        match content.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => content.push(Line::from(cursor)),
        }
    }

    lines.extend(content);
    lines.push(Line::default());
    lines
}

/// Render markdown, falling back to plain text if the renderer panics.
pub fn render_markdown_safe(text: &str) -> Vec<Line<'static>> {
    render_markdown_safe_with(text, render_with_tui_markdown)
}

fn render_markdown_safe_with<F>(text: &str, renderer: F) -> Vec<Line<'static>>
where
    F: FnOnce(&str) -> Vec<Line<'static>>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| renderer(text))) {
        Ok(lines) => lines,
        Err(_) => {
            warn!("tui-markdown panic; falling back to plain text");
            plain_text(text)
        }
    }
}

fn render_with_tui_markdown(text: &str) -> Vec<Line<'static>> {
    tui_markdown::from_str(text)
        .lines
        .into_iter()
        .map(|line| {
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.into_owned(), span.style))
                .collect();
            Line::from(spans).style(line.style)
        })
        .collect()
}

/// Hard-wrap `lines` so none is wider than `width` columns.
///
/// Span styles and line styles carry over to the continuation lines. A
/// width of zero leaves the lines as they are.
pub fn wrap_lines(lines: Vec<Line<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width);
    if width == 0 {
        return lines;
    }
    let mut wrapped = Vec::with_capacity(lines.len());
    for line in lines {
        if line.width() <= width {
            wrapped.push(line);
        } else {
            wrap_line(&line, width, &mut wrapped);
        }
    }
    wrapped
}

fn wrap_line(line: &Line<'static>, width: usize, out: &mut Vec<Line<'static>>) {
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for span in &line.spans {
        let mut piece = String::new();
        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if used > 0 && used + w > width {
                if !piece.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut piece), span.style));
                }
                out.push(Line::from(std::mem::take(&mut current)).style(line.style));
                used = 0;
            }
            piece.push(c);
            used += w;
        }
        if !piece.is_empty() {
            current.push(Span::styled(piece, span.style));
        }
    }
    if !current.is_empty() {
        out.push(Line::from(current).style(line.style));
    }
}

fn plain_text(text: &str) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(Span::styled(line.to_owned(), Style::default())))
        .collect()
}

#[derive(Debug, Clone)]
struct CachedRow {
    content: String,
    is_streaming: bool,
    lines: Vec<Line<'static>>,
}

impl CachedRow {
    fn is_current(&self, message: &Message) -> bool {
        self.is_streaming == message.is_streaming() && self.content == message.content()
    }
}

/// Formatted rows keyed by message id.
#[derive(Debug, Clone)]
pub struct RowCache {
    rows: HashMap<MessageId, CachedRow>,
    markdown: bool,
    width: u16,
    renders: u64,
}

impl RowCache {
    /// Empty cache rendering markdown or plain text, without wrapping.
    pub fn new(markdown: bool) -> Self {
        Self {
            rows: HashMap::new(),
            markdown,
            width: 0,
            renders: 0,
        }
    }

    /// Lines for `message`, re-rendered only if its content or streaming
    /// flag differ from the cached render.
    pub fn lines(&mut self, message: &Message, styles: &MessageStyles) -> &[Line<'static>] {
        let id = message.id();
        let fresh = self.rows.get(&id).is_some_and(|row| row.is_current(message));
        if !fresh {
            self.renders += 1;
            trace!(%id, "Rendering row");
            self.rows.insert(
                id,
                CachedRow {
                    content: message.content().to_owned(),
                    is_streaming: message.is_streaming(),
                    lines: wrap_lines(render_row(message, self.markdown, styles), self.width),
                },
            );
        }
        self.rows.get(&id).map_or(&[], |row| row.lines.as_slice())
    }

    /// Switch markdown on or off. Clears the cache on change.
    pub fn set_markdown(&mut self, markdown: bool) {
        if self.markdown != markdown {
            self.markdown = markdown;
            self.rows.clear();
        }
    }

    /// Set the wrap width (0 disables wrapping). Clears the cache on change.
    pub fn set_width(&mut self, width: u16) {
        if self.width != width {
            trace!(width, "Row wrap width changed");
            self.width = width;
            self.rows.clear();
        }
    }

    /// Drop rows for messages no longer in `messages`.
    pub fn retain(&mut self, messages: &[Message]) {
        if self.rows.len() <= messages.len() {
            return;
        }
        let live: HashSet<MessageId> = messages.iter().map(Message::id).collect();
        self.rows.retain(|id, _| live.contains(id));
    }

    /// Total renders performed since creation.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Number of cached rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewMessage;
    use crate::state::MessageStore;
    use crate::view::ColorConfig;

    fn styles() -> MessageStyles {
        MessageStyles::with_color_config(ColorConfig::new(false))
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn row_has_header_content_and_separator() {
        let mut store = MessageStore::new();
        store.append(NewMessage::user("hello\nworld"));
        let lines = render_row(&store.snapshot()[0], false, &styles());

        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["You", "hello", "world", ""]);
    }

    #[test]
    fn streaming_row_ends_with_cursor() {
        let mut store = MessageStore::new();
        store.append(NewMessage::streaming_assistant());
        store.update_last_content("partial".to_string());
        let lines = render_row(&store.snapshot()[0], false, &styles());
        assert_eq!(text_of(&lines[0]), "AI Assistant");
        assert_eq!(text_of(&lines[1]), format!("partial{STREAMING_CURSOR}"));
    }

    #[test]
    fn empty_streaming_row_shows_cursor_alone() {
        let mut store = MessageStore::new();
        store.append(NewMessage::streaming_assistant());
        let lines = render_row(&store.snapshot()[0], true, &styles());
        assert_eq!(lines.len(), 3);
        assert_eq!(text_of(&lines[1]), STREAMING_CURSOR);
    }

    #[test]
    fn finished_row_has_no_cursor() {
        let mut store = MessageStore::new();
        store.append(NewMessage::streaming_assistant());
        store.update_last_content("done".to_string());
        store.finish_streaming();
        let lines = render_row(&store.snapshot()[0], false, &styles());
        assert!(lines.iter().all(|l| !text_of(l).contains(STREAMING_CURSOR)));
    }

    #[test]
    fn markdown_strips_emphasis_markers() {
        let lines = render_markdown_safe("**Important point:** lorem");
        let text: String = lines.iter().map(text_of).collect();
        assert!(text.contains("Important point:"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn markdown_survives_unterminated_fence() {
        let lines = render_markdown_safe("intro\n\n```rust\nfn main() {");
        assert!(!lines.is_empty());
    }

    #[test]
    fn markdown_falls_back_when_renderer_panics() {
        let lines = render_markdown_safe_with("line1\nline2", |_| panic!("forced renderer panic"));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content.as_ref(), "line1");
        assert_eq!(lines[1].spans[0].content.as_ref(), "line2");
    }

    #[test]
    fn cache_suppresses_identical_renders() {
        let mut store = MessageStore::new();
        store.append(NewMessage::user("same"));
        let mut cache = RowCache::new(false);
        let styles = styles();

        cache.lines(&store.snapshot()[0], &styles);
        cache.lines(&store.snapshot()[0], &styles);
        assert_eq!(cache.render_count(), 1);
    }

    #[test]
    fn cache_rerenders_on_content_or_streaming_change() {
        let mut store = MessageStore::new();
        store.append(NewMessage::streaming_assistant());
        let mut cache = RowCache::new(false);
        let styles = styles();

        cache.lines(&store.snapshot()[0], &styles);
        store.update_last_content("a".to_string());
        cache.lines(&store.snapshot()[0], &styles);
        store.finish_streaming();
        cache.lines(&store.snapshot()[0], &styles);
        assert_eq!(cache.render_count(), 3);
    }

    #[test]
    fn markdown_toggle_clears_cache() {
        let mut store = MessageStore::new();
        store.append(NewMessage::user("x"));
        let mut cache = RowCache::new(true);
        let styles = styles();
        cache.lines(&store.snapshot()[0], &styles);

        cache.set_markdown(true);
        assert_eq!(cache.len(), 1);
        cache.set_markdown(false);
        assert!(cache.is_empty());
    }

    #[test]
    fn wrap_lines_splits_at_width_and_keeps_styles() {
        let bold = Style::default().add_modifier(ratatui::style::Modifier::BOLD);
        let line = Line::from(vec![Span::raw("abcd"), Span::styled("efghij", bold)]);
        let wrapped = wrap_lines(vec![line, Line::default()], 4);

        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, vec!["abcd", "efgh", "ij", ""]);
        assert_eq!(wrapped[1].spans[0].style, bold);
        assert_eq!(wrapped[2].spans[0].style, bold);
    }

    #[test]
    fn wrap_lines_counts_wide_chars_by_columns() {
        let wrapped = wrap_lines(vec![Line::from("日本語日本")], 4);
        let texts: Vec<String> = wrapped.iter().map(text_of).collect();
        assert_eq!(texts, vec!["日本", "語日", "本"]);
    }

    #[test]
    fn zero_width_leaves_lines_alone() {
        let wrapped = wrap_lines(vec![Line::from("x".repeat(200))], 0);
        assert_eq!(wrapped.len(), 1);
    }

    #[test]
    fn width_change_clears_cache_and_rewraps() {
        let mut store = MessageStore::new();
        store.append(NewMessage::user("x".repeat(30)));
        let mut cache = RowCache::new(false);
        let styles = styles();

        assert_eq!(cache.lines(&store.snapshot()[0], &styles).len(), 3);
        cache.set_width(10);
        assert!(cache.is_empty());
        // header, 3 wrapped content lines, separator
        assert_eq!(cache.lines(&store.snapshot()[0], &styles).len(), 5);
    }

    #[test]
    fn retain_prunes_missing_messages() {
        let mut a = MessageStore::new();
        a.append(NewMessage::user("a"));
        let mut b = MessageStore::new();
        b.append(NewMessage::user("b"));

        let mut cache = RowCache::new(false);
        let styles = styles();
        cache.lines(&a.snapshot()[0], &styles);
        cache.lines(&b.snapshot()[0], &styles);
        cache.retain(b.snapshot());
        assert_eq!(cache.len(), 1);
    }
}
