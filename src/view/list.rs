//! Message list widget.
//!
//! Rows are placed at the offsets the virtualizer's height cache assigns
//! them, so both strategies scroll identically. A row whose formatted text
//! is taller than its estimate is clipped; a shorter one leaves blank space.
//! The exception is the last row: once its bottom edge is on screen, an
//! overflowing last row shows its final lines, so streamed text stays
//! visible while the list follows.

use super::row::{render_row, wrap_lines, RowCache};
use super::MessageStyles;
use crate::state::{ChatState, ListStrategy};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Hint shown while the list is empty.
pub const EMPTY_HINT: &str = "Type a message or press Enter to generate a long response";

/// What a list pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListStats {
    /// Rows whose lines were produced this frame (cache hits included).
    pub formatted: usize,
    /// Rows that intersected the viewport and were drawn.
    pub drawn: usize,
}

/// Screen placement of a row inside the list area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placement {
    /// Row-local lines hidden above the area's top edge.
    skip: u16,
    area: Rect,
}

/// Clip row `[top, top + height)` against the viewport starting at
/// `scroll_offset`. `None` if no part of the row is visible.
fn place(top: u64, height: u32, scroll_offset: u64, area: Rect) -> Option<Placement> {
    let bottom = top + u64::from(height);
    let view_bottom = scroll_offset + u64::from(area.height);
    if height == 0 || bottom <= scroll_offset || top >= view_bottom {
        return None;
    }
    let visible_top = top.max(scroll_offset);
    let visible_bottom = bottom.min(view_bottom);
    let y = u16::try_from(visible_top - scroll_offset).ok()?;
    let h = u16::try_from(visible_bottom - visible_top).ok()?;
    Some(Placement {
        skip: u16::try_from(visible_top - top).unwrap_or(u16::MAX),
        area: Rect::new(area.x, area.y + y, area.width, h),
    })
}

/// Shift a placement whose row bottom is on screen so the row's last
/// `rendered` lines end at that bottom edge.
fn anchor_tail(placement: Placement, height: u32, rendered: usize) -> Placement {
    let shown_to = u32::from(placement.skip) + u32::from(placement.area.height);
    let rendered = u32::try_from(rendered).unwrap_or(u32::MAX);
    if shown_to < height || rendered <= height {
        return placement;
    }
    let overflow = rendered - height;
    Placement {
        skip: u16::try_from(u32::from(placement.skip) + overflow).unwrap_or(u16::MAX),
        ..placement
    }
}

/// Lines are pre-wrapped to the list width, so no paragraph wrapping here.
fn draw_row(frame: &mut Frame, lines: &[Line<'static>], placement: Placement) {
    let paragraph = Paragraph::new(Text::from(lines.to_vec())).scroll((placement.skip, 0));
    frame.render_widget(paragraph, placement.area);
}

fn place_row(
    index: usize,
    last: usize,
    span: (u64, u32),
    rendered: usize,
    scroll_offset: u64,
    area: Rect,
) -> Option<Placement> {
    let (top, height) = span;
    let placement = place(top, height, scroll_offset, area)?;
    Some(if index == last {
        anchor_tail(placement, height, rendered)
    } else {
        placement
    })
}

/// Draw the message list into `area`.
///
/// Virtualized formats only the visible range plus overscan through the
/// row cache. Simple formats every message from scratch.
pub fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &ChatState,
    rows: &mut RowCache,
    styles: &MessageStyles,
) -> ListStats {
    let messages = state.messages();
    if messages.is_empty() {
        let hint = Paragraph::new(Line::styled(
            EMPTY_HINT,
            Style::default().add_modifier(Modifier::DIM),
        ))
        .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return ListStats::default();
    }

    let virtualizer = state.virtualizer();
    let offset = virtualizer.scroll_offset();
    let last = messages.len() - 1;
    let mut stats = ListStats::default();

    match state.strategy() {
        ListStrategy::Virtualized => {
            rows.set_markdown(state.markdown());
            rows.set_width(area.width);
            rows.retain(messages);
            let Some(range) = virtualizer.range() else {
                return stats;
            };
            for index in range.indices() {
                let (Some(message), Some(span)) =
                    (messages.get(index), virtualizer.row_span(index))
                else {
                    continue;
                };
                let lines = rows.lines(message, styles);
                stats.formatted += 1;
                if let Some(placement) = place_row(index, last, span, lines.len(), offset, area) {
                    draw_row(frame, lines, placement);
                    stats.drawn += 1;
                }
            }
        }
        ListStrategy::Simple => {
            for (index, message) in messages.iter().enumerate() {
                let lines = wrap_lines(render_row(message, state.markdown(), styles), area.width);
                stats.formatted += 1;
                let Some(span) = virtualizer.row_span(index) else {
                    continue;
                };
                if let Some(placement) = place_row(index, last, span, lines.len(), offset, area) {
                    draw_row(frame, &lines, placement);
                    stats.drawn += 1;
                }
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 2,
        width: 40,
        height: 10,
    };

    #[test]
    fn row_fully_inside_keeps_all_lines() {
        let p = place(3, 4, 0, AREA).unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.area, Rect::new(0, 5, 40, 4));
    }

    #[test]
    fn row_cut_by_top_edge_scrolls_its_text() {
        let p = place(3, 6, 5, AREA).unwrap();
        assert_eq!(p.skip, 2);
        assert_eq!(p.area, Rect::new(0, 2, 40, 4));
    }

    #[test]
    fn row_cut_by_bottom_edge_is_clipped() {
        let p = place(8, 6, 0, AREA).unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.area, Rect::new(0, 10, 40, 2));
    }

    #[test]
    fn rows_outside_viewport_are_not_placed() {
        assert_eq!(place(0, 5, 5, AREA), None, "ends exactly at the top edge");
        assert_eq!(place(15, 3, 5, AREA), None, "starts exactly at the bottom edge");
        assert_eq!(place(2, 0, 0, AREA), None, "zero height");
    }

    #[test]
    fn row_taller_than_viewport_fills_it() {
        let p = place(0, 100, 40, AREA).unwrap();
        assert_eq!(p.skip, 40);
        assert_eq!(p.area, Rect::new(0, 2, 40, 10));
    }

    #[test]
    fn overflowing_last_row_shows_its_tail_at_the_bottom() {
        // 100-row span, 130 rendered lines, viewport on the span's last 10 rows
        let p = place_row(4, 4, (0, 100), 130, 90, AREA).unwrap();
        assert_eq!(p.skip, 120);
        assert_eq!(p.area, Rect::new(0, 2, 40, 10));
    }

    #[test]
    fn overflowing_last_row_is_not_shifted_while_its_bottom_is_off_screen() {
        let p = place_row(4, 4, (0, 100), 130, 50, AREA).unwrap();
        assert_eq!(p.skip, 50);
    }

    #[test]
    fn overflowing_earlier_row_is_clipped() {
        let p = place_row(3, 4, (0, 100), 130, 90, AREA).unwrap();
        assert_eq!(p.skip, 90);
    }

    #[test]
    fn last_row_that_fits_is_not_shifted() {
        let p = place_row(4, 4, (3, 4), 4, 0, AREA).unwrap();
        assert_eq!(p.skip, 0);
        assert_eq!(p.area, Rect::new(0, 5, 40, 4));
    }
}
