use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
};
use unicode_width::UnicodeWidthStr;

use crate::{form::FormState, i18n::Translator};

const TAB_PADDING: usize = 3;
const LEFT_MARK: &str = "≪";
const RIGHT_MARK: &str = "≫";

/// Language tabs; a tab holding invalid fields shows its error count.
pub fn render_section_tabs(
    frame: &mut Frame<'_>,
    area: Rect,
    form_state: &FormState,
    translator: &Translator,
) {
    let titles: Vec<String> = form_state
        .sections
        .iter()
        .map(|section| {
            let title = translator.t(&section.title).into_owned();
            let errors = section
                .fields
                .iter()
                .filter(|field| field.error.is_some())
                .count();
            if errors > 0 {
                format!("{title} ({errors})")
            } else {
                title
            }
        })
        .collect();

    let widths: Vec<usize> = titles
        .iter()
        .map(|title| UnicodeWidthStr::width(title.as_str()) + TAB_PADDING)
        .collect();
    let available = area.width.saturating_sub(2) as usize;
    let window = visible_window(&widths, form_state.section_index, available);

    let marker = Style::default().fg(Color::DarkGray);
    let visible: Vec<Line<'static>> = (window.start..window.end)
        .map(|index| {
            let mut spans = Vec::with_capacity(3);
            if window.left_overflow && index == window.start {
                spans.push(Span::styled(format!("{LEFT_MARK} "), marker));
            }
            spans.push(Span::raw(titles[index].clone()));
            if window.right_overflow && index + 1 == window.end {
                spans.push(Span::styled(format!(" {RIGHT_MARK}"), marker));
            }
            Line::from(spans)
        })
        .collect();

    let tabs = Tabs::new(visible)
        .block(
            Block::default()
                .title(translator.t("Language"))
                .borders(Borders::ALL),
        )
        .select(window.selected_offset)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TabWindow {
    start: usize,
    end: usize,
    selected_offset: usize,
    left_overflow: bool,
    right_overflow: bool,
}

/// Grow a window outward from the selected tab until the width runs out,
/// preferring tabs on the right.
fn visible_window(widths: &[usize], selected: usize, available: usize) -> TabWindow {
    if widths.is_empty() {
        return TabWindow {
            start: 0,
            end: 0,
            selected_offset: 0,
            left_overflow: false,
            right_overflow: false,
        };
    }
    let selected = selected.min(widths.len() - 1);
    let mut start = selected;
    let mut end = selected + 1;
    let mut used = widths[selected];
    loop {
        let mut grew = false;
        if end < widths.len() && used + widths[end] <= available {
            used += widths[end];
            end += 1;
            grew = true;
        }
        if start > 0 && used + widths[start - 1] <= available {
            start -= 1;
            used += widths[start];
            grew = true;
        }
        if !grew {
            break;
        }
    }
    TabWindow {
        start,
        end,
        selected_offset: selected - start,
        left_overflow: start > 0,
        right_overflow: end < widths.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tabs_fit() {
        let window = visible_window(&[10, 10], 1, 40);
        assert_eq!((window.start, window.end), (0, 2));
        assert_eq!(window.selected_offset, 1);
        assert!(!window.left_overflow && !window.right_overflow);
    }

    #[test]
    fn narrow_area_keeps_selection_visible() {
        let window = visible_window(&[10, 10, 10], 2, 12);
        assert_eq!((window.start, window.end), (2, 3));
        assert_eq!(window.selected_offset, 0);
        assert!(window.left_overflow);
        assert!(!window.right_overflow);
    }

    #[test]
    fn grows_right_before_left() {
        let window = visible_window(&[5, 5, 5, 5], 1, 10);
        assert_eq!((window.start, window.end), (1, 3));
        assert!(window.left_overflow && window.right_overflow);
    }
}
