use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use crate::i18n::Translator;

use super::super::view::PopupRender;
use super::layout::centered_rect;

const MIN_WIDTH: u16 = 24;
const MAX_ROWS: usize = 12;

pub fn render_popup(frame: &mut Frame<'_>, popup: PopupRender<'_>, translator: &Translator) {
    let widest = popup
        .options
        .iter()
        .map(|option| UnicodeWidthStr::width(option.as_str()))
        .chain(std::iter::once(UnicodeWidthStr::width(popup.title)))
        .max()
        .unwrap_or(0) as u16;
    let width = widest.saturating_add(8).max(MIN_WIDTH);
    let rows = popup.options.len().clamp(1, MAX_ROWS) as u16;
    let area = centered_rect(frame.area(), width, rows + 4);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(popup.title.to_string())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let mut query_spans = vec![
        Span::styled("/ ", Style::default().fg(Color::DarkGray)),
        Span::raw(popup.query.to_string()),
    ];
    if popup.loading {
        query_spans.push(Span::styled(
            format!("  {}", translator.t("Searching...")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(query_spans)), chunks[0]);

    if popup.options.is_empty() {
        let empty = if popup.loading {
            String::new()
        } else {
            translator.t("No matches").into_owned()
        };
        frame.render_widget(
            Paragraph::new(empty).style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );
        return;
    }

    let items: Vec<ListItem<'static>> = popup
        .options
        .iter()
        .map(|option| ListItem::new(option.clone()))
        .collect();
    let mut state = ListState::default();
    state.select(Some(popup.selected.min(popup.options.len() - 1)));
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, chunks[1], &mut state);
}
