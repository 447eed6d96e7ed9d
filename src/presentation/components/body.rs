use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    form::{FormLayout, FormState},
    i18n::Translator,
};

use super::{fields::render_fields, tabstrip::render_section_tabs};

pub fn render_body(
    frame: &mut Frame<'_>,
    area: Rect,
    form_state: &mut FormState,
    translator: &Translator,
    enable_cursor: bool,
) {
    if form_state.is_empty() {
        let placeholder = Paragraph::new(translator.t("No editable fields"))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    if form_state.layout() == FormLayout::Tabbed && form_state.sections.len() > 1 {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        render_section_tabs(frame, chunks[0], form_state, translator);
        render_fields(frame, chunks[1], form_state, translator, enable_cursor);
    } else {
        render_fields(frame, area, form_state, translator, enable_cursor);
    }
}
