use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::i18n::Translator;

use super::super::view::OverlayRender;
use super::{fields::render_fields, layout::centered_rect};

pub fn render_record_overlay(
    frame: &mut Frame<'_>,
    overlay: OverlayRender<'_>,
    translator: &Translator,
    help: Option<&str>,
) {
    let base = frame.area();
    let width = base.width.saturating_sub(base.width / 4).max(40);
    let height = base.height.saturating_sub(base.height / 5).max(14);
    let area = centered_rect(base, width, height);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(overlay.title.to_string())
        .borders(Borders::ALL)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(inner);

    render_fields(frame, layout[0], overlay.form, translator, true);

    if let Some(error) = overlay.error {
        frame.render_widget(
            Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
            layout[1],
        );
    }

    let instructions = help
        .map(str::to_string)
        .unwrap_or_else(|| translator.t("Ctrl+S apply • Esc cancel").into_owned());
    frame.render_widget(
        Paragraph::new(instructions)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Yellow)),
        layout[2],
    );
}
