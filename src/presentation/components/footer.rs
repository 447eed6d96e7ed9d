use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::submit::NotificationLevel;

use super::super::view::UiContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);

    if let Some(notification) = ctx.notification {
        let style = match notification.level {
            NotificationLevel::Success => Style::default().fg(Color::Black).bg(Color::Green),
            NotificationLevel::Error => Style::default().fg(Color::White).bg(Color::Red),
        };
        let text = notification.text.replace('\n', " • ");
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {text} "), style)),
            rows[0],
        );
    }

    let translator = ctx.translator;
    let mut status = ctx.status_message.to_string();
    if ctx.dirty {
        status.push_str(" • ");
        status.push_str(&translator.t("unsaved changes"));
    }
    let badge = if ctx.error_count > 0 {
        Span::styled(
            format!("[! {}]", ctx.error_count),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[ok]", Style::default().fg(Color::Green))
    };
    let status_line = Line::from(vec![
        Span::raw(format!("{}: ", translator.t("Status"))),
        Span::raw(status),
        Span::raw(" "),
        badge,
    ]);
    frame.render_widget(Paragraph::new(status_line), rows[1]);

    if let Some(help) = ctx.help {
        let help_widget = Paragraph::new(help.to_string())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help_widget, rows[2]);
    }
}
