use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{form::FormState, i18n::Translator, submit::Notification};

use super::components::{render_body, render_footer, render_popup, render_record_overlay};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub translator: &'a Translator,
    pub status_message: &'a str,
    pub notification: Option<&'a Notification>,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
    pub popup: Option<PopupRender<'a>>,
    pub overlay: Option<OverlayRender<'a>>,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub query: &'a str,
    pub options: &'a [String],
    pub selected: usize,
    pub loading: bool,
}

pub struct OverlayRender<'a> {
    pub title: &'a str,
    pub form: &'a mut FormState,
    pub error: Option<&'a str>,
}

pub fn draw(frame: &mut Frame<'_>, form_state: &mut FormState, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(7),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let language = ctx.translator.language();
    let alignment = if language.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            ctx.title.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  [{language}]"), Style::default().fg(Color::DarkGray)),
    ]))
    .alignment(alignment);
    frame.render_widget(header, chunks[0]);

    let cursor_enabled = ctx.popup.is_none() && ctx.overlay.is_none();
    render_body(frame, chunks[1], form_state, ctx.translator, cursor_enabled);
    render_footer(frame, chunks[2], &ctx);

    let translator = ctx.translator;
    let help = ctx.help;
    if let Some(overlay) = ctx.overlay {
        render_record_overlay(frame, overlay, translator, help);
    }
    if let Some(popup) = ctx.popup {
        render_popup(frame, popup, translator);
    }
}
