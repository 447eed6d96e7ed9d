use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::{
    form::{FieldState, FormState, SectionState},
    i18n::Translator,
};

const MAX_PANEL_ROWS: usize = 4;

pub fn render_fields(
    frame: &mut Frame<'_>,
    area: Rect,
    form_state: &mut FormState,
    translator: &Translator,
    enable_cursor: bool,
) {
    let selected_index = form_state.field_index;
    let section_index = form_state.section_index;
    let Some(section) = form_state.sections.get_mut(section_index) else {
        let placeholder = Paragraph::new(translator.t("No section selected"))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    };
    let title = translator.t(&section.title).into_owned();

    if section.fields.is_empty() {
        let placeholder = Paragraph::new(translator.t("This tab has no fields"))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(placeholder, area);
        return;
    }

    let selected_index = selected_index.min(section.fields.len() - 1);
    let content_width = area.width.saturating_sub(6);
    adjust_scroll_offset(section, selected_index, area.height);

    let mut items = Vec::with_capacity(section.fields.len());
    let mut cursor_hint: Option<CursorHint> = None;
    let mut line_offset = 0usize;
    for (idx, field) in section.fields.iter().enumerate() {
        let render = build_field_render(field, idx == selected_index, content_width, translator);
        if idx >= section.scroll_offset {
            if let Some(mut hint) = render.cursor_hint {
                hint.line_offset += line_offset;
                cursor_hint = Some(hint);
            }
            line_offset += render.lines.len();
        }
        items.push(ListItem::new(render.lines));
    }

    let mut list_state = ListState::default();
    list_state.select(Some(selected_index));
    *list_state.offset_mut() = section.scroll_offset;

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Black))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);

    if enable_cursor && let Some(cursor) = cursor_hint {
        let max_line = area.height.saturating_sub(3) as usize;
        if cursor.line_offset <= max_line {
            let cursor_y = area.y + 1 + cursor.line_offset as u16;
            let cursor_x = area
                .x
                .saturating_add(1 + 2 + 2)
                .saturating_add(cursor.value_width)
                .min(area.right().saturating_sub(2));
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

fn adjust_scroll_offset(section: &mut SectionState, selected: usize, height: u16) {
    // Fields take several lines; keep a conservative number of them in view.
    let window = (height.saturating_sub(2) / 5).max(1) as usize;
    if selected < section.scroll_offset {
        section.scroll_offset = selected;
    } else if selected >= section.scroll_offset + window {
        section.scroll_offset = selected + 1 - window;
    }
}

struct FieldRender {
    lines: Vec<Line<'static>>,
    cursor_hint: Option<CursorHint>,
}

struct CursorHint {
    line_offset: usize,
    value_width: u16,
}

fn build_field_render(
    field: &FieldState,
    is_selected: bool,
    max_width: u16,
    translator: &Translator,
) -> FieldRender {
    let mut lines = Vec::new();
    let mut label = translator.t(&field.descriptor.label).into_owned();
    if field.descriptor.required {
        label.push_str(" *");
    }
    let label_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    lines.push(Line::from(Span::styled(label, label_style)));

    let (value_lines, cursor_hint) = value_lines(field, is_selected, max_width, translator);
    lines.extend(value_lines);

    if is_selected && let Some(panel_lines) = collection_lines(field) {
        lines.extend(panel_lines);
    }

    lines.push(meta_line(field, translator));

    if let Some(message) = &field.error {
        for segment in wrap(message, max_width.max(8) as usize) {
            lines.push(Line::from(Span::styled(
                format!("  ✗ {segment}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    FieldRender { lines, cursor_hint }
}

fn value_lines(
    field: &FieldState,
    is_selected: bool,
    max_width: u16,
    translator: &Translator,
) -> (Vec<Line<'static>>, Option<CursorHint>) {
    let display = field.display_value();
    let placeholder = display.is_empty().then(|| {
        field
            .descriptor
            .placeholder
            .as_deref()
            .map(|text| translator.t(text).into_owned())
            .unwrap_or_default()
    });

    let width = max_width.max(4) as usize;
    let mut segments: Vec<String> = display
        .split('\n')
        .flat_map(|line| {
            let wrapped = wrap(line, width);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped.into_iter().map(|part| part.into_owned()).collect()
            }
        })
        .collect();
    let rows = field.visible_rows().max(1) as usize;
    while segments.len() < rows {
        segments.push(String::new());
    }

    let last_width = segments
        .last()
        .map(|line| UnicodeWidthStr::width(line.as_str()))
        .unwrap_or(0);
    let last_index = segments.len().saturating_sub(1);

    let value_style = if is_selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let gutter = if is_selected { "│ " } else { "  " };
    let gutter_style = Style::default().fg(Color::Yellow);

    let mut lines = Vec::with_capacity(segments.len());
    for (idx, segment) in segments.into_iter().enumerate() {
        let content = match (&placeholder, idx) {
            (Some(text), 0) if !text.is_empty() => Span::styled(
                text.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            _ => Span::styled(segment, value_style),
        };
        lines.push(Line::from(vec![Span::styled(gutter, gutter_style), content]));
    }

    let cursor_hint = is_selected.then(|| CursorHint {
        // label line precedes the value
        line_offset: 1 + last_index,
        value_width: if placeholder.is_some() {
            0
        } else {
            last_width as u16
        },
    });
    (lines, cursor_hint)
}

fn collection_lines(field: &FieldState) -> Option<Vec<Line<'static>>> {
    let panel = field.collection_panel()?;
    let mut lines = Vec::new();
    let dim = Style::default().fg(Color::DarkGray);
    if panel.entries.is_empty() {
        lines.push(Line::from(Span::styled("    (none)", dim)));
    }
    let selected = panel.selected.unwrap_or(0);
    let start = selected.saturating_sub(MAX_PANEL_ROWS - 1);
    for (idx, entry) in panel
        .entries
        .iter()
        .enumerate()
        .skip(start)
        .take(MAX_PANEL_ROWS)
    {
        let marker = if panel.selected == Some(idx) { "»" } else { " " };
        let style = if panel.selected == Some(idx) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(format!("  {marker} {entry}"), style)));
    }
    let hidden = panel.entries.len().saturating_sub(start + MAX_PANEL_ROWS);
    if hidden > 0 {
        lines.push(Line::from(Span::styled(format!("    … +{hidden}"), dim)));
    }
    if !panel.hint.is_empty() {
        lines.push(Line::from(Span::styled(format!("    {}", panel.hint), dim)));
    }
    Some(lines)
}

fn meta_line(field: &FieldState, translator: &Translator) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("  {}", field.descriptor.kind.as_str()),
        Style::default().fg(Color::DarkGray),
    )];
    if field.error.is_some() {
        spans.push(Span::styled(
            format!("  • {}", translator.t("invalid")),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if field.dirty {
        spans.push(Span::styled(
            format!("  • {}", translator.t("edited")),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}
