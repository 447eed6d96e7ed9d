use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line editing shared by every buffer-backed widget.
pub(crate) fn handle_text_edit(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        KeyCode::Delete => {
            let changed = !buffer.is_empty();
            buffer.clear();
            changed
        }
        _ => false,
    }
}

pub(crate) fn format_collection_value(len: usize, selection: Option<&str>, pending: &str) -> String {
    let mut text = if len == 0 {
        "empty".to_string()
    } else {
        let selected = selection.unwrap_or("<no selection>");
        format!("[{len}] • {selected}")
    };
    if !pending.is_empty() {
        text.push_str(" + ");
        text.push_str(pending);
    }
    text
}
