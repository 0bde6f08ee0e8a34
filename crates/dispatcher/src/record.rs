//! Record rendering
//!
//! Both renderings are newline-terminated and list fields in key order.

use contracts::{LogMessage, RecordFormat};

/// Render one message as a single line
pub fn render(message: &LogMessage, format: RecordFormat) -> serde_json::Result<String> {
    let mut line = match format {
        RecordFormat::Json => serde_json::to_string(message)?,
        RecordFormat::Text => render_text(message),
    };
    line.push('\n');
    Ok(line)
}

/// `map[key:value key:value]`
fn render_text(message: &LogMessage) -> String {
    let body = message
        .iter()
        .map(|(key, value)| format!("{key}:{value}"))
        .collect::<Vec<_>>()
        .join(" ");
    format!("map[{body}]")
}
