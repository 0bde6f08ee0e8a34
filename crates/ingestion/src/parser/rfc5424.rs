//! RFC 5424 (IETF syslog) grammar
//!
//! `<PRI>VERSION SP TIMESTAMP SP HOSTNAME SP APP-NAME SP PROCID SP MSGID SP SD [SP MSG]`

use chrono::DateTime;
use contracts::{fields, Dialect, LogMessage};

use super::{next_token, Priority};

/// RFC 5424 NILVALUE
const NIL: &str = "-";

/// Decode an RFC 5424 message, `None` on any grammar mismatch
pub(super) fn parse(input: &str) -> Option<LogMessage> {
    let (priority, rest) = Priority::parse_prefix(input)?;
    let (version, rest) = parse_version(rest)?;

    let (timestamp, rest) = next_token(rest)?;
    let timestamp = if timestamp == NIL {
        None
    } else {
        Some(DateTime::parse_from_rfc3339(timestamp).ok()?)
    };

    let (hostname, rest) = next_token(rest)?;
    if hostname == NIL {
        return None;
    }

    let (app_name, rest) = next_token(rest)?;
    let (proc_id, rest) = next_token(rest)?;
    let (msg_id, rest) = next_token(rest)?;
    let (structured_data, message) = split_structured_data(rest)?;

    let message = LogMessage::new(hostname)
        .with_field(fields::DIALECT, Dialect::Rfc5424.as_str())
        .with_field(fields::PRIORITY, priority.value())
        .with_field(fields::FACILITY, priority.facility())
        .with_field(fields::SEVERITY, priority.severity())
        .with_field(fields::VERSION, version)
        .with_optional_field(fields::TIMESTAMP, timestamp)
        .with_optional_field(fields::APP_NAME, non_nil(app_name))
        .with_optional_field(fields::PROC_ID, non_nil(proc_id))
        .with_optional_field(fields::MSG_ID, non_nil(msg_id))
        .with_field(fields::STRUCTURED_DATA, structured_data)
        .with_optional_field(fields::MESSAGE, (!message.is_empty()).then_some(message));

    Some(message)
}

/// VERSION: 1-2 digits, no leading zero, followed by a space
fn parse_version(input: &str) -> Option<(u8, &str)> {
    let (token, rest) = input.split_once(' ')?;
    if token.is_empty()
        || token.len() > 2
        || token.starts_with('0')
        || !token.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    Some((token.parse().ok()?, rest))
}

fn non_nil(value: &str) -> Option<&str> {
    (value != NIL).then_some(value)
}

/// Split STRUCTURED-DATA from MSG
///
/// The block is returned verbatim: either `-` or one or more `[...]`
/// elements. Inside quoted parameter values `\"`, `\]` and `\\` are escapes.
fn split_structured_data(input: &str) -> Option<(&str, &str)> {
    let end = if input.starts_with(NIL) {
        NIL.len()
    } else {
        let mut end = 0;
        while input[end..].starts_with('[') {
            end += element_len(&input[end..])?;
        }
        if end == 0 {
            return None;
        }
        end
    };

    let (block, rest) = input.split_at(end);
    match rest.strip_prefix(' ') {
        Some(message) => Some((block, message)),
        None if rest.is_empty() => Some((block, rest)),
        None => None,
    }
}

/// Length in bytes of the SD-ELEMENT at the start of `input`, closing `]` included
fn element_len(input: &str) -> Option<usize> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, c) in input.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ']' if !in_quotes => return Some(idx + 1),
            _ => {}
        }
    }
    None
}
