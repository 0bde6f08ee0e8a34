//! RFC 3164 (BSD syslog) grammar
//!
//! `<PRI>TIMESTAMP SP HOSTNAME SP [TAG[ '[' PID ']' ] ':' SP] CONTENT`
//!
//! The classic `Mmm dd hh:mm:ss` timestamp has neither year nor zone, so it
//! is kept as text. An RFC 3339 timestamp in the same position (rsyslog
//! high-precision templates) is decoded to an instant.

use chrono::DateTime;
use contracts::{fields, Dialect, FieldValue, LogMessage};

use super::{next_token, Priority};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Length of `Mmm dd hh:mm:ss`
const BSD_TIMESTAMP_LEN: usize = 15;

const MAX_TAG_LEN: usize = 32;

/// Decode an RFC 3164 message, `None` on any grammar mismatch
pub(super) fn parse(input: &str) -> Option<LogMessage> {
    let (priority, rest) = Priority::parse_prefix(input)?;
    let (timestamp, rest) = parse_timestamp(rest)?;
    let (hostname, rest) = next_token(rest)?;
    let (tag, proc_id, content) = split_tag(rest);

    let message = LogMessage::new(hostname)
        .with_field(fields::DIALECT, Dialect::Rfc3164.as_str())
        .with_field(fields::PRIORITY, priority.value())
        .with_field(fields::FACILITY, priority.facility())
        .with_field(fields::SEVERITY, priority.severity())
        .with_field(fields::TIMESTAMP, timestamp)
        .with_optional_field(fields::TAG, tag)
        .with_optional_field(fields::PROC_ID, proc_id)
        .with_optional_field(fields::CONTENT, (!content.is_empty()).then_some(content));

    Some(message)
}

/// Timestamp followed by a space
fn parse_timestamp(input: &str) -> Option<(FieldValue, &str)> {
    if let Some(stamp) = input.get(..BSD_TIMESTAMP_LEN) {
        if is_bsd_timestamp(stamp) {
            let rest = input[BSD_TIMESTAMP_LEN..].strip_prefix(' ')?;
            return Some((FieldValue::from(stamp), rest));
        }
    }

    let (token, rest) = input.split_once(' ')?;
    let instant = DateTime::parse_from_rfc3339(token).ok()?;
    Some((FieldValue::from(instant), rest))
}

/// `Mmm dd hh:mm:ss` with the day space- or zero-padded
fn is_bsd_timestamp(stamp: &str) -> bool {
    let bytes = stamp.as_bytes();
    let month_ok = stamp.get(..3).is_some_and(|m| MONTHS.contains(&m));
    if !month_ok || bytes[3] != b' ' || bytes[6] != b' ' {
        return false;
    }

    let day = match (bytes[4], bytes[5]) {
        (b' ', d) if d.is_ascii_digit() => d - b'0',
        (t, d) if t.is_ascii_digit() && d.is_ascii_digit() => (t - b'0') * 10 + (d - b'0'),
        _ => return false,
    };
    if !(1..=31).contains(&day) {
        return false;
    }

    let time = &bytes[7..];
    if time[2] != b':' || time[5] != b':' {
        return false;
    }
    let field = |at: usize| -> Option<u8> {
        let (t, u) = (time[at], time[at + 1]);
        (t.is_ascii_digit() && u.is_ascii_digit()).then(|| (t - b'0') * 10 + (u - b'0'))
    };
    matches!(
        (field(0), field(3), field(6)),
        (Some(h), Some(m), Some(s)) if h < 24 && m < 60 && s < 61
    )
}

/// Split `tag[pid]: content`
///
/// When the remainder does not start with a tag prefix, everything is content.
fn split_tag(input: &str) -> (Option<&str>, Option<&str>, &str) {
    let end = input
        .find(|c: char| !is_tag_char(c))
        .unwrap_or(input.len());
    if end == 0 || end > MAX_TAG_LEN {
        return (None, None, input);
    }

    let (tag, after) = input.split_at(end);
    if let Some(after) = after.strip_prefix('[') {
        if let Some((pid, tail)) = after.split_once(']') {
            if let Some(content) = tail.strip_prefix(':') {
                return (Some(tag), Some(pid), strip_one_space(content));
            }
        }
        return (None, None, input);
    }
    match after.strip_prefix(':') {
        Some(content) => (Some(tag), None, strip_one_space(content)),
        None => (None, None, input),
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

fn strip_one_space(input: &str) -> &str {
    input.strip_prefix(' ').unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc_example() {
        let msg = parse("<34>Oct 11 22:14:15 mymachine su: 'su root' failed for lonvick on /dev/pts/8")
            .unwrap();
        assert_eq!(msg.hostname(), "mymachine");
        assert_eq!(msg.int(fields::PRIORITY), Some(34));
        assert_eq!(msg.int(fields::FACILITY), Some(4));
        assert_eq!(msg.int(fields::SEVERITY), Some(2));
        assert_eq!(msg.text(fields::TIMESTAMP), Some("Oct 11 22:14:15"));
        assert_eq!(msg.text(fields::TAG), Some("su"));
        assert_eq!(
            msg.text(fields::CONTENT),
            Some("'su root' failed for lonvick on /dev/pts/8")
        );
    }

    #[test]
    fn parses_space_padded_day_and_pid() {
        let msg = parse("<13>Feb  5 17:32:18 10.0.0.99 sshd[4123]: Accepted publickey").unwrap();
        assert_eq!(msg.hostname(), "10.0.0.99");
        assert_eq!(msg.text(fields::TIMESTAMP), Some("Feb  5 17:32:18"));
        assert_eq!(msg.text(fields::TAG), Some("sshd"));
        assert_eq!(msg.text(fields::PROC_ID), Some("4123"));
        assert_eq!(msg.text(fields::CONTENT), Some("Accepted publickey"));
    }

    #[test]
    fn content_without_tag() {
        let msg = parse("<13>Feb 05 17:32:18 host just some words").unwrap();
        assert!(msg.get(fields::TAG).is_none());
        assert_eq!(msg.text(fields::CONTENT), Some("just some words"));
    }

    #[test]
    fn hostname_only() {
        let msg = parse("<13>Feb 05 17:32:18 host").unwrap();
        assert_eq!(msg.hostname(), "host");
        assert!(msg.get(fields::CONTENT).is_none());
    }

    #[test]
    fn decodes_rfc3339_timestamp() {
        let msg = parse("<30>2024-03-01T10:00:00+02:00 web01 nginx: started").unwrap();
        let ts = msg
            .get(fields::TIMESTAMP)
            .and_then(FieldValue::as_timestamp)
            .unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(msg.hostname(), "web01");
    }

    #[test]
    fn rejects_missing_hostname() {
        assert!(parse("<13>Feb 05 17:32:18 ").is_none());
        assert!(parse("<13>Feb 05 17:32:18").is_none());
    }

    #[test]
    fn rejects_bad_timestamps() {
        assert!(parse("<13>Foo 05 17:32:18 host x").is_none());
        assert!(parse("<13>Feb 32 17:32:18 host x").is_none());
        assert!(parse("<13>Feb 05 24:32:18 host x").is_none());
        assert!(parse("<13>Feb 05 17-32-18 host x").is_none());
        assert!(parse("<13>hello host x").is_none());
    }

    #[test]
    fn unbalanced_pid_is_content() {
        let (tag, pid, content) = split_tag("app[12: text");
        assert_eq!((tag, pid), (None, None));
        assert_eq!(content, "app[12: text");
    }

    #[test]
    fn overlong_tag_is_content() {
        let long = "a".repeat(MAX_TAG_LEN + 1);
        let input = format!("{long}: text");
        let (tag, _, content) = split_tag(&input);
        assert!(tag.is_none());
        assert_eq!(content, input);
    }
}
