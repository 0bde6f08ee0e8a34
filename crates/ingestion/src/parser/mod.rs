//! Syslog datagram parser
//!
//! Detects the dialect of a raw datagram and decodes it into a [`LogMessage`].
//!
//! Detection order is fixed: RFC 5424 first, RFC 3164 second. A truncated
//! RFC 5424 message still starts with a valid `<PRI>`, so trying the legacy
//! grammar first would misclassify it.

mod priority;
mod rfc3164;
mod rfc5424;

pub use priority::Priority;

use contracts::{is_routable_hostname, LogMessage};

use crate::error::ParseError;

/// Decode one datagram
///
/// Pure function of its input. Trailing `\n`, `\r` and `\0` are ignored;
/// invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
/// - [`ParseError::EMPTY`] when nothing is left after trimming
/// - [`ParseError::UNRECOGNIZED`] when neither grammar yields a hostname
/// - [`ParseError::UNROUTABLE_HOSTNAME`] when the hostname is not a single
///   path component (see [`is_routable_hostname`])
pub fn parse(raw: &[u8]) -> Result<LogMessage, ParseError> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches(|c| matches!(c, '\n' | '\r' | '\0'));
    if text.is_empty() {
        return Err(ParseError::EMPTY);
    }

    let message = rfc5424::parse(text)
        .or_else(|| rfc3164::parse(text))
        .ok_or(ParseError::UNRECOGNIZED)?;
    if !is_routable_hostname(message.hostname()) {
        return Err(ParseError::UNROUTABLE_HOSTNAME);
    }
    Ok(message)
}

/// Split off the next space-delimited token
///
/// Returns the token and the input after the single separating space.
/// An empty token (leading space or empty input) is a grammar mismatch.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let (token, rest) = match input.find(' ') {
        Some(idx) => (&input[..idx], &input[idx + 1..]),
        None => (input, ""),
    };
    if token.is_empty() {
        None
    } else {
        Some((token, rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{fields, Dialect};

    #[test]
    fn legacy_scenario() {
        let msg = parse(b"<34>Oct 11 22:14:15 mymachine su: 'su root' failed").unwrap();
        assert_eq!(msg.hostname(), "mymachine");
        assert_eq!(msg.int(fields::SEVERITY), Some(2));
        assert_eq!(msg.int(fields::FACILITY), Some(4));
        assert_eq!(msg.text(fields::TAG), Some("su"));
        assert_eq!(msg.dialect(), Some(Dialect::Rfc3164));
    }

    #[test]
    fn structured_scenario() {
        let msg = parse(
            b"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 - BOM'su root' failed",
        )
        .unwrap();
        assert_eq!(msg.hostname(), "mymachine.example.com");
        assert_eq!(msg.dialect(), Some(Dialect::Rfc5424));
    }

    #[test]
    fn empty_datagram_is_rejected() {
        assert_eq!(parse(b""), Err(ParseError::EMPTY));
        assert_eq!(parse(b"\r\n\0"), Err(ParseError::EMPTY));
    }

    #[test]
    fn garbage_is_unrecognized() {
        assert_eq!(parse(b"hello world"), Err(ParseError::UNRECOGNIZED));
        assert_eq!(parse(b"<34>"), Err(ParseError::UNRECOGNIZED));
        assert_eq!(parse(b"<999>Oct 11 22:14:15 host x"), Err(ParseError::UNRECOGNIZED));
        assert_eq!(parse(b"34>Oct 11 22:14:15 host x"), Err(ParseError::UNRECOGNIZED));
    }

    #[test]
    fn structured_without_hostname_does_not_fall_back() {
        let result = parse(b"<165>1 2003-10-11T22:14:15.003Z - evntslog - ID47 - hello");
        assert_eq!(result, Err(ParseError::UNRECOGNIZED));
    }

    #[test]
    fn unroutable_hostnames_are_rejected() {
        let datagrams: [&[u8]; 6] = [
            b"<13>Feb  5 17:32:18 a/b app: hi",
            b"<13>Feb  5 17:32:18 .. app: hi",
            b"<13>Feb  5 17:32:18 host\tx app: hi",
            b"<13>Feb  5 17:32:18 nul\0x app: hi",
            b"<14>1 - host\x0bv app - - - hi",
            b"<14>1 - ../etc app - - - hi",
        ];
        for raw in datagrams {
            assert_eq!(parse(raw), Err(ParseError::UNROUTABLE_HOSTNAME), "{raw:?}");
        }
    }

    #[test]
    fn trailing_newline_is_trimmed() {
        let msg = parse(b"<13>Feb  5 17:32:18 10.0.0.99 myapp: hi\n").unwrap();
        assert_eq!(msg.text(fields::CONTENT), Some("hi"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let msg = parse(b"<13>Feb  5 17:32:18 host app: caf\xe9").unwrap();
        assert_eq!(msg.text(fields::CONTENT), Some("caf\u{fffd}"));
    }

    #[test]
    fn next_token_splits_on_single_space() {
        assert_eq!(next_token("a b c"), Some(("a", "b c")));
        assert_eq!(next_token("last"), Some(("last", "")));
        assert_eq!(next_token(" lead"), None);
        assert_eq!(next_token(""), None);
    }
}
