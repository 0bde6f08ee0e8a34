//! LogMessage - Parser output, Dispatcher input
//!
//! The decoded unit flowing through the pipeline.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize, Serializer};

/// Well-known field names
pub mod fields {
    /// Routing key, always present
    pub const HOSTNAME: &str = "hostname";
    pub const PRIORITY: &str = "priority";
    pub const FACILITY: &str = "facility";
    pub const SEVERITY: &str = "severity";
    pub const TIMESTAMP: &str = "timestamp";
    /// RFC 3164 program name
    pub const TAG: &str = "tag";
    pub const PROC_ID: &str = "proc_id";
    /// RFC 3164 free text
    pub const CONTENT: &str = "content";
    pub const VERSION: &str = "version";
    pub const APP_NAME: &str = "app_name";
    pub const MSG_ID: &str = "msg_id";
    pub const STRUCTURED_DATA: &str = "structured_data";
    /// RFC 5424 free text
    pub const MESSAGE: &str = "message";
    /// Detected framing
    pub const DIALECT: &str = "dialect";
    /// Sender address, added by the receiver
    pub const CLIENT: &str = "client";
}

/// Syslog grammar a message was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// BSD syslog: `<PRI>TIMESTAMP HOSTNAME TAG: MSG`
    Rfc3164,
    /// IETF syslog: `<PRI>VERSION TIMESTAMP HOSTNAME APP-NAME PROCID MSGID SD MSG`
    Rfc5424,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Rfc3164 => "rfc3164",
            Dialect::Rfc5424 => "rfc5424",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "rfc3164" => Some(Dialect::Rfc3164),
            "rfc5424" => Some(Dialect::Rfc5424),
            _ => None,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    /// Timezone-aware instant
    Timestamp(DateTime<FixedOffset>),
}

impl FieldValue {
    /// Text content, if this is a text value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Instant, if this is a timestamp value
    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            FieldValue::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Int(v) => serializer.serialize_i64(*v),
            FieldValue::Timestamp(_) => serializer.collect_str(self),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Int(i64::from(value))
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// Whether `hostname` can name a per-host directory
///
/// It must be a single non-empty path component: not `.` or `..`, no path
/// separators, no whitespace and no control characters.
pub fn is_routable_hostname(hostname: &str) -> bool {
    !hostname.is_empty()
        && hostname != "."
        && hostname != ".."
        && !hostname
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_whitespace() || c.is_control())
}

/// Decoded syslog message
///
/// Always carries a non-empty `hostname`; the parser never builds one
/// without it. Fields are kept sorted by name so every rendering of the
/// same message is identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LogMessage {
    fields: BTreeMap<String, FieldValue>,
}

impl LogMessage {
    /// Create a message routed to `hostname`
    pub fn new(hostname: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(
            fields::HOSTNAME.to_string(),
            FieldValue::Text(hostname.into()),
        );
        Self { fields: map }
    }

    /// Add a field
    ///
    /// The routing key is fixed at construction; attempts to replace
    /// `hostname` are ignored.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let name = name.into();
        if name != fields::HOSTNAME {
            self.fields.insert(name, value.into());
        }
        self
    }

    /// Add a field when a value is present
    pub fn with_optional_field<V: Into<FieldValue>>(
        self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(value) => self.with_field(name, value),
            None => self,
        }
    }

    /// Routing key
    pub fn hostname(&self) -> &str {
        self.fields
            .get(fields::HOSTNAME)
            .and_then(FieldValue::as_str)
            .unwrap_or_default()
    }

    /// Detected dialect, if the parser recorded one
    pub fn dialect(&self) -> Option<Dialect> {
        self.text(fields::DIALECT).and_then(Dialect::from_name)
    }

    /// Look up a field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Look up a text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Look up an integer field
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_int)
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields, `hostname` included
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: `hostname` is mandatory
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
