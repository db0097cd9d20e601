use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque message identifier. The backend may hand out numbers or strings;
/// the original JSON form is kept so it round-trips into request paths.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(i64),
    /// Any other JSON number: fractional, exponent form, or beyond `i64`.
    OtherNumber(serde_json::Number),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{}", n),
            MessageId::OtherNumber(n) => match n.as_f64() {
                Some(v) => f.write_str(&js_number(v)),
                None => write!(f, "{}", n),
            },
            MessageId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Render a double the way a browser's `Number#toString` does, so ids land
/// in request paths in the form the backend's web client uses.
fn js_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let abs = v.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", v);
    }
    // exponent form: `1e21` becomes `1e+21`
    let s = format!("{:e}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => s,
    }
}

impl From<i64> for MessageId {
    fn from(n: i64) -> Self {
        MessageId::Number(n)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        MessageId::Text(s.to_string())
    }
}

/// `received_at` as sent by the backend: an ISO 8601 string or epoch millis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReceivedAt {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl ReceivedAt {
    /// Resolve to local time. Strings without an offset are read as local
    /// time, bare dates as UTC midnight.
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        match self {
            ReceivedAt::Millis(ms) => {
                DateTime::<Utc>::from_timestamp_millis(*ms).map(|dt| dt.with_timezone(&Local))
            }
            ReceivedAt::Fractional(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(*ms as i64)
                    .map(|dt| dt.with_timezone(&Local))
            }
            ReceivedAt::Fractional(_) => None,
            ReceivedAt::Text(s) => parse_timestamp(s.trim()),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&Local))
}

/// A received message. Server-owned: never mutated after parsing, display
/// fallbacks are computed by the panes that render it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub id: MessageId,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub to: Option<Vec<String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub received_at: Option<ReceivedAt>,
}

/// Payload of `POST /api/send`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Body of a rejected send.
#[derive(Debug, Default, Deserialize)]
pub struct SendErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
