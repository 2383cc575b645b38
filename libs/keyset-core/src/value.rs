use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// Declared type of a sortable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Timestamp,
}

impl ValueKind {
    /// Coerce raw query text into a typed value of this kind.
    pub fn parse(self, raw: &str) -> Result<TypedValue, String> {
        match self {
            ValueKind::String => Ok(TypedValue::String(raw.to_owned())),
            ValueKind::Timestamp => DateTime::parse_from_rfc3339(raw)
                .map(|dt| TypedValue::Timestamp(dt.with_timezone(&Utc)))
                .map_err(|e| format!("expected an RFC 3339 timestamp, got '{raw}' ({e})")),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Timestamp => "timestamp",
        }
    }
}

/// A sort-key value as seen by the engine.
///
/// Variant order is significant: the derived `Ord` puts `Null` before every
/// non-null value, which is the null-ordering convention of the whole engine.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypedValue {
    Null,
    String(String),
    Timestamp(DateTime<Utc>),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            TypedValue::Null => None,
            TypedValue::String(_) => Some(ValueKind::String),
            TypedValue::Timestamp(_) => Some(ValueKind::Timestamp),
        }
    }

    /// Text form accepted back by [`ValueKind::parse`]; `None` for null.
    pub fn to_raw(&self) -> Option<String> {
        match self {
            TypedValue::Null => None,
            TypedValue::String(s) => Some(s.clone()),
            TypedValue::Timestamp(ts) => Some(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_raw() {
            Some(raw) => f.write_str(&raw),
            None => f.write_str("null"),
        }
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_owned())
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(ts: DateTime<Utc>) -> Self {
        TypedValue::Timestamp(ts)
    }
}

impl<T> From<Option<T>> for TypedValue
where
    T: Into<TypedValue>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(TypedValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn null_sorts_before_everything() {
        let ts = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert!(TypedValue::Null < TypedValue::String(String::new()));
        assert!(TypedValue::Null < TypedValue::Timestamp(ts));
        assert_eq!(TypedValue::Null.cmp(&TypedValue::Null), std::cmp::Ordering::Equal);
    }

    #[test]
    fn timestamps_parse_and_render_rfc3339() {
        let v = ValueKind::Timestamp
            .parse("2024-03-01T10:00:00+02:00")
            .expect("valid timestamp");
        assert_eq!(v.to_raw().as_deref(), Some("2024-03-01T08:00:00Z"));
        let back = ValueKind::Timestamp.parse(&v.to_raw().unwrap()).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        let err = ValueKind::Timestamp.parse("yesterday").unwrap_err();
        assert!(err.contains("RFC 3339"));
    }

    #[test]
    fn strings_compare_bytewise() {
        assert!(TypedValue::from("B") < TypedValue::from("a"));
        assert!(TypedValue::from("x") < TypedValue::from("y"));
    }
}
