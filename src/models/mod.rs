pub mod assignments;
pub mod contract_dates;
pub mod contracts;

use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Musician id the agency reserves for "no assignments yet" rows.
pub const PLACEHOLDER_MUSICIAN_ID: i64 = 999;

/// A musician identifier exactly as the backend delivered it.
///
/// The backend has sent both numbers and strings here (and, as object keys,
/// always strings), so the raw text is kept and parsed on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawId(String);

impl RawId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Positive integer ids only; anything else is malformed.
    pub fn parse(&self) -> Option<i64> {
        self.0.trim().parse::<i64>().ok().filter(|id| *id > 0)
    }
}

impl From<i64> for RawId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for RawId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for RawId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(s) => RawId(s),
            serde_json::Value::Null => RawId::default(),
            other => RawId(other.to_string()),
        })
    }
}

impl Serialize for RawId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.parse() {
            Some(id) => serializer.serialize_i64(id),
            None => serializer.serialize_str(&self.0),
        }
    }
}

/// Opaque token for the unauthenticated musician response link.
///
/// Never parsed or compared for order, and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseToken(String);

impl ResponseToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ResponseToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResponseToken(<redacted>)")
    }
}

/// Dates arrive as `YYYY-MM-DD` or as full RFC 3339 timestamps.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

pub(crate) mod flexible_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{raw}`")))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_id_accepts_numbers_and_numeric_strings() {
        let from_number: RawId = serde_json::from_str("5").unwrap();
        let from_string: RawId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(from_number.parse(), Some(5));
        assert_eq!(from_string.parse(), Some(12));
    }

    #[test]
    fn raw_id_rejects_malformed_values() {
        for raw in ["\"abc\"", "null", "-3", "0", "4.5", "\"\""] {
            let id: RawId = serde_json::from_str(raw).unwrap();
            assert_eq!(id.parse(), None, "{raw} should not parse");
        }
    }

    #[test]
    fn dates_accept_timestamps() {
        assert_eq!(parse_date("2024-06-01"), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(
            parse_date("2024-06-03T18:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 6, 3)
        );
        assert_eq!(
            parse_date("2024-06-04 20:00:00"),
            NaiveDate::from_ymd_opt(2024, 6, 4)
        );
        assert_eq!(parse_date("June 1st"), None);
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = ResponseToken::new("f3a9c0d2-secret");
        assert!(!format!("{token:?}").contains("secret"));
    }
}
