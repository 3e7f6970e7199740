//! Custom serde helpers for backend wire formats.
//!
//! The GraphQL backend echoes numeric columns as either numbers or strings
//! depending on column type, and timestamp columns as either ISO text or epoch
//! milliseconds. These helpers accept every shape it has been seen to send.

/// Deserializes a number or string into its decimal text.
pub mod text_or_number {
    use serde::{Deserialize, Deserializer};

    use crate::shared::{numeric_to_text, WireValue};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = WireValue::deserialize(deserializer)?;
        Ok(numeric_to_text(&value))
    }
}

/// Deserializes an RFC-3339 timestamp, or a zone-less
/// `YYYY-MM-DDTHH:MM:SS[.fff]` one read as UTC.
///
/// Postgres `timestamp without time zone` columns come back without an offset.
pub mod flexible_timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", raw)))
    }

    pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// Deserializes Unix milliseconds, sent as a number or numeric string, into
/// `DateTime<Utc>`.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    use crate::shared::{parse_timestamp, WireValue};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = WireValue::deserialize(deserializer)?;
        parse_timestamp(&value).map_err(serde::de::Error::custom)
    }
}

/// Deserializes any timestamp shape the backend sends: epoch milliseconds
/// (number or text), RFC-3339, or zone-less ISO text read as UTC.
pub mod loose_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    use crate::shared::{parse_timestamp, WireValue};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = WireValue::deserialize(deserializer)?;
        if let WireValue::Text(raw) = &value {
            if let Some(t) = super::flexible_timestamp::parse(raw.trim()) {
                return Ok(t);
            }
        }
        parse_timestamp(&value).map_err(serde::de::Error::custom)
    }
}
