//! Lenient calendar-date deserialization.
//!
//! Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp. For timestamps the
//! date is taken in the timestamp's own offset. Serialization stays `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|ts| ts.date_naive()))
        .map_err(|_| format!("invalid date `{value}`, expected YYYY-MM-DD or an RFC 3339 timestamp"))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).map_err(de::Error::custom)
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|value| parse_date(&value).map_err(de::Error::custom))
        .transpose()
}
