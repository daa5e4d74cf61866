//! Utility functions for the provisioning service

use chrono::{DateTime, SubsecRound, Utc};

/// Formats a DateTime to SCIM 2.0 compliant XSD dateTime format
///
/// Timestamps carry millisecond precision and a literal `Z` suffix.
///
/// Example output: "2025-06-14T10:03:54.374Z"
pub fn format_scim_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses any RFC 3339 timestamp back into UTC
pub fn parse_scim_datetime(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// Current time truncated to the precision that survives storage
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Gets the current time formatted for SCIM 2.0
pub fn current_scim_datetime() -> String {
    format_scim_datetime(now_millis())
}

/// serde adapter for `DateTime<Utc>` fields in the SCIM wire format
pub mod scim_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_scim_datetime(*dt))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_scim_datetime(&raw).map_err(serde::de::Error::custom)
    }
}
