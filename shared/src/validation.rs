use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::ElectionConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("timestamp is not valid RFC 3339: {0}")]
    Unparsable(String),
    #[error("start time must be before end time")]
    EmptyWindow,
}

/// Voter IDs are opaque strings compared case-insensitively with surrounding
/// whitespace ignored. Both the eligibility roll and the voter-record table
/// key on this form.
pub fn normalize_voter_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Parses and validates an admin window update. The caller keeps its current
/// config on any error.
pub fn parse_config_update(start: &str, end: &str) -> Result<ElectionConfig, ConfigError> {
    let start_time = OffsetDateTime::parse(start, &Rfc3339)
        .map_err(|_| ConfigError::Unparsable(start.to_owned()))?;
    let end_time = OffsetDateTime::parse(end, &Rfc3339)
        .map_err(|_| ConfigError::Unparsable(end.to_owned()))?;
    if start_time >= end_time {
        return Err(ConfigError::EmptyWindow);
    }
    Ok(ElectionConfig { start_time, end_time })
}
