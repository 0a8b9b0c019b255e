//! Persisted form of sessions.
//!
//! Older records were written by clients that stored `total_pause_duration`
//! as a string, and some never wrote `duration_minutes`. The DTO accepts both
//! shapes and normalizes them before the domain model sees the data.

use chrono::{DateTime, Utc};
use paddock_core::error::{PaddockError, Result};
use paddock_core::session::{DEFAULT_DURATION_MINUTES, Group, Session, SessionStatus};
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDto {
    pub id: String,
    pub group: Group,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_start: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_millis")]
    pub total_pause_duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_duration_minutes() -> u32 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Millis {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Reads a millisecond count stored as an integer, a float, or a numeric string.
fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = match Millis::deserialize(deserializer)? {
        Millis::Int(n) => n,
        Millis::Float(f) => f as i64,
        Millis::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                0
            } else {
                text.parse::<i64>()
                    .or_else(|_| text.parse::<f64>().map(|f| f as i64))
                    .map_err(|_| {
                        de::Error::custom(format!("invalid pause duration '{text}'"))
                    })?
            }
        }
    };
    Ok(millis.max(0))
}

impl From<&Session> for SessionDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            group: session.group,
            status: session.status,
            start_time: session.start_time,
            duration_minutes: session.duration_minutes,
            pause_start: session.pause_start,
            total_pause_duration: session.total_pause_duration_ms,
            end_time: session.end_time,
            created_at: Some(session.created_at),
        }
    }
}

impl TryFrom<SessionDto> for Session {
    type Error = PaddockError;

    fn try_from(dto: SessionDto) -> Result<Self> {
        let session = Session {
            created_at: dto.created_at.unwrap_or(dto.start_time),
            id: dto.id,
            group: dto.group,
            status: dto.status,
            start_time: dto.start_time,
            duration_minutes: dto.duration_minutes,
            pause_start: dto.pause_start,
            total_pause_duration_ms: dto.total_pause_duration,
            end_time: dto.end_time,
        };
        session.validate()?;
        Ok(session)
    }
}

/// Whole-file layout of `sessions.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStoreDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<SessionDto>,
    /// Completed sessions in completion order, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<SessionDto>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use paddock_core::session::SessionDuration;

    fn parse(extra: &str) -> SessionDto {
        let doc = format!(
            "id = \"s-1\"\ngroup = \"basic\"\nstatus = \"running\"\nstart_time = \"2024-06-01T10:00:00Z\"\n{extra}"
        );
        toml::from_str(&doc).unwrap()
    }

    #[test]
    fn test_pause_duration_accepts_string_and_number() {
        assert_eq!(parse("total_pause_duration = 120000").total_pause_duration, 120_000);
        assert_eq!(parse("total_pause_duration = \"120000\"").total_pause_duration, 120_000);
        assert_eq!(parse("total_pause_duration = \" 90 \"").total_pause_duration, 90);
        assert_eq!(parse("total_pause_duration = \"\"").total_pause_duration, 0);
        assert_eq!(parse("").total_pause_duration, 0);
    }

    #[test]
    fn test_garbage_pause_duration_is_rejected() {
        let doc = "id = \"s-1\"\ngroup = \"basic\"\nstatus = \"running\"\nstart_time = \"2024-06-01T10:00:00Z\"\ntotal_pause_duration = \"soon\"";
        assert!(toml::from_str::<SessionDto>(doc).is_err());
    }

    #[test]
    fn test_missing_duration_defaults() {
        let dto = parse("");
        assert_eq!(dto.duration_minutes, 15);
        let session = Session::try_from(dto).unwrap();
        assert_eq!(session.created_at, session.start_time);
    }

    #[test]
    fn test_inconsistent_record_is_refused() {
        let dto = parse("pause_start = \"2024-06-01T10:05:00Z\"");
        assert!(Session::try_from(dto).unwrap_err().is_validation());
    }

    #[test]
    fn test_domain_round_trip_preserves_fields() {
        let now = Utc::now();
        let mut session = Session::start(Group::Advanced, SessionDuration::default(), now);
        session.pause(now).unwrap();

        let text = toml::to_string_pretty(&SessionDto::from(&session)).unwrap();
        let back = Session::try_from(toml::from_str::<SessionDto>(&text).unwrap()).unwrap();
        assert_eq!(back, session);
    }
}
