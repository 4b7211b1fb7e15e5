use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::option_fields::OptionField, errors::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        use SessionStatus::*;

        matches!(
            (self, next),
            (Scheduled, Ongoing) | (Scheduled, Completed) | (Scheduled, Cancelled)
                | (Ongoing, Completed) | (Ongoing, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Ongoing => "ongoing",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct SkillSwapSession {
    pub id: Uuid,
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub skill_a_id: Uuid,
    pub skill_b_id: Uuid,
    pub status: SessionStatus,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SkillSwapSession {
    pub fn has_participant(&self, user_id: &Uuid) -> bool {
        self.user_a_id == *user_id || self.user_b_id == *user_id
    }
}

/// Body of `POST /sessions`. The caller becomes `user_a`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub partner_id: Option<Uuid>,

    pub skill_a_id: Option<Uuid>,

    pub skill_b_id: Option<Uuid>,

    pub scheduled_at: Option<String>,

    #[serde(default = "default_duration")]
    #[validate(range(min = 1, max = 1440, message = "Must be between 1 and 1440 minutes"))]
    pub duration_minutes: i32,

    #[validate(length(max = 2000, message = "Must be at most 2000 characters"))]
    pub notes: Option<String>,
}

fn default_duration() -> i32 {
    60
}

#[derive(Debug, Clone)]
pub struct SessionInsert {
    pub user_a_id: Uuid,
    pub user_b_id: Uuid,
    pub skill_a_id: Uuid,
    pub skill_b_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

/// Body of `PATCH /sessions/{id}`. Carries no participant fields.
#[derive(Debug, Deserialize, Validate)]
pub struct RescheduleSessionRequest {
    pub scheduled_at: Option<String>,

    pub skill_a_id: Option<Uuid>,

    pub skill_b_id: Option<Uuid>,

    #[validate(range(min = 1, max = 1440, message = "Must be between 1 and 1440 minutes"))]
    pub duration_minutes: Option<i32>,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Must be at most 2000 characters"))]
    pub notes: OptionField<String>,
}

/// Fully resolved values written by a reschedule.
#[derive(Debug, Clone)]
pub struct SessionReschedule {
    pub scheduled_at: DateTime<Utc>,
    pub skill_a_id: Uuid,
    pub skill_b_id: Uuid,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,
}

/// Accepts RFC 3339 or the `YYYY-MM-DDTHH:MM[:SS]` shape of HTML
/// `datetime-local` inputs, which is read as UTC.
pub fn parse_scheduled_at(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::invalid_field("scheduled_at", "Invalid date/time"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn terminal_states_have_no_exits() {
        for next in [
            SessionStatus::Scheduled,
            SessionStatus::Ongoing,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert!(!SessionStatus::Completed.can_transition_to(next));
            assert!(!SessionStatus::Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn ongoing_cannot_return_to_scheduled() {
        assert!(SessionStatus::Scheduled.can_transition_to(SessionStatus::Ongoing));
        assert!(!SessionStatus::Ongoing.can_transition_to(SessionStatus::Scheduled));
    }

    #[test]
    fn parses_rfc3339_and_datetime_local() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 1, 14, 30, 0).unwrap();

        assert_eq!(parse_scheduled_at("2026-03-01T14:30:00Z").unwrap(), expected);
        assert_eq!(parse_scheduled_at("2026-03-01T16:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_scheduled_at("2026-03-01T14:30").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_dates() {
        let err = parse_scheduled_at("next tuesday").unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
