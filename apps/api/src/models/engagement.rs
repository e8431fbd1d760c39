use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub opportunity_id: Uuid,
    pub status: String,
    pub cover_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Submitted,
    Reviewing,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "submitted" => Ok(ApplicationStatus::Submitted),
            "reviewing" => Ok(ApplicationStatus::Reviewing),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "withdrawn" => Ok(ApplicationStatus::Withdrawn),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

/// Who is attempting a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Admin,
    Owner,
}

/// Admins move applications through review; applicants may only withdraw.
/// Withdrawn applications are frozen for everyone.
pub fn check_transition(
    actor: Actor,
    from: ApplicationStatus,
    to: ApplicationStatus,
) -> Result<(), String> {
    if from == ApplicationStatus::Withdrawn {
        return Err("application has been withdrawn".to_string());
    }
    if from == to {
        return Ok(());
    }
    match actor {
        Actor::Owner if to == ApplicationStatus::Withdrawn && !from.is_final() => Ok(()),
        Actor::Owner => Err("applicants may only withdraw an open application".to_string()),
        Actor::Admin if to == ApplicationStatus::Withdrawn => {
            Err("only the applicant can withdraw".to_string())
        }
        Actor::Admin => Ok(()),
    }
}
