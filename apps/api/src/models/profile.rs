use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One row per user; `id` is the user id forwarded by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub headline: Option<String>,
    pub skills: Vec<String>,
    /// Structured `ResumeDocument` as last saved.
    pub resume: Option<Value>,
    pub resume_text: Option<String>,
    pub resume_pdf_key: Option<String>,
    pub email_opt_in: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// PATCH body for the caller's own profile. Role is not self-editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub headline: Option<String>,
    pub skills: Option<Vec<String>>,
    pub email_opt_in: Option<bool>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(email) = &self.email {
            let email = email.trim();
            if email.is_empty() || !email.contains('@') {
                return Err(format!("'{email}' is not a valid email address"));
            }
        }
        if self.full_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("full_name cannot be empty".to_string());
        }
        Ok(())
    }

    /// Skills trimmed, blanks dropped, case-insensitive duplicates removed.
    pub fn normalized_skills(&self) -> Option<Vec<String>> {
        self.skills.as_ref().map(|skills| {
            let mut out: Vec<String> = Vec::with_capacity(skills.len());
            for skill in skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
                if !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                    out.push(skill.to_string());
                }
            }
            out
        })
    }
}
