use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of listing. Stored as lowercase text in `opportunities.opportunity_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    #[default]
    Job,
    Internship,
    Scholarship,
    Fellowship,
    Event,
}

impl OpportunityType {
    pub const ALL: [OpportunityType; 5] = [
        OpportunityType::Job,
        OpportunityType::Internship,
        OpportunityType::Scholarship,
        OpportunityType::Fellowship,
        OpportunityType::Event,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::Job => "job",
            OpportunityType::Internship => "internship",
            OpportunityType::Scholarship => "scholarship",
            OpportunityType::Fellowship => "fellowship",
            OpportunityType::Event => "event",
        }
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpportunityType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown opportunity type '{s}'"))
    }
}

/// Moderation state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            other => Err(format!("unknown approval status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OpportunityRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub opportunity_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub source_url: Option<String>,
    pub tags: Vec<String>,
    pub submitted_by: Uuid,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload shared by the create endpoint and the bulk importer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOpportunity {
    pub title: String,
    pub company: String,
    pub location: String,
    pub opportunity_type: OpportunityType,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub deadline: Option<NaiveDate>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewOpportunity {
    /// Returns a human-readable reason when the payload is not storable.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title cannot be empty".to_string());
        }
        if self.company.trim().is_empty() {
            return Err("company cannot be empty".to_string());
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(format!("salary_min ({min}) exceeds salary_max ({max})"));
            }
        }
        if self.salary_min.is_some_and(|v| v < 0) || self.salary_max.is_some_and(|v| v < 0) {
            return Err("salary bounds must be non-negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewOpportunity {
        NewOpportunity {
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            opportunity_type: OpportunityType::Job,
            description: String::new(),
            requirements: vec![],
            deadline: None,
            salary_min: Some(50_000),
            salary_max: Some(70_000),
            source_url: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_type_round_trips_through_str() {
        for t in OpportunityType::ALL {
            assert_eq!(t.as_str().parse::<OpportunityType>().unwrap(), t);
        }
        assert_eq!(
            "Internship".parse::<OpportunityType>().unwrap(),
            OpportunityType::Internship
        );
        assert!("gig".parse::<OpportunityType>().is_err());
    }

    #[test]
    fn test_type_serde_is_snake_case() {
        let json = serde_json::to_string(&OpportunityType::Fellowship).unwrap();
        assert_eq!(json, r#""fellowship""#);
    }

    #[test]
    fn test_validate_accepts_sane_payload() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_salary() {
        let mut opp = sample();
        opp.salary_min = Some(90_000);
        let err = opp.validate().unwrap_err();
        assert!(err.contains("exceeds"), "{err}");
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        let mut opp = sample();
        opp.title = "   ".to_string();
        assert!(opp.validate().is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "Approved".parse::<ApprovalStatus>().unwrap(),
            ApprovalStatus::Approved
        );
        assert!("archived".parse::<ApprovalStatus>().is_err());
    }
}
