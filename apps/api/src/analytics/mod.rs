//! Admin dashboard aggregates.

pub mod handlers;

use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::opportunity::{ApprovalStatus, OpportunityType};

const TOP_OPPORTUNITIES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TopOpportunity {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub applications: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub total_opportunities: i64,
    pub by_type: BTreeMap<String, i64>,
    pub by_status: BTreeMap<String, i64>,
    pub total_users: i64,
    pub total_bookmarks: i64,
    pub total_applications: i64,
    pub top_opportunities: Vec<TopOpportunity>,
}

/// Raw aggregates as read from Postgres.
#[derive(Debug, Default)]
pub struct RawCounts {
    pub by_type: Vec<(String, i64)>,
    pub by_status: Vec<(String, i64)>,
    pub users: i64,
    pub bookmarks: i64,
    pub applications: i64,
    pub top: Vec<TopOpportunity>,
}

/// Every known type and status is present in the output, zero when unused.
/// Unknown values from the database are kept as-is.
pub fn assemble(raw: RawCounts) -> AnalyticsReport {
    let mut by_type: BTreeMap<String, i64> = OpportunityType::ALL
        .iter()
        .map(|t| (t.as_str().to_string(), 0))
        .collect();
    for (ty, count) in raw.by_type {
        *by_type.entry(ty).or_default() += count;
    }

    let mut by_status: BTreeMap<String, i64> = [
        ApprovalStatus::Pending,
        ApprovalStatus::Approved,
        ApprovalStatus::Rejected,
    ]
    .iter()
    .map(|s| (s.as_str().to_string(), 0))
    .collect();
    for (status, count) in raw.by_status {
        *by_status.entry(status).or_default() += count;
    }

    AnalyticsReport {
        total_opportunities: by_status.values().sum(),
        by_type,
        by_status,
        total_users: raw.users,
        total_bookmarks: raw.bookmarks,
        total_applications: raw.applications,
        top_opportunities: raw.top,
    }
}

pub async fn load_counts(pool: &PgPool) -> Result<RawCounts, sqlx::Error> {
    let by_type = sqlx::query_as::<_, (String, i64)>(
        "SELECT opportunity_type, COUNT(*) FROM opportunities GROUP BY opportunity_type",
    )
    .fetch_all(pool)
    .await?;

    let by_status = sqlx::query_as::<_, (String, i64)>(
        "SELECT status, COUNT(*) FROM opportunities GROUP BY status",
    )
    .fetch_all(pool)
    .await?;

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await?;
    let bookmarks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookmarks")
        .fetch_one(pool)
        .await?;
    let applications: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications")
        .fetch_one(pool)
        .await?;

    let top = sqlx::query_as::<_, TopOpportunity>(
        r#"
        SELECT o.id, o.title, o.company, COUNT(a.id) AS applications
        FROM opportunities o
        JOIN applications a ON a.opportunity_id = o.id
        GROUP BY o.id, o.title, o.company
        ORDER BY applications DESC, o.title ASC
        LIMIT $1
        "#,
    )
    .bind(TOP_OPPORTUNITIES)
    .fetch_all(pool)
    .await?;

    Ok(RawCounts {
        by_type,
        by_status,
        users,
        bookmarks,
        applications,
        top,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_buckets_are_zero_filled() {
        let report = assemble(RawCounts {
            by_type: vec![("internship".to_string(), 4), ("job".to_string(), 2)],
            by_status: vec![("approved".to_string(), 5), ("pending".to_string(), 1)],
            ..Default::default()
        });
        assert_eq!(report.by_type.len(), 5);
        assert_eq!(report.by_type["internship"], 4);
        assert_eq!(report.by_type["event"], 0);
        assert_eq!(report.by_status["rejected"], 0);
        assert_eq!(report.total_opportunities, 6);
    }

    #[test]
    fn test_unknown_values_are_kept() {
        let report = assemble(RawCounts {
            by_type: vec![("gig".to_string(), 1)],
            by_status: vec![("archived".to_string(), 1)],
            ..Default::default()
        });
        assert_eq!(report.by_type["gig"], 1);
        assert_eq!(report.by_status["archived"], 1);
        assert_eq!(report.total_opportunities, 1);
    }

    #[test]
    fn test_totals_and_top_pass_through() {
        let top = vec![TopOpportunity {
            id: Uuid::nil(),
            title: "Backend Intern".to_string(),
            company: "Acme".to_string(),
            applications: 12,
        }];
        let report = assemble(RawCounts {
            users: 40,
            bookmarks: 17,
            applications: 12,
            top: top.clone(),
            ..Default::default()
        });
        assert_eq!(report.total_users, 40);
        assert_eq!(report.total_bookmarks, 17);
        assert_eq!(report.total_applications, 12);
        assert_eq!(report.top_opportunities, top);
        assert_eq!(report.total_opportunities, 0);
    }
}
