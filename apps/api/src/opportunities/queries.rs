use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::opportunity::{ApprovalStatus, NewOpportunity, OpportunityRow, OpportunityType};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query-string filters for the listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityFilter {
    /// Free-text search over title, company and description.
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub opportunity_type: Option<OpportunityType>,
    pub location: Option<String>,
    pub tag: Option<String>,
    pub status: Option<ApprovalStatus>,
    /// Only the caller's own submissions, any status.
    #[serde(default)]
    pub mine: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl OpportunityFilter {
    pub fn page_size(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn page_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Who is asking, as far as row visibility is concerned.
#[derive(Debug, Clone, Copy)]
pub struct Viewer {
    pub user_id: Uuid,
    pub is_admin: bool,
}

pub async fn insert_opportunity(
    pool: &PgPool,
    draft: &NewOpportunity,
    submitted_by: Uuid,
    status: ApprovalStatus,
) -> Result<OpportunityRow, sqlx::Error> {
    sqlx::query_as::<_, OpportunityRow>(
        r#"
        INSERT INTO opportunities
            (title, company, location, opportunity_type, description, requirements,
             deadline, salary_min, salary_max, source_url, tags, submitted_by, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(draft.title.trim())
    .bind(draft.company.trim())
    .bind(draft.location.trim())
    .bind(draft.opportunity_type.as_str())
    .bind(&draft.description)
    .bind(&draft.requirements)
    .bind(draft.deadline)
    .bind(draft.salary_min)
    .bind(draft.salary_max)
    .bind(&draft.source_url)
    .bind(&draft.tags)
    .bind(submitted_by)
    .bind(status.as_str())
    .fetch_one(pool)
    .await
}

pub async fn get_opportunity(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<OpportunityRow>, sqlx::Error> {
    sqlx::query_as::<_, OpportunityRow>("SELECT * FROM opportunities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_opportunities(
    pool: &PgPool,
    viewer: Viewer,
    filter: &OpportunityFilter,
) -> Result<Vec<OpportunityRow>, sqlx::Error> {
    let mut qb = build_list_query(viewer, filter);
    qb.build_query_as::<OpportunityRow>().fetch_all(pool).await
}

/// Non-admins see approved listings, plus their own when `mine` is set.
pub fn build_list_query(
    viewer: Viewer,
    filter: &OpportunityFilter,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM opportunities WHERE TRUE");

    if filter.mine {
        qb.push(" AND submitted_by = ").push_bind(viewer.user_id);
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
    } else if viewer.is_admin {
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
    } else {
        qb.push(" AND status = ")
            .push_bind(ApprovalStatus::Approved.as_str());
    }

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", escape_like(q));
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(ty) = filter.opportunity_type {
        qb.push(" AND opportunity_type = ").push_bind(ty.as_str());
    }
    if let Some(location) = filter
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
    {
        qb.push(" AND location ILIKE ")
            .push_bind(format!("%{}%", escape_like(location)));
    }
    if let Some(tag) = filter.tag.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        qb.push(" AND ").push_bind(tag.to_string()).push(" = ANY(tags)");
    }

    qb.push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(filter.page_size())
        .push(" OFFSET ")
        .push_bind(filter.page_offset());
    qb
}

pub async fn update_opportunity(
    pool: &PgPool,
    id: Uuid,
    draft: &NewOpportunity,
    status: ApprovalStatus,
) -> Result<Option<OpportunityRow>, sqlx::Error> {
    sqlx::query_as::<_, OpportunityRow>(
        r#"
        UPDATE opportunities SET
            title = $2, company = $3, location = $4, opportunity_type = $5,
            description = $6, requirements = $7, deadline = $8, salary_min = $9,
            salary_max = $10, source_url = $11, tags = $12, status = $13,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(draft.title.trim())
    .bind(draft.company.trim())
    .bind(draft.location.trim())
    .bind(draft.opportunity_type.as_str())
    .bind(&draft.description)
    .bind(&draft.requirements)
    .bind(draft.deadline)
    .bind(draft.salary_min)
    .bind(draft.salary_max)
    .bind(&draft.source_url)
    .bind(&draft.tags)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    status: ApprovalStatus,
    rejection_reason: Option<&str>,
) -> Result<Option<OpportunityRow>, sqlx::Error> {
    sqlx::query_as::<_, OpportunityRow>(
        r#"
        UPDATE opportunities
        SET status = $2, rejection_reason = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(rejection_reason)
    .fetch_optional(pool)
    .await
}

pub async fn delete_opportunity(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM opportunities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Escapes `%`, `_` and `\` so user input is matched literally by ILIKE.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer(is_admin: bool) -> Viewer {
        Viewer {
            user_id: Uuid::new_v4(),
            is_admin,
        }
    }

    #[test]
    fn test_page_size_is_clamped() {
        let mut f = OpportunityFilter::default();
        assert_eq!(f.page_size(), DEFAULT_PAGE_SIZE);
        f.limit = Some(10_000);
        assert_eq!(f.page_size(), MAX_PAGE_SIZE);
        f.limit = Some(0);
        assert_eq!(f.page_size(), 1);
        f.offset = Some(-5);
        assert_eq!(f.page_offset(), 0);
    }

    #[test]
    fn test_students_only_see_approved() {
        let filter = OpportunityFilter {
            status: Some(ApprovalStatus::Pending),
            ..Default::default()
        };
        let qb = build_list_query(viewer(false), &filter);
        let sql = qb.sql();
        assert!(sql.contains("status = $1"), "{sql}");
        assert!(!sql.contains("submitted_by"));
    }

    #[test]
    fn test_admin_without_status_sees_everything() {
        let qb = build_list_query(viewer(true), &OpportunityFilter::default());
        let sql = qb.sql();
        assert!(!sql.contains("status ="), "{sql}");
    }

    #[test]
    fn test_mine_filters_by_submitter() {
        let filter = OpportunityFilter {
            mine: true,
            ..Default::default()
        };
        let qb = build_list_query(viewer(false), &filter);
        let sql = qb.sql();
        assert!(sql.contains("submitted_by = $1"), "{sql}");
    }

    #[test]
    fn test_search_and_tag_filters_bind_parameters() {
        let filter = OpportunityFilter {
            q: Some("rust".to_string()),
            tag: Some("Remote".to_string()),
            opportunity_type: Some(OpportunityType::Internship),
            ..Default::default()
        };
        let qb = build_list_query(viewer(false), &filter);
        let sql = qb.sql();
        assert!(sql.contains("title ILIKE $2"), "{sql}");
        assert!(sql.contains("opportunity_type = $5"), "{sql}");
        assert!(sql.contains("$6 = ANY(tags)"), "{sql}");
        assert!(sql.ends_with("LIMIT $7 OFFSET $8"), "{sql}");
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = OpportunityFilter {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        let qb = build_list_query(viewer(true), &filter);
        let sql = qb.sql();
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
    }

    #[test]
    fn test_filter_deserializes_type_alias() {
        let f: OpportunityFilter =
            serde_json::from_str(r#"{"type":"scholarship","limit":5}"#).unwrap();
        assert_eq!(f.opportunity_type, Some(OpportunityType::Scholarship));
        assert_eq!(f.page_size(), 5);
        assert!(!f.mine);
    }
}
