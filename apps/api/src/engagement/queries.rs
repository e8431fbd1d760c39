use sqlx::PgPool;
use uuid::Uuid;

use crate::models::engagement::{ApplicationRow, ApplicationStatus};
use crate::models::opportunity::OpportunityRow;

/// Returns `true` when a new bookmark was created.
pub async fn add_bookmark(
    pool: &PgPool,
    user_id: Uuid,
    opportunity_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO bookmarks (user_id, opportunity_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, opportunity_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(opportunity_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn remove_bookmark(
    pool: &PgPool,
    user_id: Uuid,
    opportunity_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND opportunity_id = $2")
        .bind(user_id)
        .bind(opportunity_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Bookmarked listings that are still approved, newest bookmark first.
pub async fn list_bookmarked(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<OpportunityRow>, sqlx::Error> {
    sqlx::query_as::<_, OpportunityRow>(
        r#"
        SELECT o.*
        FROM bookmarks b
        JOIN opportunities o ON o.id = b.opportunity_id
        WHERE b.user_id = $1 AND o.status = 'approved'
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_application(
    pool: &PgPool,
    user_id: Uuid,
    opportunity_id: Uuid,
    cover_note: Option<&str>,
) -> Result<ApplicationRow, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications (user_id, opportunity_id, status, cover_note)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(opportunity_id)
    .bind(ApplicationStatus::Submitted.as_str())
    .bind(cover_note)
    .fetch_one(pool)
    .await
}

pub async fn get_application(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_applications_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn list_applications_for_opportunity(
    pool: &PgPool,
    opportunity_id: Uuid,
) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE opportunity_id = $1 ORDER BY created_at ASC",
    )
    .bind(opportunity_id)
    .fetch_all(pool)
    .await
}

pub async fn set_application_status(
    pool: &PgPool,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}
