use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::NotificationRow;
use crate::session::Role;

pub const NOTIFICATION_PAGE_SIZE: i64 = 50;

pub async fn list_for_user(
    pool: &PgPool,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<NotificationRow>, sqlx::Error> {
    sqlx::query_as::<_, NotificationRow>(
        r#"
        SELECT * FROM notifications
        WHERE user_id = $1 AND (NOT $2 OR NOT read)
        ORDER BY created_at DESC
        LIMIT $3
        "#,
    )
    .bind(user_id)
    .bind(unread_only)
    .bind(NOTIFICATION_PAGE_SIZE)
    .fetch_all(pool)
    .await
}

/// Scoped to the owner so one user cannot mark another's notifications.
pub async fn mark_read(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<NotificationRow>, sqlx::Error> {
    sqlx::query_as::<_, NotificationRow>(
        r#"
        UPDATE notifications SET read = TRUE
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Opted-in addresses, optionally restricted to one role.
pub async fn email_recipients(
    pool: &PgPool,
    role: Option<Role>,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT email FROM profiles
        WHERE email_opt_in AND email <> '' AND ($1::text IS NULL OR role = $1)
        ORDER BY created_at
        "#,
    )
    .bind(role.map(|r| r.as_str()))
    .fetch_all(pool)
    .await
}
