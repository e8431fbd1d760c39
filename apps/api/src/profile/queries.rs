use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{ProfileRow, ProfileUpdate};
use crate::session::Session;

/// Returns the caller's profile, creating an empty one on first access.
pub async fn ensure_profile(pool: &PgPool, session: &Session) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, role)
        VALUES ($1, $2)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(session.user_id)
    .bind(session.role.as_str())
    .execute(pool)
    .await?;

    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(session.user_id)
        .fetch_one(pool)
        .await
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Absent fields keep their stored value.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET
            email = COALESCE($2, email),
            full_name = COALESCE($3, full_name),
            headline = COALESCE($4, headline),
            skills = COALESCE($5, skills),
            email_opt_in = COALESCE($6, email_opt_in),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(update.email.as_deref().map(str::trim))
    .bind(update.full_name.as_deref().map(str::trim))
    .bind(update.headline.as_deref())
    .bind(update.normalized_skills())
    .bind(update.email_opt_in)
    .fetch_one(pool)
    .await
}

pub async fn save_resume(
    pool: &PgPool,
    user_id: Uuid,
    document: &Value,
    resume_text: &str,
) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET resume = $2, resume_text = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(document)
    .bind(resume_text)
    .fetch_one(pool)
    .await
}

pub async fn save_uploaded_resume(
    pool: &PgPool,
    user_id: Uuid,
    resume_text: &str,
    pdf_key: &str,
) -> Result<ProfileRow, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET resume_text = $2, resume_pdf_key = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(resume_text)
    .bind(pdf_key)
    .fetch_one(pool)
    .await
}
