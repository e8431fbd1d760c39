//! Axum route handlers for the caller's profile and resume.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, ProfileUpdate};
use crate::models::resume::ResumeDocument;
use crate::profile::queries;
use crate::profile::resume::render_resume_to_md;
use crate::profile::upload::{extract_pdf_text, store_resume_pdf, validate_pdf};
use crate::session::Session;
use crate::state::AppState;

/// Multipart field carrying the PDF.
const UPLOAD_FIELD: &str = "resume";

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ProfileRow>, AppError> {
    Ok(Json(queries::ensure_profile(&state.db, &session).await?))
}

/// PATCH /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileRow>, AppError> {
    update.validate().map_err(AppError::Validation)?;
    queries::ensure_profile(&state.db, &session).await?;
    let row = queries::update_profile(&state.db, session.user_id, &update)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "That email is already in use"))?;
    Ok(Json(row))
}

/// PUT /api/v1/profile/resume
pub async fn handle_put_resume(
    State(state): State<AppState>,
    session: Session,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<ProfileRow>, AppError> {
    if document.is_empty() {
        return Err(AppError::Validation("resume cannot be empty".to_string()));
    }
    let profile = queries::ensure_profile(&state.db, &session).await?;

    let markdown = render_resume_to_md(&profile.full_name, &document);
    let value = serde_json::to_value(&document).map_err(anyhow::Error::from)?;
    let row = queries::save_resume(&state.db, session.user_id, &value, &markdown).await?;

    info!("Saved structured resume for {} ({} chars)", session.user_id, markdown.len());
    Ok(Json(row))
}

/// POST /api/v1/profile/resume/upload
///
/// Expects a multipart body with the PDF in the `resume` field. The PDF text
/// replaces `resume_text`; a structured resume, if any, is left untouched.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<Json<ProfileRow>, AppError> {
    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read upload: {e}")))?;
            pdf = Some(bytes);
            break;
        }
    }
    let pdf = pdf.ok_or_else(|| {
        AppError::Validation(format!("missing multipart field '{UPLOAD_FIELD}'"))
    })?;

    validate_pdf(&pdf)?;
    queries::ensure_profile(&state.db, &session).await?;

    let text = extract_pdf_text(pdf.clone()).await?;
    let key = store_resume_pdf(&state.s3, &state.config.s3_bucket, session.user_id, pdf).await?;
    let row = queries::save_uploaded_resume(&state.db, session.user_id, &text, &key).await?;

    info!(
        "Stored uploaded resume for {} at {key} ({} chars of text)",
        session.user_id,
        text.len()
    );
    Ok(Json(row))
}
