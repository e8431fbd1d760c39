//! Axum route handlers for bookmarks and applications.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::engagement::queries;
use crate::errors::AppError;
use crate::models::engagement::{check_transition, Actor, ApplicationRow, ApplicationStatus};
use crate::models::opportunity::{ApprovalStatus, OpportunityRow};
use crate::opportunities::queries::get_opportunity;
use crate::session::Session;
use crate::state::AppState;

/// Longest cover note accepted with an application.
pub const MAX_COVER_NOTE_CHARS: usize = 5_000;

#[derive(Debug, Default, Deserialize)]
pub struct ApplyRequest {
    pub cover_note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationsQuery {
    /// Admin only: every application for one listing.
    pub opportunity_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
}

/// Applicants act as owners when withdrawing. Admins review everything else,
/// their own applications included.
fn actor_for(session: &Session, applicant: Uuid, target: ApplicationStatus) -> Actor {
    let own = session.user_id == applicant;
    if own && (!session.is_admin() || target == ApplicationStatus::Withdrawn) {
        Actor::Owner
    } else {
        Actor::Admin
    }
}

/// Only approved listings can be bookmarked or applied to.
async fn load_approved(state: &AppState, id: Uuid) -> Result<OpportunityRow, AppError> {
    get_opportunity(&state.db, id)
        .await?
        .filter(|o| o.status == ApprovalStatus::Approved.as_str())
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))
}

/// POST /api/v1/opportunities/:id/bookmark
pub async fn handle_add_bookmark(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    load_approved(&state, id).await?;
    let created = queries::add_bookmark(&state.db, session.user_id, id).await?;
    Ok(if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

/// DELETE /api/v1/opportunities/:id/bookmark
pub async fn handle_remove_bookmark(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if queries::remove_bookmark(&state.db, session.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("No bookmark for opportunity {id}")))
    }
}

/// GET /api/v1/bookmarks
pub async fn handle_list_bookmarks(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<OpportunityRow>>, AppError> {
    Ok(Json(queries::list_bookmarked(&state.db, session.user_id).await?))
}

/// POST /api/v1/opportunities/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    load_approved(&state, id).await?;

    let cover_note = request
        .cover_note
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    if cover_note.is_some_and(|n| n.chars().count() > MAX_COVER_NOTE_CHARS) {
        return Err(AppError::Validation(format!(
            "cover_note exceeds {MAX_COVER_NOTE_CHARS} characters"
        )));
    }

    let row = queries::insert_application(&state.db, session.user_id, id, cover_note)
        .await
        .map_err(|e| {
            AppError::conflict_on_unique(e, "You have already applied to this opportunity")
        })?;
    info!("User {} applied to opportunity {id}", session.user_id);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/applications
pub async fn handle_list_applications(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ApplicationsQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let rows = match query.opportunity_id {
        Some(opportunity_id) => {
            session.require_admin()?;
            queries::list_applications_for_opportunity(&state.db, opportunity_id).await?
        }
        None => queries::list_applications_for_user(&state.db, session.user_id).await?,
    };
    Ok(Json(rows))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(update): Json<ApplicationStatusUpdate>,
) -> Result<Json<ApplicationRow>, AppError> {
    let existing = queries::get_application(&state.db, id)
        .await?
        .filter(|a| session.can_modify(a.user_id))
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    let actor = actor_for(&session, existing.user_id, update.status);
    let from: ApplicationStatus = existing.status.parse().map_err(AppError::Validation)?;
    check_transition(actor, from, update.status).map_err(AppError::UnprocessableEntity)?;

    let row = queries::set_application_status(&state.db, id, update.status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
    info!(
        "Application {id} moved {} -> {} by {}",
        existing.status, row.status, session.user_id
    );
    Ok(Json(row))
}
