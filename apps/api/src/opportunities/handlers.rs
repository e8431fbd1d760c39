//! Axum route handlers for the Opportunities API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::import::{import_selected, ImportSummary};
use crate::models::opportunity::{
    ApprovalStatus, NewOpportunity, OpportunityRow, OpportunityType,
};
use crate::notifications::fanout::notify_opportunity_approved;
use crate::opportunities::queries::{self, OpportunityFilter, Viewer};
use crate::parser::{parse_bulk, ParseOutcome, ParsedOpportunity};
use crate::session::Session;
use crate::state::AppState;

/// Pasted input above this size is refused rather than parsed.
pub const MAX_BULK_INPUT_CHARS: usize = 200_000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BulkParseRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct BulkImportRequest {
    pub items: Vec<ParsedOpportunity>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpportunityListResponse {
    pub opportunities: Vec<OpportunityRow>,
    pub limit: i64,
    pub offset: i64,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct OpportunityPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub opportunity_type: Option<OpportunityType>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub deadline: Option<NaiveDate>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub source_url: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl OpportunityPatch {
    /// Overlays the patch on a stored row. An unknown stored type reads as job.
    pub fn apply(self, existing: &OpportunityRow) -> NewOpportunity {
        NewOpportunity {
            title: self.title.unwrap_or_else(|| existing.title.clone()),
            company: self.company.unwrap_or_else(|| existing.company.clone()),
            location: self.location.unwrap_or_else(|| existing.location.clone()),
            opportunity_type: self.opportunity_type.unwrap_or_else(|| {
                existing.opportunity_type.parse().unwrap_or_default()
            }),
            description: self
                .description
                .unwrap_or_else(|| existing.description.clone()),
            requirements: self
                .requirements
                .unwrap_or_else(|| existing.requirements.clone()),
            deadline: self.deadline.or(existing.deadline),
            salary_min: self.salary_min.or(existing.salary_min),
            salary_max: self.salary_max.or(existing.salary_max),
            source_url: self.source_url.or_else(|| existing.source_url.clone()),
            tags: self.tags.unwrap_or_else(|| existing.tags.clone()),
        }
    }
}

fn viewer(session: &Session) -> Viewer {
    Viewer {
        user_id: session.user_id,
        is_admin: session.is_admin(),
    }
}

/// Approved rows are public; anything else only to its submitter or an admin.
fn is_visible(row: &OpportunityRow, session: &Session) -> bool {
    row.status == ApprovalStatus::Approved.as_str() || session.can_modify(row.submitted_by)
}

async fn load_visible(
    state: &AppState,
    session: &Session,
    id: Uuid,
) -> Result<OpportunityRow, AppError> {
    queries::get_opportunity(&state.db, id)
        .await?
        .filter(|row| is_visible(row, session))
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/opportunities
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<OpportunityFilter>,
) -> Result<Json<OpportunityListResponse>, AppError> {
    let opportunities = queries::list_opportunities(&state.db, viewer(&session), &filter).await?;
    Ok(Json(OpportunityListResponse {
        opportunities,
        limit: filter.page_size(),
        offset: filter.page_offset(),
    }))
}

/// GET /api/v1/opportunities/:id
pub async fn handle_get(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<OpportunityRow>, AppError> {
    Ok(Json(load_visible(&state, &session, id).await?))
}

/// POST /api/v1/opportunities
///
/// Admin submissions are published immediately; everyone else's wait for moderation.
pub async fn handle_create(
    State(state): State<AppState>,
    session: Session,
    Json(draft): Json<NewOpportunity>,
) -> Result<(StatusCode, Json<OpportunityRow>), AppError> {
    draft.validate().map_err(AppError::Validation)?;

    let status = if session.is_admin() {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Pending
    };
    let row = queries::insert_opportunity(&state.db, &draft, session.user_id, status).await?;
    info!(
        "Opportunity {} created by {} ({})",
        row.id, session.user_id, row.status
    );

    if status == ApprovalStatus::Approved {
        notify_opportunity_approved(&state, &row).await?;
    }

    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/opportunities/:id
///
/// A non-admin edit sends the listing back to moderation.
pub async fn handle_update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(patch): Json<OpportunityPatch>,
) -> Result<Json<OpportunityRow>, AppError> {
    let existing = load_visible(&state, &session, id).await?;
    if !session.can_modify(existing.submitted_by) {
        return Err(AppError::Forbidden);
    }

    let draft = patch.apply(&existing);
    draft.validate().map_err(AppError::Validation)?;

    let status = if session.is_admin() {
        existing
            .status
            .parse()
            .unwrap_or(ApprovalStatus::Pending)
    } else {
        ApprovalStatus::Pending
    };

    let row = queries::update_opportunity(&state.db, id, &draft, status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/opportunities/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = load_visible(&state, &session, id).await?;
    if !session.can_modify(existing.submitted_by) {
        return Err(AppError::Forbidden);
    }
    queries::delete_opportunity(&state.db, id).await?;
    info!("Opportunity {id} deleted by {}", session.user_id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/opportunities/:id/approve
pub async fn handle_approve(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<OpportunityRow>, AppError> {
    session.require_admin()?;

    let row = queries::set_status(&state.db, id, ApprovalStatus::Approved, None)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))?;
    info!("Opportunity {id} approved by {}", session.user_id);

    notify_opportunity_approved(&state, &row).await?;
    Ok(Json(row))
}

/// POST /api/v1/opportunities/:id/reject
pub async fn handle_reject(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<OpportunityRow>, AppError> {
    session.require_admin()?;

    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());
    let row = queries::set_status(&state.db, id, ApprovalStatus::Rejected, reason)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))?;
    info!("Opportunity {id} rejected by {}", session.user_id);
    Ok(Json(row))
}

/// POST /api/v1/opportunities/bulk/parse
///
/// Pure text processing; nothing is stored. The client reviews the items,
/// toggles `selected`, and posts them back to the import endpoint.
pub async fn handle_bulk_parse(
    _session: Session,
    Json(request): Json<BulkParseRequest>,
) -> Result<Json<ParseOutcome>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    if request.text.chars().count() > MAX_BULK_INPUT_CHARS {
        return Err(AppError::Validation(format!(
            "text exceeds {MAX_BULK_INPUT_CHARS} characters"
        )));
    }
    Ok(Json(parse_bulk(&request.text)))
}

/// POST /api/v1/opportunities/bulk/import
///
/// Admin imports are published on insert and get the same fan-out as an
/// approval. A failed fan-out is logged and does not fail the import.
pub async fn handle_bulk_import(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<BulkImportRequest>,
) -> Result<Json<ImportSummary>, AppError> {
    let outcome = import_selected(&state.db, &session, &request.items).await;
    for row in &outcome.published {
        if let Err(e) = notify_opportunity_approved(&state, row).await {
            warn!("Fan-out for imported opportunity {} failed: {e}", row.id);
        }
    }
    Ok(Json(outcome.summary))
}
