//! Axum route handler for resume tailoring.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::opportunity::{ApprovalStatus, OpportunityRow};
use crate::opportunities::queries::get_opportunity;
use crate::parser::fields::truncate_chars;
use crate::profile::queries::get_profile;
use crate::session::Session;
use crate::state::AppState;
use crate::tailor::matching::{match_resume, opportunity_keywords, MatchReport};
use crate::tailor::prompts::{build_tailor_prompt, TAILOR_SYSTEM};

/// Resume text beyond this is cut before prompting.
const MAX_RESUME_PROMPT_CHARS: usize = 12_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorSuggestion {
    pub summary: String,
    #[serde(default)]
    pub bullet_suggestions: Vec<String>,
    #[serde(default)]
    pub talking_points: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub opportunity_id: Uuid,
    pub report: MatchReport,
    pub suggestion: TailorSuggestion,
}

pub async fn tailor_resume(
    llm: &LlmClient,
    opportunity: &OpportunityRow,
    resume_text: &str,
) -> Result<(MatchReport, TailorSuggestion), AppError> {
    let keywords = opportunity_keywords(opportunity);
    let report = match_resume(resume_text, &keywords);

    let resume = truncate_chars(resume_text, MAX_RESUME_PROMPT_CHARS);
    let prompt = build_tailor_prompt(opportunity, &report, &resume);
    let suggestion = llm
        .call_json::<TailorSuggestion>(&prompt, TAILOR_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume tailoring failed: {e}")))?;

    Ok((report, suggestion))
}

/// POST /api/v1/opportunities/:id/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<TailorResponse>, AppError> {
    let opportunity = get_opportunity(&state.db, id)
        .await?
        .filter(|o| {
            o.status == ApprovalStatus::Approved.as_str() || session.can_modify(o.submitted_by)
        })
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {id} not found")))?;

    let resume_text = get_profile(&state.db, session.user_id)
        .await?
        .and_then(|p| p.resume_text)
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            AppError::UnprocessableEntity(
                "Add a resume to your profile before tailoring".to_string(),
            )
        })?;

    let (report, suggestion) = tailor_resume(&state.llm, &opportunity, &resume_text).await?;
    info!(
        "Tailored resume of {} for opportunity {id}: score {}",
        session.user_id, report.score
    );

    Ok(Json(TailorResponse {
        opportunity_id: id,
        report,
        suggestion,
    }))
}
