use axum::{extract::State, Json};

use crate::analytics::{assemble, load_counts, AnalyticsReport};
use crate::errors::AppError;
use crate::session::Session;
use crate::state::AppState;

/// GET /api/v1/admin/analytics
pub async fn handle_analytics(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AnalyticsReport>, AppError> {
    session.require_admin()?;
    let raw = load_counts(&state.db).await?;
    Ok(Json(assemble(raw)))
}
