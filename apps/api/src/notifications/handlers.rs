//! Axum route handlers for notifications and admin bulk email.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::NotificationRow;
use crate::notifications::bulk_email::{send_bulk, BatchConfig, BulkSendReport};
use crate::notifications::queries;
use crate::session::{Role, Session};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkEmailRequest {
    pub subject: String,
    pub html: String,
    /// Restrict to one role; everyone opted in when absent.
    pub role: Option<Role>,
}

impl BulkEmailRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.subject.trim().is_empty() {
            return Err(AppError::Validation("subject cannot be empty".to_string()));
        }
        if self.html.trim().is_empty() {
            return Err(AppError::Validation("html cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// GET /api/v1/notifications
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    Ok(Json(
        queries::list_for_user(&state.db, session.user_id, query.unread).await?,
    ))
}

/// POST /api/v1/notifications/:id/read
pub async fn handle_mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationRow>, AppError> {
    queries::mark_read(&state.db, id, session.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Notification {id} not found")))
}

/// POST /api/v1/admin/email
///
/// Runs to completion before responding; the report covers every recipient.
pub async fn handle_bulk_email(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<BulkEmailRequest>,
) -> Result<Json<BulkSendReport>, AppError> {
    session.require_admin()?;
    request.validate()?;

    let recipients = queries::email_recipients(&state.db, request.role).await?;
    info!(
        "Admin {} sending '{}' to {} recipients",
        session.user_id,
        request.subject,
        recipients.len()
    );

    let config = BatchConfig::new(
        state.config.email_batch_size,
        state.config.email_batch_delay_ms,
    );
    let report = send_bulk(
        state.mailer.clone(),
        &recipients,
        &request.subject,
        &request.html,
        config,
    )
    .await;

    info!(
        "Bulk email done: {} sent, {} failed of {}",
        report.sent, report.failed, report.total
    );
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_email_request_validation() {
        let ok: BulkEmailRequest =
            serde_json::from_str(r#"{"subject":"Hi","html":"<p>x</p>","role":"student"}"#).unwrap();
        assert!(ok.validate().is_ok());
        assert_eq!(ok.role, Some(Role::Student));

        let blank: BulkEmailRequest =
            serde_json::from_str(r#"{"subject":" ","html":"<p>x</p>"}"#).unwrap();
        assert!(matches!(blank.validate(), Err(AppError::Validation(_))));
    }
}
