//! Approval fan-out: one in-app notification per opted-in profile, then a
//! realtime event on Redis for connected clients.

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::KIND_OPPORTUNITY_APPROVED;
use crate::models::opportunity::OpportunityRow;
use crate::state::AppState;

pub const APPROVED_CHANNEL: &str = "opportunities:approved";

/// Payload published on `APPROVED_CHANNEL`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovedEvent {
    pub opportunity_id: Uuid,
    pub title: String,
    pub company: String,
    pub opportunity_type: String,
    pub approved_at: DateTime<Utc>,
}

impl ApprovedEvent {
    pub fn from_row(row: &OpportunityRow) -> Self {
        Self {
            opportunity_id: row.id,
            title: row.title.clone(),
            company: row.company.clone(),
            opportunity_type: row.opportunity_type.clone(),
            approved_at: row.updated_at,
        }
    }
}

pub fn approval_message(row: &OpportunityRow) -> String {
    format!("New {}: {} at {}", row.opportunity_type, row.title, row.company)
}

/// Single `INSERT ... SELECT`. Re-approving the same listing adds nothing.
pub async fn insert_approval_notifications(
    pool: &PgPool,
    row: &OpportunityRow,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO notifications (user_id, opportunity_id, kind, message)
        SELECT p.id, $1, $2, $3
        FROM profiles p
        WHERE p.email_opt_in
          AND NOT EXISTS (
              SELECT 1 FROM notifications n
              WHERE n.user_id = p.id AND n.opportunity_id = $1 AND n.kind = $2
          )
        "#,
    )
    .bind(row.id)
    .bind(KIND_OPPORTUNITY_APPROVED)
    .bind(approval_message(row))
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Returns the number of subscribers that received the event.
pub async fn publish_approved(redis: &redis::Client, event: &ApprovedEvent) -> anyhow::Result<i64> {
    let payload = serde_json::to_string(event)?;
    let mut conn = redis.get_multiplexed_async_connection().await?;
    let receivers: i64 = conn.publish(APPROVED_CHANNEL, payload).await?;
    Ok(receivers)
}

/// Notification rows are required; the Redis publish is best effort.
pub async fn notify_opportunity_approved(
    state: &AppState,
    row: &OpportunityRow,
) -> Result<u64, AppError> {
    let inserted = insert_approval_notifications(&state.db, row).await?;
    info!("Queued {inserted} notifications for opportunity {}", row.id);

    match publish_approved(&state.redis, &ApprovedEvent::from_row(row)).await {
        Ok(receivers) => info!("Published approval of {} to {receivers} subscribers", row.id),
        Err(e) => warn!("Failed to publish approval of {} on {APPROVED_CHANNEL}: {e:#}", row.id),
    }
    Ok(inserted)
}
