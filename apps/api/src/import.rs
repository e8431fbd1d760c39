//! Bulk importer. Persists the reviewer-selected subset of parsed postings.
//!
//! One insert per selected item, in input order. Items that fail validation
//! or fail to insert are logged and counted and the loop moves on without
//! retrying or rolling back.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::opportunity::{ApprovalStatus, NewOpportunity, OpportunityRow};
use crate::opportunities::queries::insert_opportunity;
use crate::parser::ParsedOpportunity;
use crate::session::Session;

/// Destination for imported opportunities.
#[async_trait]
pub trait OpportunitySink: Send + Sync {
    async fn insert(
        &self,
        draft: &NewOpportunity,
        submitted_by: Uuid,
        status: ApprovalStatus,
    ) -> Result<OpportunityRow, AppError>;
}

#[async_trait]
impl OpportunitySink for PgPool {
    async fn insert(
        &self,
        draft: &NewOpportunity,
        submitted_by: Uuid,
        status: ApprovalStatus,
    ) -> Result<OpportunityRow, AppError> {
        Ok(insert_opportunity(self, draft, submitted_by, status).await?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// What an import run produced. `published` holds the rows that went live
/// and still need the approval fan-out.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub summary: ImportSummary,
    pub published: Vec<OpportunityRow>,
}

/// Imports every `selected` item. Admin imports go live immediately; anyone
/// else's land in the moderation queue.
pub async fn import_selected(
    sink: &dyn OpportunitySink,
    session: &Session,
    items: &[ParsedOpportunity],
) -> ImportOutcome {
    let status = if session.is_admin() {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Pending
    };

    let mut outcome = ImportOutcome::default();
    for item in items.iter().filter(|i| i.selected) {
        outcome.summary.attempted += 1;

        let draft = item.to_new_opportunity();
        if let Err(reason) = draft.validate() {
            outcome.summary.failed += 1;
            warn!("Skipping {} '{}': {reason}", item.id, item.title);
            continue;
        }

        match sink.insert(&draft, session.user_id, status).await {
            Ok(row) => {
                outcome.summary.succeeded += 1;
                info!("Imported {} '{}' as {}", item.id, item.title, row.id);
                if status == ApprovalStatus::Approved {
                    outcome.published.push(row);
                }
            }
            Err(e) => {
                outcome.summary.failed += 1;
                warn!("Failed to import {} '{}': {e}", item.id, item.title);
            }
        }
    }

    let summary = &outcome.summary;
    info!(
        "Bulk import by {}: {} attempted, {} succeeded, {} failed",
        session.user_id, summary.attempted, summary.succeeded, summary.failed
    );
    outcome
}
