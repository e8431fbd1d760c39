use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::notifications::mailer::Mailer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Publishes realtime approval events.
    pub redis: RedisClient,
    /// Resume PDF storage.
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Outbound email. Default: `HttpMailer` against the email function.
    pub mailer: Arc<dyn Mailer>,
}
