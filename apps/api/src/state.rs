use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::audit::engine::ProfileAuditor;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Mentor chat history.
    pub redis: RedisClient,
    /// Resume uploads.
    pub s3: S3Client,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable profile auditor. Default: GeminiAuditor.
    pub auditor: Arc<dyn ProfileAuditor>,
}
