use std::sync::Arc;

use crate::config::ServerConfig;
use crate::upstream::llm::LlmClient;
use crate::upstream::payments::PaymentsClient;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lingua_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Payment provider client (checkout session creation).
    pub payments: Arc<PaymentsClient>,
    /// LLM provider client (chat/dictionary/pronunciation proxies).
    pub llm: Arc<LlmClient>,
}
