//! Judgment Provider: The pluggable source of raw field judgments.
//!
//! Default: `LlmJudgmentProvider` (Claude via `LlmClient`).
//! `AppState` holds an `Arc<dyn JudgmentProvider>`, so tests and alternative
//! backends swap in without touching the runner or handlers.

use async_trait::async_trait;

use crate::assessment::request_builder::JudgmentRequest;
use crate::errors::AssessmentError;
use crate::llm_client::LlmClient;

/// Turns one category's judgment request into raw, unnormalized text.
#[async_trait]
pub trait JudgmentProvider: Send + Sync {
    async fn judge(&self, request: &JudgmentRequest) -> Result<String, AssessmentError>;
}

/// Judgment provider backed by the Claude Messages API.
pub struct LlmJudgmentProvider(pub LlmClient);

#[async_trait]
impl JudgmentProvider for LlmJudgmentProvider {
    async fn judge(&self, request: &JudgmentRequest) -> Result<String, AssessmentError> {
        self.0
            .call_text(&request.prompt, &request.system, request.attachment.as_ref())
            .await
            .map_err(|e| {
                AssessmentError::ProviderUnavailable(format!("{} request failed: {e}", request.category))
            })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stub provider for testing
// ────────────────────────────────────────────────────────────────────────────
