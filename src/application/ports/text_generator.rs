use async_trait::async_trait;

use crate::app_error::AppResult;

/// External text-generation capability used by the scan pipeline.
///
/// Implementations report any transport, quota or response failure as
/// [`AppError::GenerationFailed`](crate::app_error::AppError::GenerationFailed).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
