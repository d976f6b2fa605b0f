use async_trait::async_trait;

use crate::domain::triage::{TriageReply, TriageRequest};
use crate::error::AppResult;

#[async_trait]
pub trait TriageService: Send + Sync {
    async fn submit(&self, request: &TriageRequest) -> AppResult<TriageReply>;
}
