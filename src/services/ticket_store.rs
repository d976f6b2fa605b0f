use async_trait::async_trait;

use crate::domain::ticket::{TicketId, TicketStatus};
use crate::error::AppResult;

/// Mutation surface of the host's ticket persistence layer.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn status(&self, id: TicketId) -> AppResult<Option<TicketStatus>>;
    /// Sets and persists the status of an existing ticket.
    async fn set_status(&self, id: TicketId, status: TicketStatus) -> AppResult<()>;
}
