use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ticket::TicketCreated;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Receives `ticket.created` events. Implementations must not fail the host.
#[async_trait]
pub trait TicketCreatedListener: Send + Sync {
    async fn on_ticket_created(&self, event: &TicketCreated);
}

/// Registration side of the host's event framework.
pub trait EventBus: Send + Sync {
    fn subscribe(&self, listener: Arc<dyn TicketCreatedListener>) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
