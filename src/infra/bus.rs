use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::domain::ticket::TicketCreated;
use crate::services::{EventBus, SubscriptionId, TicketCreatedListener};

/// In-process stand-in for the helpdesk's signal dispatcher.
#[derive(Default)]
pub struct LocalEventBus {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(SubscriptionId, Arc<dyn TicketCreatedListener>)>>,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Dispatches to every listener in subscription order, awaiting each one.
    pub async fn publish(&self, event: &TicketCreated) {
        let listeners: Vec<_> = self
            .listeners
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener.on_ticket_created(event).await;
        }
    }
}

impl EventBus for LocalEventBus {
    fn subscribe(&self, listener: Arc<dyn TicketCreatedListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
