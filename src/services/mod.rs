pub mod events;
pub mod ticket_store;
pub mod triage;

pub use events::{EventBus, SubscriptionId, TicketCreatedListener};
pub use ticket_store::TicketStore;
pub use triage::TriageService;
