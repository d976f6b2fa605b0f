use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::ticket::TicketCreated;
use crate::error::AppResult;
use crate::infra::triage::HttpTriageClient;
use crate::services::{EventBus, SubscriptionId, TicketCreatedListener, TicketStore};
use crate::workflow::triage::{TriageOutcome, triage_ticket};

/// Forwards every new ticket to the triage service.
pub struct TriageNotifier {
    ctx: AppContext,
}

impl TriageNotifier {
    /// Validates the configuration and subscribes to `ticket.created`.
    ///
    /// Nothing is registered when the configuration is incomplete, so a
    /// missing API key surfaces here instead of on every ticket.
    pub fn activate(
        config: AppConfig,
        tickets: Arc<dyn TicketStore>,
        bus: Arc<dyn EventBus>,
    ) -> AppResult<Registration> {
        config.validate()?;
        let triage = Arc::new(HttpTriageClient::new(&config)?);
        Ok(Self::register(AppContext::new(config, triage, tickets), bus))
    }

    pub fn register(ctx: AppContext, bus: Arc<dyn EventBus>) -> Registration {
        let endpoint = ctx.config.endpoint.clone();
        let id = bus.subscribe(Arc::new(Self { ctx }));
        tracing::info!(%endpoint, subscription = id.0, "triage notifier registered");
        Registration { bus, id: Some(id) }
    }
}

#[async_trait]
impl TicketCreatedListener for TriageNotifier {
    async fn on_ticket_created(&self, event: &TicketCreated) {
        let ticket_id = event.ticket.id;
        tracing::debug!(%ticket_id, status = %event.ticket.status, "triaging new ticket");
        match triage_ticket(&self.ctx, event).await {
            Ok(TriageOutcome::NoAction(directive)) => {
                tracing::debug!(%ticket_id, ?directive, "triage finished without action");
            }
            Ok(outcome) => tracing::debug!(%ticket_id, ?outcome, "triage finished"),
            Err(err) => tracing::warn!(
                %ticket_id,
                error = %err,
                "triage notification failed; ticket left as created"
            ),
        }
    }
}

/// Live subscription of a notifier. Dropping it tears the subscription down.
pub struct Registration {
    bus: Arc<dyn EventBus>,
    id: Option<SubscriptionId>,
}

impl Registration {
    pub fn deactivate(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.bus.unsubscribe(id);
            tracing::info!(subscription = id.0, "triage notifier deregistered");
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.release();
    }
}
