use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{TicketStore, TriageService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub triage: Arc<dyn TriageService>,
    pub tickets: Arc<dyn TicketStore>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        triage: Arc<dyn TriageService>,
        tickets: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            config,
            triage,
            tickets,
        }
    }
}
