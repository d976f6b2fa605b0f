use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::ticket::{RequestContext, Ticket, TicketCreated, TicketId, TicketStatus};
use crate::error::AppResult;
use crate::infra::bus::LocalEventBus;
use crate::infra::store::JsonTicketStore;
use crate::notifier::TriageNotifier;
use crate::services::TicketStore;

#[derive(Debug, Clone)]
pub struct NotifyCommandArgs {
    pub id: u64,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub staff: bool,
    pub origin: Option<String>,
    pub store: PathBuf,
}

/// Plays the host's part for one ticket: activate the notifier, store the
/// ticket, fire `ticket.created` and report what the notifier left behind.
pub async fn run(config: AppConfig, args: NotifyCommandArgs) -> AppResult<TicketStatus> {
    let id = TicketId(args.id);
    let store = Arc::new(JsonTicketStore::open(&args.store)?);
    let bus = Arc::new(LocalEventBus::new());
    let registration = TriageNotifier::activate(config, store.clone(), bus.clone())?;

    store.insert(
        id,
        args.subject.as_deref().unwrap_or_default(),
        TicketStatus::Open,
    )?;

    let event = TicketCreated {
        ticket: Ticket {
            id,
            subject: args.subject,
            body: args.body,
            staff_author: args.staff,
            status: TicketStatus::Open,
        },
        context: RequestContext {
            origin: args.origin,
        },
    };
    tracing::debug!(listeners = bus.listener_count(), "publishing ticket.created");
    bus.publish(&event).await;
    registration.deactivate();

    Ok(store.status(id).await?.unwrap_or(TicketStatus::Open))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::AppError;

    fn args(store: PathBuf, origin: Option<&str>) -> NotifyCommandArgs {
        NotifyCommandArgs {
            id: 42,
            subject: Some("Printer down".to_string()),
            body: Some("Nothing prints".to_string()),
            staff: true,
            origin: origin.map(str::to_string),
            store,
        }
    }

    #[tokio::test]
    async fn reports_closed_status_and_persists_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "vlan_source": "90",
                "user_role": "staff"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "action": "auto-close" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("tickets.json");
        let config = AppConfig {
            endpoint: server.uri(),
            api_key: Some("s3cret".to_string()),
            timeout: Duration::from_secs(2),
            ..AppConfig::default()
        };

        let status = run(config, args(store_path.clone(), Some("90"))).await.unwrap();

        assert_eq!(status, TicketStatus::Closed);
        let reopened = JsonTicketStore::open(&store_path).unwrap();
        assert_eq!(
            reopened.status(TicketId(42)).await.unwrap(),
            Some(TicketStatus::Closed)
        );
    }

    #[tokio::test]
    async fn fails_fast_without_api_key_and_leaves_store_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("tickets.json");

        let result = run(AppConfig::default(), args(store_path.clone(), None)).await;

        assert!(matches!(result, Err(AppError::Configuration(_))));
        assert!(!store_path.exists());
        let store = JsonTicketStore::open(&store_path).unwrap();
        assert_eq!(store.status(TicketId(42)).await.unwrap(), None);
    }
}
