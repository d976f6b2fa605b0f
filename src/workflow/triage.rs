use serde_json::Value;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::ticket::{SubmitterRole, TicketCreated, TicketId, TicketStatus};
use crate::domain::triage::{TriageDirective, TriageReply, TriageRequest};
use crate::error::AppResult;
use crate::services::TicketStore;

#[derive(Debug, Clone, PartialEq)]
pub enum TriageOutcome {
    Closed,
    AlreadyClosed,
    NoAction(TriageDirective),
}

/// Runs one ticket through payload building, submission and the reply policy.
pub async fn triage_ticket(ctx: &AppContext, event: &TicketCreated) -> AppResult<TriageOutcome> {
    let request = build_request(&ctx.config, event);
    let reply = ctx.triage.submit(&request).await?;
    let directive = interpret_reply(&reply);
    apply_directive(ctx.tickets.as_ref(), event.ticket.id, directive).await
}

pub fn build_request(config: &AppConfig, event: &TicketCreated) -> TriageRequest {
    let ticket = &event.ticket;
    let vlan_source = match &event.context.origin {
        Some(origin) => origin.clone(),
        None => {
            tracing::warn!(
                ticket_id = %ticket.id,
                origin = %config.untagged_origin,
                "ticket carried no origin tag; applying configured default"
            );
            config.untagged_origin.clone()
        }
    };

    TriageRequest {
        ticket_id: ticket.id,
        subject: ticket.subject.clone().unwrap_or_default(),
        body: ticket.body.clone().unwrap_or_default(),
        vlan_source,
        user_role: SubmitterRole::from_staff_flag(ticket.staff_author),
    }
}

pub fn interpret_reply(reply: &TriageReply) -> TriageDirective {
    if !reply.is_success() {
        return TriageDirective::Rejected(reply.status);
    }

    let value = match serde_json::from_str::<Value>(&reply.body) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            return TriageDirective::Malformed(format!("expected a JSON object, got {other}"));
        }
        Err(err) => return TriageDirective::Malformed(err.to_string()),
    };
    if let Some(confidence) = value.get("confidence").and_then(Value::as_f64) {
        tracing::debug!(confidence, "triage service reported confidence");
    }
    TriageDirective::from_reply_value(&value)
}

/// Closes the ticket on `auto-close`; everything else leaves it untouched.
pub async fn apply_directive(
    tickets: &dyn TicketStore,
    id: TicketId,
    directive: TriageDirective,
) -> AppResult<TriageOutcome> {
    match directive {
        TriageDirective::AutoClose => {
            if tickets.status(id).await? == Some(TicketStatus::Closed) {
                tracing::debug!(ticket_id = %id, "ticket already closed; skipping auto-close");
                return Ok(TriageOutcome::AlreadyClosed);
            }
            tickets.set_status(id, TicketStatus::Closed).await?;
            tracing::info!(ticket_id = %id, "ticket auto-closed by triage service");
            Ok(TriageOutcome::Closed)
        }
        TriageDirective::Malformed(ref reason) => {
            tracing::warn!(ticket_id = %id, %reason, "triage response could not be parsed");
            Ok(TriageOutcome::NoAction(directive))
        }
        TriageDirective::Rejected(status) => {
            tracing::info!(ticket_id = %id, status, "triage service declined to act");
            Ok(TriageOutcome::NoAction(directive))
        }
        TriageDirective::Unrecognized(ref action) => {
            tracing::debug!(ticket_id = %id, %action, "ignoring triage action");
            Ok(TriageOutcome::NoAction(directive))
        }
        TriageDirective::Missing => {
            tracing::debug!(ticket_id = %id, "triage response carried no action");
            Ok(TriageOutcome::NoAction(directive))
        }
    }
}
