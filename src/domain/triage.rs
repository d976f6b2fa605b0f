use serde::Serialize;
use serde_json::Value;

use crate::domain::ticket::{SubmitterRole, TicketId};

pub const AUTO_CLOSE_ACTION: &str = "auto-close";

/// Body posted to the triage service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageRequest {
    pub ticket_id: TicketId,
    pub subject: String,
    pub body: String,
    pub vlan_source: String,
    pub user_role: SubmitterRole,
}

/// Raw reply as seen on the wire; interpretation happens later.
#[derive(Debug, Clone)]
pub struct TriageReply {
    pub status: u16,
    pub body: String,
}

impl TriageReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TriageDirective {
    AutoClose,
    Unrecognized(String),
    Missing,
    Malformed(String),
    Rejected(u16),
}

impl TriageDirective {
    pub fn from_action(action: Option<&str>) -> Self {
        match action {
            Some(AUTO_CLOSE_ACTION) => TriageDirective::AutoClose,
            Some(other) => TriageDirective::Unrecognized(other.to_string()),
            None => TriageDirective::Missing,
        }
    }

    /// Reads only `action` from a decoded reply. Other fields are never
    /// validated; a non-string `action` counts as an unknown directive.
    pub fn from_reply_value(reply: &Value) -> Self {
        match reply.get("action") {
            None | Some(Value::Null) => TriageDirective::Missing,
            Some(Value::String(action)) => Self::from_action(Some(action.as_str())),
            Some(other) => TriageDirective::Unrecognized(other.to_string()),
        }
    }
}
