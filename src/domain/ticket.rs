use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(pub u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who opened the ticket, as reported to the triage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitterRole {
    Staff,
    User,
}

impl SubmitterRole {
    pub fn from_staff_flag(staff_author: bool) -> Self {
        if staff_author {
            SubmitterRole::Staff
        } else {
            SubmitterRole::User
        }
    }
}

/// Snapshot of a freshly created ticket, handed over by the host for the
/// duration of one event. The host's store stays the owner of the record.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub staff_author: bool,
    pub status: TicketStatus,
}

/// Ambient metadata of the request that created the ticket.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Network segment tag set by an upstream device (e.g. the `X-VLAN` header).
    pub origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TicketCreated {
    pub ticket: Ticket,
    pub context: RequestContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_staff_flag_to_role() {
        assert_eq!(SubmitterRole::from_staff_flag(true), SubmitterRole::Staff);
        assert_eq!(SubmitterRole::from_staff_flag(false), SubmitterRole::User);
        assert_eq!(
            serde_json::to_string(&SubmitterRole::Staff).unwrap(),
            "\"staff\""
        );
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TicketStatus::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
        let parsed: TicketStatus = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(parsed, TicketStatus::Open);
    }
}
