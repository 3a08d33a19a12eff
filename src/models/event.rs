// Activity feed, per-container events and log lines

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Container,
    Image,
    Volume,
    Network,
}

impl EventType {
    /// Capitalised label for messages ("Container").
    pub fn label(&self) -> &'static str {
        match self {
            EventType::Container => "Container",
            EventType::Image => "Image",
            EventType::Volume => "Volume",
            EventType::Network => "Network",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Started,
    Stopped,
    Deleted,
    Pulled,
    Pruned,
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventAction::Created => "created",
            EventAction::Started => "started",
            EventAction::Stopped => "stopped",
            EventAction::Deleted => "deleted",
            EventAction::Pulled => "pulled",
            EventAction::Pruned => "pruned",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub id: String,
    /// ISO-8601, millisecond precision.
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub action: EventAction,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerEvent {
    pub timestamp: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// ISO-8601; empty when the line carried no timestamp.
    pub timestamp: String,
    pub message: String,
}
