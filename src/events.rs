// Engine event stream (NDJSON) to the activity feed and per-container history.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::engine::raw::EventLine;
use crate::metrics::truncate_id;
use crate::models::{ActivityEvent, ContainerEvent, EventAction, EventType};

/// Entries kept, newest first.
pub const EVENT_LIMIT: usize = 25;

/// Substring table, checked in order against the lower-cased Engine action.
const ACTION_TABLE: [(&str, EventAction); 8] = [
    ("create", EventAction::Created),
    ("start", EventAction::Started),
    ("stop", EventAction::Stopped),
    ("die", EventAction::Stopped),
    ("destroy", EventAction::Deleted),
    ("delete", EventAction::Deleted),
    ("pull", EventAction::Pulled),
    ("prune", EventAction::Pruned),
];

pub fn map_event_type(kind: Option<&str>) -> Option<EventType> {
    match kind? {
        "container" => Some(EventType::Container),
        "image" => Some(EventType::Image),
        "volume" => Some(EventType::Volume),
        "network" => Some(EventType::Network),
        _ => None,
    }
}

pub fn map_event_action(action: Option<&str>) -> Option<EventAction> {
    let action = action?.to_lowercase();
    ACTION_TABLE
        .iter()
        .find(|(key, _)| action.contains(key))
        .map(|(_, mapped)| *mapped)
}

fn iso_millis(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn event_time(event: &EventLine, now: DateTime<Utc>) -> DateTime<Utc> {
    event
        .message
        .time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(now)
}

/// Parse each non-empty line on its own; broken lines are logged and skipped.
fn parse_lines(payload: &str, context: &'static str) -> Vec<EventLine> {
    payload
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<EventLine>(line) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!(error = %e, context, "Failed to parse Engine event line");
                None
            }
        })
        .collect()
}

/// Keep the last `EVENT_LIMIT` in stream order, newest first.
fn newest_first<T>(mut items: Vec<T>) -> Vec<T> {
    let skip = items.len().saturating_sub(EVENT_LIMIT);
    items.drain(..skip);
    items.reverse();
    items
}

/// Dashboard activity feed. Unknown types and unmapped actions are dropped.
pub fn parse_activity_events(payload: &str, now: DateTime<Utc>) -> Vec<ActivityEvent> {
    let events = parse_lines(payload, "activity")
        .into_iter()
        .filter_map(|event| {
            let kind = map_event_type(event.kind().as_deref())?;
            let action = map_event_action(event.message.action.as_deref())?;
            let object_id = event.actor_id().unwrap_or_default();
            let name = event
                .attribute("name")
                .or_else(|| event.attribute("image"))
                .map(str::to_string)
                .unwrap_or_else(|| truncate_id(object_id));
            let suffix = event
                .message
                .time_nano
                .map(|n| n.to_string())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            Some(ActivityEvent {
                id: format!("{}-{}", object_id, suffix),
                timestamp: iso_millis(event_time(&event, now)),
                kind,
                action,
                message: format!("{} \"{}\" {}", kind.label(), name, action),
            })
        })
        .collect();
    newest_first(events)
}

/// History of one container; every event is kept, labelled with its raw status.
pub fn parse_container_events(payload: &str, now: DateTime<Utc>) -> Vec<ContainerEvent> {
    let events = parse_lines(payload, "container")
        .into_iter()
        .map(|event| {
            let status = event
                .status
                .clone()
                .or_else(|| event.message.action.clone())
                .unwrap_or_else(|| "event".into());
            let name = event
                .attribute("name")
                .map(str::to_string)
                .unwrap_or_else(|| truncate_id(event.actor_id().unwrap_or_default()));
            ContainerEvent {
                timestamp: iso_millis(event_time(&event, now)),
                message: format!("{} - {}", status, name),
                status,
            }
        })
        .collect();
    newest_first(events)
}
