// Query options: bollard's typed parameters, serialized by reqwest.

use std::collections::HashMap;

pub use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, EventsOptions, ListContainersOptions,
    ListImagesOptions, LogsOptions, RemoveContainerOptions, RemoveImageOptions,
    RemoveVolumeOptions, StatsOptions,
};

/// Empty query string.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// Both streams with timestamps, the way log views render them.
pub fn timestamped_logs(tail: u32, since: Option<i64>) -> LogsOptions {
    LogsOptions {
        stdout: true,
        stderr: true,
        timestamps: true,
        tail: tail.to_string(),
        since: since.map_or(0, |s| i32::try_from(s).unwrap_or(i32::MAX)),
        ..Default::default()
    }
}

/// Events between two unix timestamps (seconds).
pub fn events_between(since: i64, until: i64) -> EventsOptions {
    EventsOptions {
        since: Some(since.to_string()),
        until: Some(until.to_string()),
        ..Default::default()
    }
}

/// Events about one container between two unix timestamps.
pub fn container_events_between(id: &str, since: i64, until: i64) -> EventsOptions {
    EventsOptions {
        filters: Some(HashMap::from([(
            "container".to_string(),
            vec![id.to_string()],
        )])),
        ..events_between(since, until)
    }
}
