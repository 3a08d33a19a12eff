// Host-level stats, identity and the overview payload

use serde::{Deserialize, Serialize};

use super::{ActivityEvent, Alert};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStats {
    /// Sum of container CPU %, capped at 100.
    pub cpu_usage: f64,
    /// GB.
    pub memory_usage: f64,
    pub memory_total: f64,
    /// GB.
    pub disk_usage: f64,
    pub disk_total: f64,
    /// MB/s.
    pub network_ingress: f64,
    pub network_egress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDetails {
    pub hostname: String,
    pub os: String,
    pub docker_version: String,
    /// Engine `SystemTime` (wall clock), not a duration.
    pub uptime: String,
    pub connection_mode: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSummary {
    pub running: usize,
    pub exited: usize,
    pub paused: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSummary {
    pub containers: ContainerSummary,
    pub images: usize,
    pub volumes: usize,
    pub networks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPayload {
    pub summary: OverviewSummary,
    pub host_stats: HostStats,
    pub host_details: HostDetails,
    pub alerts: Vec<Alert>,
    pub recent_activity: Vec<ActivityEvent>,
}
