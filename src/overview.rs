// Dashboard overview: every top-level fetch concurrently, then a pure assembly step.

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use crate::aggregator::{ContainerSnapshot, gather_containers_with_stats};
use crate::alerts::build_alerts;
use crate::engine::EngineClient;
use crate::engine::options::events_between;
use crate::engine::raw::{ImageSummary, Network, SystemDataUsageResponse, SystemInfo, VolumeListResponse};
use crate::error::EngineError;
use crate::events::parse_activity_events;
use crate::models::{
    ActivityEvent, ContainerStatus, ContainerSummary, OverviewPayload, OverviewSummary,
};
use crate::transform::{build_host_details, build_host_stats, build_images, build_networks, build_volumes};

/// Window of Engine events shown as recent activity.
pub const ACTIVITY_WINDOW_HOURS: i64 = 6;

/// Everything the overview is assembled from.
#[derive(Debug, Clone, Default)]
pub struct OverviewInputs {
    pub snapshot: ContainerSnapshot,
    pub images: Vec<ImageSummary>,
    pub volumes: VolumeListResponse,
    pub networks: Vec<Network>,
    pub info: SystemInfo,
    pub disk: SystemDataUsageResponse,
    pub recent_activity: Vec<ActivityEvent>,
}

/// Events of the last [`ACTIVITY_WINDOW_HOURS`]. Never fails: errors are logged and the
/// feed is empty.
pub async fn fetch_recent_activity(engine: &EngineClient) -> Vec<ActivityEvent> {
    let now = Utc::now();
    let since = now - Duration::hours(ACTIVITY_WINDOW_HOURS);
    let options = events_between(since.timestamp(), now.timestamp());
    match engine.events(&options).await {
        Ok(payload) => parse_activity_events(&payload, now),
        Err(e) => {
            tracing::warn!(error = %e, operation = "fetch_recent_activity", "Failed to fetch Engine events");
            Vec::new()
        }
    }
}

/// Fetch all inputs concurrently; any failing fetch except the activity feed fails the
/// whole overview.
#[instrument(skip(engine), fields(operation = "compose_overview"))]
pub async fn compose_overview(
    engine: &EngineClient,
    disk_total_override: Option<f64>,
) -> Result<OverviewPayload, EngineError> {
    let (snapshot, images, volumes, networks, info, disk, recent_activity) = tokio::try_join!(
        gather_containers_with_stats(engine),
        engine.list_images(),
        engine.list_volumes(),
        engine.list_networks(),
        engine.info(),
        engine.disk_usage(),
        async { Ok::<_, EngineError>(fetch_recent_activity(engine).await) },
    )?;

    let inputs = OverviewInputs {
        snapshot,
        images,
        volumes,
        networks,
        info,
        disk,
        recent_activity,
    };
    Ok(build_overview(inputs, disk_total_override, Utc::now()))
}

fn summarize(snapshot: &ContainerSnapshot) -> ContainerSummary {
    let count = |status: ContainerStatus| {
        snapshot
            .containers
            .iter()
            .filter(|c| c.status == status)
            .count()
    };
    ContainerSummary {
        running: count(ContainerStatus::Running),
        exited: count(ContainerStatus::Exited),
        paused: count(ContainerStatus::Paused),
        total: snapshot.containers.len(),
    }
}

pub fn build_overview(
    inputs: OverviewInputs,
    disk_total_override: Option<f64>,
    now: DateTime<Utc>,
) -> OverviewPayload {
    let images = build_images(&inputs.images, now);
    let volumes = build_volumes(
        inputs.volumes.volumes.as_deref().unwrap_or_default(),
        &inputs.snapshot.raw,
    );
    let networks = build_networks(&inputs.networks);
    let dangling = images.iter().filter(|i| i.is_dangling()).count();

    let host_stats = build_host_stats(
        &inputs.info,
        &inputs.disk,
        &inputs.snapshot.containers,
        &inputs.snapshot.network_rates,
        disk_total_override,
    );
    let alerts = build_alerts(&host_stats, &inputs.snapshot.containers, dangling);

    OverviewPayload {
        summary: OverviewSummary {
            containers: summarize(&inputs.snapshot),
            images: images.len(),
            volumes: volumes.len(),
            networks: networks.len(),
        },
        host_stats,
        host_details: build_host_details(&inputs.info, now),
        alerts,
        recent_activity: inputs.recent_activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NetworkRate;
    use crate::engine::raw::Volume;
    use crate::models::Container;
    use serde_json::json;

    fn container(status: ContainerStatus, cpu: f64) -> Container {
        Container {
            id: format!("{:?}", status),
            name: "c".into(),
            image: "img".into(),
            status,
            ports: vec![],
            cpu_usage: cpu,
            memory_usage: 0.0,
            memory_limit: 0.0,
            uptime: "seconds".into(),
        }
    }

    fn inputs() -> OverviewInputs {
        let containers = vec![
            container(ContainerStatus::Running, 50.0),
            container(ContainerStatus::Running, 40.0),
            container(ContainerStatus::Exited, 0.0),
            container(ContainerStatus::Restarting, 0.0),
        ];
        OverviewInputs {
            snapshot: ContainerSnapshot {
                network_rates: vec![NetworkRate::default(); containers.len()],
                containers,
                raw: vec![],
            },
            images: vec![
                ImageSummary {
                    id: "sha256:aaaaaaaaaaaa".into(),
                    repo_tags: vec!["a:1".into(), "a:2".into()],
                    size: 10,
                    ..Default::default()
                },
                ImageSummary {
                    id: "sha256:bbbbbbbbbbbb".into(),
                    size: 10,
                    ..Default::default()
                },
            ],
            volumes: VolumeListResponse {
                volumes: Some(vec![Volume {
                    name: "v1".into(),
                    driver: "local".into(),
                    ..Default::default()
                }]),
                ..Default::default()
            },
            networks: serde_json::from_value(json!([
                { "Id": "n1", "Name": "bridge", "Driver": "bridge", "Scope": "local" },
                { "Id": "n2", "Name": "host", "Driver": "host", "Scope": "local" }
            ]))
            .unwrap(),
            info: SystemInfo {
                name: Some("box".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn summary_counts() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let overview = build_overview(inputs(), None, now);
        assert_eq!(
            overview.summary.containers,
            ContainerSummary { running: 2, exited: 1, paused: 0, total: 4 }
        );
        assert_eq!(overview.summary.images, 3);
        assert_eq!(overview.summary.volumes, 1);
        assert_eq!(overview.summary.networks, 2);
        assert_eq!(overview.host_stats.cpu_usage, 90.0);
        assert_eq!(overview.host_details.hostname, "box");

        let titles: Vec<&str> = overview.alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["High CPU Usage", "Container Restarting", "Dangling Images"]);
    }

    #[test]
    fn same_inputs_same_payload_apart_from_alert_ids() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let mut first = build_overview(inputs(), Some(100.0), now);
        let mut second = build_overview(inputs(), Some(100.0), now);
        assert_ne!(first.alerts[0].id, second.alerts[0].id);
        first.alerts.iter_mut().for_each(|a| a.id.clear());
        second.alerts.iter_mut().for_each(|a| a.id.clear());
        assert_eq!(first, second);
    }
}
