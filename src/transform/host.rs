// Host totals derived from the container snapshot, info and disk usage.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::engine::raw::{SystemDataUsageResponse, SystemInfo};
use crate::metrics::{NetworkRate, bytes_to_gb, round_to};
use crate::models::{Container, HostDetails, HostStats};

const DISK_TOTAL_HEADROOM: f64 = 1.25;

pub fn build_host_stats(
    info: &SystemInfo,
    disk: &SystemDataUsageResponse,
    containers: &[Container],
    network_rates: &[NetworkRate],
    disk_total_override: Option<f64>,
) -> HostStats {
    let memory_usage_bytes: f64 = containers
        .iter()
        .map(|c| c.memory_usage * 1024.0 * 1024.0)
        .sum();
    let disk_usage_bytes = disk.layers_size.unwrap_or(0).max(0)
        + disk
            .volumes
            .iter()
            .flatten()
            .filter_map(|v| v.usage_data.as_ref())
            .map(|u| u.size.max(0))
            .sum::<i64>();
    let disk_usage = bytes_to_gb(disk_usage_bytes as u64);
    let disk_total = disk_total_override.unwrap_or(if disk_usage > 0.0 {
        disk_usage * DISK_TOTAL_HEADROOM
    } else {
        disk_usage
    });
    let cpu_sum: f64 = containers.iter().map(|c| c.cpu_usage).sum();

    HostStats {
        cpu_usage: round_to(cpu_sum, 1).min(100.0),
        memory_usage: round_to(memory_usage_bytes / 1024.0 / 1024.0 / 1024.0, 2),
        memory_total: bytes_to_gb(info.mem_total.unwrap_or(0).max(0) as u64),
        disk_usage,
        disk_total: round_to(disk_total, 2),
        network_ingress: round_to(network_rates.iter().map(|r| r.ingress_rate).sum(), 2),
        network_egress: round_to(network_rates.iter().map(|r| r.egress_rate).sum(), 2),
    }
}

/// `uptime` carries the Engine's `SystemTime` (wall clock), falling back to `now`.
pub fn build_host_details(info: &SystemInfo, now: DateTime<Utc>) -> HostDetails {
    HostDetails {
        hostname: info.name.clone().unwrap_or_else(|| "docker-host".into()),
        os: info
            .operating_system
            .clone()
            .unwrap_or_else(|| "Unknown OS".into()),
        docker_version: info
            .server_version
            .clone()
            .unwrap_or_else(|| "Unknown".into()),
        uptime: info
            .system_time
            .clone()
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        connection_mode: info
            .driver
            .clone()
            .unwrap_or_else(|| "Remote API".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::raw::Volume;
    use bollard::models::VolumeUsageData;
    use crate::models::ContainerStatus;

    fn container(cpu: f64, memory_mb: f64) -> Container {
        Container {
            id: "id".into(),
            name: "c".into(),
            image: "img".into(),
            status: ContainerStatus::Running,
            ports: vec![],
            cpu_usage: cpu,
            memory_usage: memory_mb,
            memory_limit: 0.0,
            uptime: "1 hour".into(),
        }
    }

    fn disk(layers: i64, volumes: &[i64]) -> SystemDataUsageResponse {
        SystemDataUsageResponse {
            layers_size: Some(layers),
            volumes: Some(
                volumes
                    .iter()
                    .map(|s| Volume {
                        name: "v".into(),
                        usage_data: Some(VolumeUsageData { size: *s, ref_count: 1 }),
                        ..Default::default()
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    #[test]
    fn totals_are_summed_and_capped() {
        let info = SystemInfo {
            mem_total: Some(8 * 1024 * 1024 * 1024),
            ..Default::default()
        };
        let containers = [container(60.0, 512.0), container(55.5, 512.0)];
        let rates = [
            NetworkRate { ingress_rate: 1.25, egress_rate: 0.5 },
            NetworkRate { ingress_rate: 0.0, egress_rate: 0.25 },
        ];
        let stats = build_host_stats(&info, &disk(0, &[]), &containers, &rates, None);
        assert_eq!(stats.cpu_usage, 100.0);
        assert_eq!(stats.memory_usage, 1.0);
        assert_eq!(stats.memory_total, 8.0);
        assert_eq!(stats.network_ingress, 1.25);
        assert_eq!(stats.network_egress, 0.75);
        assert_eq!(stats.disk_usage, 0.0);
        assert_eq!(stats.disk_total, 0.0);
    }

    #[test]
    fn disk_total_heuristic_and_override() {
        let gib = 1024 * 1024 * 1024;
        let disk = disk(3 * gib, &[gib, -1]);
        let stats = build_host_stats(&SystemInfo::default(), &disk, &[], &[], None);
        assert_eq!(stats.disk_usage, 4.0);
        assert_eq!(stats.disk_total, 5.0);

        let stats = build_host_stats(&SystemInfo::default(), &disk, &[], &[], Some(500.0));
        assert_eq!(stats.disk_total, 500.0);
    }

    #[test]
    fn details_fall_back_to_defaults() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let details = build_host_details(&SystemInfo::default(), now);
        assert_eq!(details.hostname, "docker-host");
        assert_eq!(details.os, "Unknown OS");
        assert_eq!(details.docker_version, "Unknown");
        assert_eq!(details.uptime, "2023-11-14T22:13:20.000Z");
        assert_eq!(details.connection_mode, "Remote API");
    }
}
