// CPU and network derivations from Engine stats samples.

use chrono::{DateTime, Utc};

use super::round_to;
use crate::engine::raw::{ContainerCpuStats, ContainerNetworkStats, ContainerStatsResponse, StatsSample};
use std::collections::HashMap;

/// CPU % between two cumulative samples, 1 decimal, clamped to [0, 100].
/// Returns 0 when either delta is not positive (first sample, stats unavailable).
pub fn cpu_percent(current: &ContainerCpuStats, previous: &ContainerCpuStats) -> f64 {
    let total = |s: &ContainerCpuStats| {
        s.cpu_usage
            .as_ref()
            .and_then(|u| u.total_usage)
            .unwrap_or(0) as i128
    };
    let system = |s: &ContainerCpuStats| s.system_cpu_usage.unwrap_or(0) as i128;

    let cpu_delta = total(current) - total(previous);
    let system_delta = system(current) - system(previous);
    if cpu_delta <= 0 || system_delta <= 0 {
        return 0.0;
    }
    let online = current
        .online_cpus
        .filter(|n| *n > 0)
        .map(|n| n as f64)
        .or_else(|| {
            current
                .cpu_usage
                .as_ref()
                .and_then(|u| u.percpu_usage.as_ref())
                .map(|v| v.len() as f64)
                .filter(|n| *n > 0.0)
        })
        .unwrap_or(1.0);

    let percent = (cpu_delta as f64 / system_delta as f64) * online * 100.0;
    round_to(percent, 1).clamp(0.0, 100.0)
}

/// CPU % of a stats response; 0 when either CPU block is missing.
pub fn cpu_percent_from_stats(stats: &ContainerStatsResponse) -> f64 {
    match (&stats.cpu_stats, &stats.precpu_stats) {
        (Some(current), Some(previous)) => cpu_percent(current, previous),
        _ => 0.0,
    }
}

/// Interface byte counters summed over all interfaces at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetworkSample {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub read_at: Option<DateTime<Utc>>,
}

impl NetworkSample {
    pub fn from_counters(
        networks: Option<&HashMap<String, ContainerNetworkStats>>,
        read_at: Option<&str>,
    ) -> Self {
        let (rx_bytes, tx_bytes) = networks.map_or((0, 0), |n| {
            n.values().fold((0u64, 0u64), |(rx, tx), v| {
                (
                    rx.saturating_add(v.rx_bytes.unwrap_or(0)),
                    tx.saturating_add(v.tx_bytes.unwrap_or(0)),
                )
            })
        });
        Self {
            rx_bytes,
            tx_bytes,
            read_at: read_at.and_then(parse_sample_time),
        }
    }
}

/// Engine sample timestamps; the zero time (`0001-01-01T00:00:00Z`) means "no sample".
fn parse_sample_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
        .filter(|t| t.timestamp() > 0)
}

/// Per-container throughput in MB/s.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetworkRate {
    pub ingress_rate: f64,
    pub egress_rate: f64,
}

/// Rate between two samples: byte deltas over elapsed seconds (minimum 1 s), MB/s, 2 decimals.
/// Without a previous sample the counters are measured from zero over one second.
pub fn network_rate(current: &NetworkSample, previous: Option<&NetworkSample>) -> NetworkRate {
    let zero = NetworkSample {
        read_at: current.read_at,
        ..Default::default()
    };
    let previous = previous.unwrap_or(&zero);

    let elapsed_ms = match (current.read_at, previous.read_at) {
        (Some(now), Some(before)) => (now - before).num_milliseconds(),
        _ => 0,
    };
    let seconds = (elapsed_ms as f64 / 1000.0).max(1.0);

    let rate = |now: u64, before: u64| {
        let delta = now.saturating_sub(before) as f64;
        round_to(delta / seconds / 1024.0 / 1024.0, 2)
    };
    NetworkRate {
        ingress_rate: rate(current.rx_bytes, previous.rx_bytes),
        egress_rate: rate(current.tx_bytes, previous.tx_bytes),
    }
}

/// Network rate of a stats response. The previous counters come from `precpu_stats.networks`
/// when the engine reports them; the previous time from `preread`, then `precpu_stats.read`.
pub fn network_rate_from_stats(sample: &StatsSample) -> NetworkRate {
    let stats = &sample.stats;
    let current = NetworkSample::from_counters(stats.networks.as_ref(), stats.read.as_deref());
    let previous_read = stats
        .preread
        .as_deref()
        .filter(|s| parse_sample_time(s).is_some())
        .or(sample.previous.read.as_deref());
    let mut previous =
        NetworkSample::from_counters(sample.previous.networks.as_ref(), previous_read);
    if previous.read_at.is_none() {
        previous.read_at = current.read_at;
    }
    network_rate(&current, Some(&previous))
}
