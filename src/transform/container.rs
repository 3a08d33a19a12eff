// Engine container records to display models.

use bollard::models::PortBinding;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::engine::InspectedContainer;
use crate::engine::raw::{ContainerStatsResponse, ContainerSummary};
use crate::metrics::{bytes_to_mb, cpu_percent_from_stats, format_duration};
use crate::models::{
    Container, ContainerDetails, ContainerStatus, NetworkIdentity, Port, RestartPolicy,
    VolumeMount,
};

const UNKNOWN: &str = "N/A";

/// Fields shared by list entries and inspect records.
#[derive(Debug, Default)]
struct Listing {
    id: String,
    name: Option<String>,
    image: Option<String>,
    state: Option<String>,
    ports: Vec<Port>,
    /// Unix seconds.
    created: i64,
}

impl Listing {
    fn from_summary(raw: &ContainerSummary) -> Self {
        let ports = raw
            .ports
            .iter()
            .flatten()
            .map(|p| Port {
                private_port: p.private_port,
                public_port: p.public_port,
                protocol: p
                    .typ
                    .as_ref()
                    .map(ToString::to_string)
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "tcp".into()),
            })
            .collect();
        Self {
            id: raw.id.clone().unwrap_or_default(),
            name: raw.names.as_ref().and_then(|n| n.first()).cloned(),
            image: raw.image.clone(),
            state: raw
                .state
                .as_ref()
                .map(ToString::to_string)
                .filter(|s| !s.is_empty())
                .or_else(|| raw.status.clone()),
            ports,
            created: raw.created.unwrap_or(0),
        }
    }

    fn into_container(self, stats: Option<&ContainerStatsResponse>, now: DateTime<Utc>) -> Container {
        let uptime_seconds = (now.timestamp() - self.created).max(0) as f64;
        let memory = stats.and_then(|s| s.memory_stats.as_ref());
        let memory_usage = memory.and_then(|m| m.usage).unwrap_or(0);
        let memory_limit = memory.and_then(|m| m.limit).unwrap_or(0);
        let name = self
            .name
            .as_deref()
            .unwrap_or(&self.id)
            .trim_start_matches('/')
            .to_string();

        Container {
            name,
            image: self.image.unwrap_or_else(|| "unknown".into()),
            status: ContainerStatus::from_engine(self.state.as_deref()),
            ports: self.ports,
            cpu_usage: stats.map_or(0.0, cpu_percent_from_stats),
            memory_usage: bytes_to_mb(memory_usage),
            memory_limit: bytes_to_mb(memory_limit),
            uptime: format_duration(uptime_seconds),
            id: self.id,
        }
    }
}

/// Build a [`Container`]; without stats CPU and memory read as zero.
pub fn build_container(
    raw: &ContainerSummary,
    stats: Option<&ContainerStatsResponse>,
    now: DateTime<Utc>,
) -> Container {
    Listing::from_summary(raw).into_container(stats, now)
}

/// Inspect port map (`"80/tcp" -> bindings`) flattened to list-style ports, ordered by key.
/// Unpublished entries keep only the private port.
fn inspect_ports(ports: &HashMap<String, Option<Vec<PortBinding>>>) -> Vec<Port> {
    let sorted: BTreeMap<_, _> = ports.iter().collect();
    let mut out = Vec::new();
    for (key, bindings) in sorted {
        let (port, protocol) = key.split_once('/').unwrap_or((key.as_str(), "tcp"));
        let private_port = port.parse().unwrap_or(0);
        let port = |public_port| Port {
            private_port,
            public_port,
            protocol: protocol.to_string(),
        };
        match bindings.as_deref() {
            Some(list) if !list.is_empty() => out.extend(list.iter().map(|binding| {
                port(binding.host_port.as_deref().and_then(|p| p.parse().ok()))
            })),
            _ => out.push(port(None)),
        }
    }
    out
}

/// `KEY=value` entries to a map; later duplicates win, values keep any further `=`.
fn parse_environment(env: &[String]) -> BTreeMap<String, String> {
    env.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (entry.clone(), String::new()),
        })
        .collect()
}

pub fn build_container_details(
    inspected: InspectedContainer,
    stats: Option<&ContainerStatsResponse>,
    now: DateTime<Utc>,
) -> ContainerDetails {
    let InspectedContainer { parsed, document } = inspected;
    let settings = parsed.network_settings.clone().unwrap_or_default();
    let created = parsed
        .created
        .as_deref()
        .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
        .map_or(now.timestamp(), |t| t.timestamp());

    let listing = Listing {
        id: parsed.id.clone().unwrap_or_default(),
        name: parsed.name.clone(),
        image: parsed.config.as_ref().and_then(|c| c.image.clone()),
        state: parsed
            .state
            .as_ref()
            .and_then(|s| s.status.as_ref())
            .map(ToString::to_string),
        ports: settings.ports.as_ref().map(inspect_ports).unwrap_or_default(),
        created,
    };
    let container = listing.into_container(stats, now);

    let restart_policy = RestartPolicy::from_engine(
        parsed
            .host_config
            .as_ref()
            .and_then(|h| h.restart_policy.as_ref())
            .and_then(|r| r.name.as_ref())
            .map(ToString::to_string)
            .as_deref(),
    );
    let environment = parsed
        .config
        .as_ref()
        .and_then(|c| c.env.as_deref())
        .map(parse_environment)
        .unwrap_or_default();
    let volumes = parsed
        .mounts
        .iter()
        .flatten()
        .map(|m| VolumeMount {
            host_path: m.source.clone().unwrap_or_default(),
            container_path: m.destination.clone().unwrap_or_default(),
        })
        .collect();

    // Lowest network name first; the engine's map has no order.
    let first = settings
        .networks
        .iter()
        .flatten()
        .min_by(|a, b| a.0.cmp(b.0))
        .map(|(_, endpoint)| endpoint);
    // Older engines also report the default bridge address at the top level.
    let legacy_ip = document
        .pointer("/NetworkSettings/IPAddress")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    let or_unknown = |v: Option<&String>| {
        v.filter(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| UNKNOWN.into())
    };
    let network = NetworkIdentity {
        ip_address: or_unknown(
            first
                .and_then(|n| n.ip_address.as_ref())
                .filter(|s| !s.is_empty())
                .or(legacy_ip.as_ref()),
        ),
        gateway: or_unknown(first.and_then(|n| n.gateway.as_ref())),
        mac_address: or_unknown(first.and_then(|n| n.mac_address.as_ref())),
    };

    ContainerDetails {
        container,
        restart_policy,
        environment,
        volumes,
        network,
        inspect: document,
    }
}
