// Container display models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Container status as shown by the dashboard; serializes lowercase (e.g. "running").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    Exited,
    Paused,
    Restarting,
    Created,
}

impl ContainerStatus {
    /// Parse an Engine state or status string by substring, first match in table order.
    /// Unknown or missing values are `Created`.
    pub fn from_engine(raw: Option<&str>) -> Self {
        const TABLE: [(&str, ContainerStatus); 6] = [
            ("running", ContainerStatus::Running),
            ("exited", ContainerStatus::Exited),
            ("stopped", ContainerStatus::Exited),
            ("created", ContainerStatus::Created),
            ("restarting", ContainerStatus::Restarting),
            ("paused", ContainerStatus::Paused),
        ];
        let Some(raw) = raw else {
            return ContainerStatus::Created;
        };
        let lower = raw.to_lowercase();
        TABLE
            .iter()
            .find(|(key, _)| lower.contains(key))
            .map_or(ContainerStatus::Created, |(_, status)| *status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub private_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_port: Option<u16>,
    /// Always present; "tcp" unless the Engine says otherwise.
    #[serde(rename = "type")]
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    pub status: ContainerStatus,
    pub ports: Vec<Port>,
    /// Percent, 1 decimal.
    pub cpu_usage: f64,
    /// MB, 1 decimal.
    pub memory_usage: f64,
    /// MB, 1 decimal.
    pub memory_limit: f64,
    pub uptime: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    #[default]
    No,
    OnFailure,
    UnlessStopped,
    Always,
}

impl RestartPolicy {
    pub fn from_engine(name: Option<&str>) -> Self {
        match name.unwrap_or_default() {
            "always" => RestartPolicy::Always,
            "unless-stopped" => RestartPolicy::UnlessStopped,
            "on-failure" => RestartPolicy::OnFailure,
            _ => RestartPolicy::No,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::No => "no",
            RestartPolicy::OnFailure => "on-failure",
            RestartPolicy::UnlessStopped => "unless-stopped",
            RestartPolicy::Always => "always",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub host_path: String,
    pub container_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkIdentity {
    pub ip_address: String,
    pub gateway: String,
    pub mac_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetails {
    #[serde(flatten)]
    pub container: Container,
    pub restart_policy: RestartPolicy,
    pub environment: BTreeMap<String, String>,
    pub volumes: Vec<VolumeMount>,
    pub network: NetworkIdentity,
    /// Raw inspect document.
    pub inspect: serde_json::Value,
}
