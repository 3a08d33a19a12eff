// JSON envelope and request bodies for the HTTP surface

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::RestartPolicy;

/// `{success, data?, error?}` wrapper around every response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Port given as `8080` or `"8080"`; empty strings count as absent.
fn port_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Either {
        Number(u64),
        Text(String),
    }
    Ok(match Option::<Either>::deserialize(deserializer)? {
        Some(Either::Number(n)) => Some(n.to_string()),
        Some(Either::Text(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        None => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMappingRequest {
    #[serde(default, deserialize_with = "port_string")]
    pub host_port: Option<String>,
    #[serde(default, deserialize_with = "port_string")]
    pub container_port: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContainerRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ports: Vec<PortMappingRequest>,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub restart_policy: Option<RestartPolicy>,
    #[serde(default)]
    pub start: Option<bool>,
}

impl CreateContainerRequest {
    /// Containers start after creation unless `start` is explicitly false.
    pub fn should_start(&self) -> bool {
        self.start != Some(false)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecRequest {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub reference: Option<String>,
}

/// Body for both volume and network creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateResourceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsQuery {
    pub tail: Option<u32>,
    pub since: Option<i64>,
}
