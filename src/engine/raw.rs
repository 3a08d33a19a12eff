// Engine API payloads: bollard's generated models, plus the few fields they leave out.

use serde::Deserialize;
use std::collections::HashMap;

pub use bollard::models::{
    ContainerCpuStats, ContainerInspectResponse, ContainerNetworkStats, ContainerPruneResponse,
    ContainerStatsResponse, ContainerSummary, EventMessage, IdResponse, ImagePruneResponse,
    ImageSummary, Network, NetworkPruneResponse, SystemDataUsageResponse, SystemInfo, Volume,
    VolumeListResponse,
};

/// Counters some engines report inside `precpu_stats`, next to the previous CPU sample.
/// [`ContainerCpuStats`] has no slot for them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviousSample {
    pub networks: Option<HashMap<String, ContainerNetworkStats>>,
    /// RFC 3339.
    pub read: Option<String>,
}

/// One `GET /containers/{id}/stats?stream=false` response.
#[derive(Debug, Clone, Default)]
pub struct StatsSample {
    pub stats: ContainerStatsResponse,
    pub previous: PreviousSample,
}

impl StatsSample {
    pub fn from_document(document: serde_json::Value) -> Result<Self, serde_json::Error> {
        let previous = match document.get("precpu_stats") {
            Some(block) if !block.is_null() => serde_json::from_value(block.clone())?,
            _ => PreviousSample::default(),
        };
        Ok(Self {
            stats: serde_json::from_value(document)?,
            previous,
        })
    }
}

/// One line of `GET /events`. Engines before API 1.22 only send `status` and `id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventLine {
    #[serde(flatten)]
    pub message: EventMessage,
    pub status: Option<String>,
    pub id: Option<String>,
}

impl EventLine {
    pub fn kind(&self) -> Option<String> {
        self.message.typ.as_ref().map(ToString::to_string)
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or_else(|| self.message.actor.as_ref().and_then(|a| a.id.as_deref()))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.message
            .actor
            .as_ref()
            .and_then(|a| a.attributes.as_ref())
            .and_then(|attrs| attrs.get(key))
            .map(String::as_str)
    }
}
