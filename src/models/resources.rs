// Image, volume and network display models

use serde::{Deserialize, Serialize};

/// Untagged image placeholder, as the Engine CLI renders it.
pub const DANGLING_NAME: &str = "<none>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerImage {
    pub id: String,
    pub name: String,
    pub tag: String,
    pub size: String,
    pub created: String,
}

impl DockerImage {
    pub fn is_dangling(&self) -> bool {
        self.name == DANGLING_NAME
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerVolume {
    pub name: String,
    pub driver: String,
    pub size: String,
    pub containers_in_use: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerNetwork {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub scope: String,
}

/// Outcome of `POST /system/prune`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneReport {
    pub containers_deleted: Vec<String>,
    pub images_deleted: Vec<String>,
    pub networks_deleted: Vec<String>,
    pub space_reclaimed: u64,
    pub space_reclaimed_human: String,
}
