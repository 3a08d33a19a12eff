// Images, volumes and networks for display.

use chrono::{DateTime, Utc};

use crate::engine::raw::{ContainerSummary, ImageSummary, Network, Volume};
use crate::metrics::{human_file_size, relative_time_from_unix, truncate_id};
use crate::models::{DANGLING_NAME, DockerImage, DockerNetwork, DockerVolume};

/// `repo:tag` split at the last `:` that is not part of a registry host.
/// Missing tags read as `latest`.
pub fn split_reference(reference: &str) -> (&str, &str) {
    match reference.rsplit_once(':') {
        Some((name, tag)) if !tag.contains('/') && !name.is_empty() => (name, tag),
        _ => (reference, "latest"),
    }
}

/// One entry per repo tag; untagged images become a single `<none>:<none>` entry.
pub fn build_images(raw: &[ImageSummary], now: DateTime<Utc>) -> Vec<DockerImage> {
    let mut images = Vec::with_capacity(raw.len());
    for image in raw {
        let id = truncate_id(&image.id);
        let size = human_file_size(image.size as f64);
        let created = relative_time_from_unix(image.created, now);
        if image.repo_tags.is_empty() {
            images.push(DockerImage {
                id,
                name: DANGLING_NAME.into(),
                tag: DANGLING_NAME.into(),
                size,
                created,
            });
            continue;
        }
        for reference in &image.repo_tags {
            let (name, tag) = split_reference(reference);
            images.push(DockerImage {
                id: id.clone(),
                name: name.into(),
                tag: tag.into(),
                size: size.clone(),
                created: created.clone(),
            });
        }
    }
    images
}

/// `containers` are list records; a volume is in use by every container mounting it by name.
pub fn build_volumes(raw: &[Volume], containers: &[ContainerSummary]) -> Vec<DockerVolume> {
    raw.iter()
        .map(|volume| {
            let containers_in_use = containers
                .iter()
                .filter(|c| {
                    c.mounts
                        .iter()
                        .flatten()
                        .any(|m| m.name.as_deref() == Some(volume.name.as_str()))
                })
                .map(|c| {
                    c.names
                        .as_ref()
                        .and_then(|names| names.first())
                        .map(|n| n.trim_start_matches('/').to_string())
                        .unwrap_or_else(|| truncate_id(c.id.as_deref().unwrap_or_default()))
                })
                .collect();
            let size = volume.usage_data.as_ref().map_or(0, |u| u.size.max(0));
            DockerVolume {
                name: volume.name.clone(),
                driver: volume.driver.clone(),
                size: human_file_size(size as f64),
                containers_in_use,
            }
        })
        .collect()
}

pub fn build_networks(raw: &[Network]) -> Vec<DockerNetwork> {
    raw.iter()
        .map(|n| DockerNetwork {
            id: truncate_id(n.id.as_deref().unwrap_or_default()),
            name: n.name.clone().unwrap_or_default(),
            driver: n.driver.clone().unwrap_or_default(),
            scope: n.scope.clone().unwrap_or_default(),
        })
        .collect()
}
