// Container list + per-container stats, fetched through a bounded worker pool.

use chrono::Utc;
use futures_util::future::join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::instrument;

use crate::engine::EngineClient;
use crate::engine::raw::{ContainerSummary, StatsSample};
use crate::error::EngineError;
use crate::metrics::{NetworkRate, network_rate_from_stats};
use crate::models::Container;
use crate::transform::build_container;

/// Stats requests in flight at once.
pub const STATS_CONCURRENCY: usize = 4;

/// Containers in Engine list order, with network rates and raw records index-aligned.
#[derive(Debug, Clone, Default)]
pub struct ContainerSnapshot {
    pub containers: Vec<Container>,
    pub network_rates: Vec<NetworkRate>,
    pub raw: Vec<ContainerSummary>,
}

/// Run `mapper` over `items` with at most `limit` calls pending.
///
/// `min(limit, n)` workers claim the next index from a shared cursor until the items run
/// out. Each result lands in its own slot, so output order matches input order regardless
/// of completion order.
pub async fn map_with_concurrency<T, R, F, Fut>(items: &[T], limit: usize, mapper: F) -> Vec<R>
where
    T: Clone,
    F: Fn(T) -> Fut,
    Fut: Future<Output = R>,
{
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    let cursor = AtomicUsize::new(0);
    let workers = (0..limit.clamp(1, n)).map(|_| {
        let cursor = &cursor;
        let mapper = &mapper;
        async move {
            let mut done = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                if index >= n {
                    break;
                }
                done.push((index, mapper(items[index].clone()).await));
            }
            done
        }
    });

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(n).collect();
    for (index, result) in join_all(workers).await.into_iter().flatten() {
        slots[index] = Some(result);
    }
    slots.into_iter().flatten().collect()
}

/// List every container and attach one stats sample each. A failed stats fetch degrades
/// that container to zero CPU, memory and network; a failed list fails the snapshot.
#[instrument(skip(engine), fields(operation = "gather_containers_with_stats"))]
pub async fn gather_containers_with_stats(
    engine: &EngineClient,
) -> Result<ContainerSnapshot, EngineError> {
    let raw = engine.list_containers(true).await?;
    let ids: Vec<String> = raw.iter().map(|c| c.id.clone().unwrap_or_default()).collect();

    let stats: Vec<Option<StatsSample>> = map_with_concurrency(&ids, STATS_CONCURRENCY, move |id| async move {
        match engine.container_stats(&id).await {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(container_id = %id, error = %e, "Failed to fetch container stats");
                None
            }
        }
    })
    .await;

    let now = Utc::now();
    let containers = raw
        .iter()
        .zip(&stats)
        .map(|(c, s)| build_container(c, s.as_ref().map(|s| &s.stats), now))
        .collect();
    let network_rates = stats
        .iter()
        .map(|s| s.as_ref().map(network_rate_from_stats).unwrap_or_default())
        .collect();

    Ok(ContainerSnapshot {
        containers,
        network_rates,
        raw,
    })
}
