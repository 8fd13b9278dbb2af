//! Location-scoped average area.
//!
//! Two flavours exist: a plain mean over the matching parcels, and an
//! owner-level mean where each parcel is first merged with the same-owner
//! parcels it directly touches.

use crate::error::Result;
use crate::location::LocationFilter;
use crate::parcel_graph::ParcelGraph;
use crate::types::{OwnerId, ParcelId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Result of an area aggregation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaStatistics {
    /// Parcels matching the filter
    pub parcels: usize,

    /// Distinct owners among the matching parcels
    pub owners: usize,

    /// Number of values averaged (parcels or owners)
    pub units: usize,

    /// Sum of all averaged values
    pub total_area: f64,

    pub average_area: f64,
}

pub(crate) fn plain_statistics(
    graph: &ParcelGraph<'_>,
    filter: &LocationFilter,
) -> Result<AreaStatistics> {
    let selected = filter.select(graph.parcels().iter().copied())?;

    let total_area: f64 = selected.iter().map(|p| p.area).sum();
    let owners: HashSet<OwnerId> = selected.iter().map(|p| p.owner).collect();

    Ok(AreaStatistics {
        parcels: selected.len(),
        owners: owners.len(),
        units: selected.len(),
        total_area,
        average_area: total_area / selected.len() as f64,
    })
}

/// Owner-level mean with single-hop same-owner merging.
///
/// Each unvisited matching parcel seeds an account; the account absorbs
/// every unvisited direct neighbor with the same owner. Neighbors of those
/// neighbors are not followed. Neighbors are taken from the whole graph, so
/// a neighbor outside the filter can still be absorbed.
pub(crate) fn merged_statistics(
    graph: &ParcelGraph<'_>,
    filter: &LocationFilter,
) -> Result<AreaStatistics> {
    let selected = filter.select(graph.parcels().iter().copied())?;

    let mut visited: HashSet<ParcelId> = HashSet::with_capacity(selected.len());
    let mut per_owner: BTreeMap<OwnerId, f64> = BTreeMap::new();

    for seed in &selected {
        if !visited.insert(seed.id) {
            continue;
        }

        let mut account = seed.area;
        for neighbor in graph.adjacent_to(seed) {
            if neighbor.owner == seed.owner && visited.insert(neighbor.id) {
                account += neighbor.area;
            }
        }

        *per_owner.entry(seed.owner).or_insert(0.0) += account;
    }

    let total_area: f64 = per_owner.values().sum();
    log::debug!(
        "Merged {} parcels into {} owner totals for {}",
        selected.len(),
        per_owner.len(),
        filter
    );

    Ok(AreaStatistics {
        parcels: selected.len(),
        owners: per_owner.len(),
        units: per_owner.len(),
        total_area,
        average_area: total_area / per_owner.len() as f64,
    })
}
