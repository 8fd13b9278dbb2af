use crate::adjacency::{self, AdjacencyMap};
use crate::aggregate::{self, AreaStatistics};
use crate::error::{GraphError, Result};
use crate::location::LocationFilter;
use crate::parcel_graph::ParcelGraph;
use crate::types::{OwnerId, Parcel};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Owner-level adjacency derived from cross-owner parcel adjacency.
///
/// The parcel graph it was derived from is kept, since area merging and
/// exchange search both need parcel-level answers.
#[derive(Debug, Clone)]
pub struct OwnerGraph<'a> {
    parcels: ParcelGraph<'a>,
    owners: AdjacencyMap<OwnerId>,
}

/// Size summary of both graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Parcels in the input
    pub parcels: usize,

    pub parcel_vertices: usize,
    pub parcel_edges: usize,

    /// Distinct owners in the input
    pub owners: usize,

    pub owner_vertices: usize,
    pub owner_edges: usize,

    /// Parcels without any neighbor
    pub isolated_parcels: usize,
}

impl<'a> OwnerGraph<'a> {
    pub fn from_parcel_graph(parcels: ParcelGraph<'a>) -> Self {
        let owner_pairs = parcels.adjacency().all_edges().filter_map(|(a, b, _)| {
            let first = parcels.parcel(a)?.owner;
            let second = parcels.parcel(b)?.owner;
            (first != second).then_some((first, second))
        });
        let owners = adjacency::from_pairs(owner_pairs);
        Self { parcels, owners }
    }

    #[must_use]
    pub fn parcel_graph(&self) -> &ParcelGraph<'a> {
        &self.parcels
    }

    /// Owners sharing a boundary with `owner`
    pub fn adjacent_owners(&self, owner: OwnerId) -> Result<BTreeSet<OwnerId>> {
        check_owner(owner)?;
        Ok(adjacency::neighbors(&self.owners, owner))
    }

    pub fn owners_are_adjacent(&self, first: OwnerId, second: OwnerId) -> Result<bool> {
        check_owner(first)?;
        check_owner(second)?;
        Ok(adjacency::are_adjacent(&self.owners, first, second))
    }

    #[must_use]
    pub fn owner_vertex_count(&self) -> usize {
        adjacency::vertex_count(&self.owners)
    }

    #[must_use]
    pub fn owner_edge_count(&self) -> usize {
        adjacency::edge_count(&self.owners)
    }

    #[must_use]
    pub fn owner_adjacency(&self) -> &AdjacencyMap<OwnerId> {
        &self.owners
    }

    #[must_use]
    pub fn adjacent_to(&self, parcel: &Parcel) -> Vec<&'a Parcel> {
        self.parcels.adjacent_to(parcel)
    }

    #[must_use]
    pub fn are_adjacent(&self, a: &Parcel, b: &Parcel) -> bool {
        self.parcels.are_adjacent(a, b)
    }

    /// Average area per owner within `filter`, merging each parcel with its
    /// directly adjacent same-owner parcels
    pub fn average_area(&self, filter: &LocationFilter) -> Result<f64> {
        Ok(self.area_statistics(filter)?.average_area)
    }

    pub fn area_statistics(&self, filter: &LocationFilter) -> Result<AreaStatistics> {
        aggregate::merged_statistics(&self.parcels, filter)
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let parcels = self.parcels.parcels();
        let owners: HashSet<OwnerId> = parcels.iter().map(|p| p.owner).collect();
        let isolated = parcels
            .iter()
            .filter(|p| !self.parcels.adjacency().contains_node(p.id))
            .count();

        GraphStats {
            parcels: parcels.len(),
            parcel_vertices: self.parcels.vertex_count(),
            parcel_edges: self.parcels.edge_count(),
            owners: owners.len(),
            owner_vertices: self.owner_vertex_count(),
            owner_edges: self.owner_edge_count(),
            isolated_parcels: isolated,
        }
    }
}

fn check_owner(owner: OwnerId) -> Result<()> {
    if owner.is_valid() {
        Ok(())
    } else {
        Err(GraphError::InvalidOwner(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParcelId;

    fn graph_of<'a>(parcels: &'a [Parcel], pairs: &[(u64, u64)]) -> OwnerGraph<'a> {
        let adjacency = adjacency::from_pairs(
            pairs
                .iter()
                .map(|&(a, b)| (ParcelId(a), ParcelId(b))),
        );
        OwnerGraph::from_parcel_graph(ParcelGraph::new(parcels, adjacency))
    }

    #[test]
    fn test_same_owner_adjacency_adds_no_owner_edge() {
        let parcels = vec![Parcel::new(1, 7, 1.0), Parcel::new(2, 7, 1.0)];
        let graph = graph_of(&parcels, &[(1, 2)]);
        assert_eq!(graph.parcel_graph().edge_count(), 1);
        assert_eq!(graph.owner_vertex_count(), 0);
        assert_eq!(graph.owner_edge_count(), 0);
        assert!(!graph.owners_are_adjacent(OwnerId(7), OwnerId(7)).unwrap());
    }

    #[test]
    fn test_owner_edges_are_deduplicated() {
        let parcels = vec![
            Parcel::new(1, 1, 1.0),
            Parcel::new(2, 1, 1.0),
            Parcel::new(3, 2, 1.0),
            Parcel::new(4, 3, 1.0),
        ];
        let graph = graph_of(&parcels, &[(1, 3), (2, 3), (3, 4)]);
        assert_eq!(graph.owner_edge_count(), 2);
        assert_eq!(
            graph.adjacent_owners(OwnerId(2)).unwrap(),
            BTreeSet::from([OwnerId(1), OwnerId(3)])
        );
        assert!(graph.owners_are_adjacent(OwnerId(3), OwnerId(2)).unwrap());
        assert!(!graph.owners_are_adjacent(OwnerId(1), OwnerId(3)).unwrap());
        assert!(graph.adjacent_owners(OwnerId(42)).unwrap().is_empty());
    }

    #[test]
    fn test_zero_owner_is_rejected() {
        let parcels = vec![Parcel::new(1, 1, 1.0)];
        let graph = graph_of(&parcels, &[]);
        assert!(matches!(
            graph.adjacent_owners(OwnerId(0)),
            Err(GraphError::InvalidOwner(OwnerId(0)))
        ));
        assert!(graph.owners_are_adjacent(OwnerId(1), OwnerId(0)).is_err());
    }

    #[test]
    fn test_stats_counts_isolated_parcels() {
        let parcels = vec![
            Parcel::new(1, 1, 1.0),
            Parcel::new(2, 2, 1.0),
            Parcel::new(3, 2, 1.0),
        ];
        let stats = graph_of(&parcels, &[(1, 2)]).stats();
        assert_eq!(
            stats,
            GraphStats {
                parcels: 3,
                parcel_vertices: 2,
                parcel_edges: 1,
                owners: 2,
                owner_vertices: 2,
                owner_edges: 1,
                isolated_parcels: 1,
            }
        );
    }
}
