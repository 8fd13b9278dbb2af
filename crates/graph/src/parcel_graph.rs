use crate::adjacency::{self, AdjacencyMap};
use crate::aggregate::{self, AreaStatistics};
use crate::error::Result;
use crate::location::LocationFilter;
use crate::types::{Parcel, ParcelId};
use std::collections::{BTreeSet, HashMap};

/// Undirected physical-adjacency graph over parcels.
///
/// Borrows the parcels it was built from and is read-only once built, so it
/// can be shared between threads for concurrent queries.
#[derive(Debug, Clone)]
pub struct ParcelGraph<'a> {
    /// Input parcels in their original order
    parcels: Vec<&'a Parcel>,

    /// Parcel ID -> parcel
    index: HashMap<ParcelId, &'a Parcel>,

    adjacency: AdjacencyMap<ParcelId>,
}

impl<'a> ParcelGraph<'a> {
    pub(crate) fn new(parcels: &'a [Parcel], adjacency: AdjacencyMap<ParcelId>) -> Self {
        Self {
            parcels: parcels.iter().collect(),
            index: parcels.iter().map(|p| (p.id, p)).collect(),
            adjacency,
        }
    }

    /// All parcels the graph was built from, adjacent or not
    #[must_use]
    pub fn parcels(&self) -> &[&'a Parcel] {
        &self.parcels
    }

    #[must_use]
    pub fn parcel(&self, id: ParcelId) -> Option<&'a Parcel> {
        self.index.get(&id).copied()
    }

    /// Parcels adjacent to `parcel`, ordered by id
    #[must_use]
    pub fn adjacent_to(&self, parcel: &Parcel) -> Vec<&'a Parcel> {
        self.adjacent_ids(parcel.id)
            .into_iter()
            .filter_map(|id| self.parcel(id))
            .collect()
    }

    #[must_use]
    pub fn adjacent_ids(&self, id: ParcelId) -> BTreeSet<ParcelId> {
        adjacency::neighbors(&self.adjacency, id)
    }

    /// `false` when either parcel is unknown to the graph
    #[must_use]
    pub fn are_adjacent(&self, a: &Parcel, b: &Parcel) -> bool {
        adjacency::are_adjacent(&self.adjacency, a.id, b.id)
    }

    /// Parcels with at least one neighbor
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        adjacency::vertex_count(&self.adjacency)
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        adjacency::edge_count(&self.adjacency)
    }

    #[must_use]
    pub fn adjacency(&self) -> &AdjacencyMap<ParcelId> {
        &self.adjacency
    }

    /// Mean parcel area within `filter`, without merging neighbors
    pub fn average_area(&self, filter: &LocationFilter) -> Result<f64> {
        Ok(self.area_statistics(filter)?.average_area)
    }

    pub fn area_statistics(&self, filter: &LocationFilter) -> Result<AreaStatistics> {
        aggregate::plain_statistics(self, filter)
    }
}
