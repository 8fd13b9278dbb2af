use crate::adjacency;
use crate::error::{GraphError, Result};
use crate::geometry::GeometryOracle;
use crate::owner_graph::OwnerGraph;
use crate::parcel_graph::ParcelGraph;
use crate::predicate::is_physically_adjacent;
use crate::types::{Parcel, ParcelId};
use geo::BoundingRect;
use rayon::prelude::*;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

type Candidate = (usize, usize);
type IndexedEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Knobs for the pairwise scan. Neither changes the resulting adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Pre-filter candidate pairs with an R-tree over bounding rectangles
    pub spatial_index: bool,

    /// Evaluate candidate pairs on the rayon thread pool
    pub parallel: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            spatial_index: true,
            parallel: true,
        }
    }
}

impl BuildOptions {
    /// Exhaustive, single-threaded scan
    pub const fn exhaustive() -> Self {
        Self {
            spatial_index: false,
            parallel: false,
        }
    }
}

/// Build parcel and owner graphs from a parcel list
pub struct GraphBuilder<O> {
    oracle: O,
    options: BuildOptions,
}

impl<O: GeometryOracle> GraphBuilder<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            options: BuildOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Build the parcel adjacency graph.
    ///
    /// Either the whole graph is built or an error is returned; a topology
    /// failure on any pair abandons the build.
    pub fn build_parcel_graph<'a>(&self, parcels: &'a [Parcel]) -> Result<ParcelGraph<'a>> {
        Self::check_input(parcels)?;
        self.validate_shapes(parcels)?;

        let candidates = if self.options.spatial_index {
            Self::indexed_candidates(parcels)
        } else {
            Self::exhaustive_candidates(parcels)
        };
        log::debug!(
            "Evaluating {} candidate pairs over {} parcels (spatial_index={}, parallel={})",
            candidates.len(),
            parcels.len(),
            self.options.spatial_index,
            self.options.parallel
        );

        let evaluate = |&(i, j): &Candidate| -> Result<Option<(ParcelId, ParcelId)>> {
            let (a, b) = (&parcels[i], &parcels[j]);
            let adjacent = is_physically_adjacent(&self.oracle, a.shape.as_ref(), b.shape.as_ref())
                .map_err(|source| GraphError::Topology {
                    first: a.id,
                    second: b.id,
                    source,
                })?;
            Ok(adjacent.then_some((a.id, b.id)))
        };

        // Workers only report pairs; the map is filled afterwards in candidate order
        let adjacent: Vec<Option<(ParcelId, ParcelId)>> = if self.options.parallel {
            candidates.par_iter().map(evaluate).collect::<Result<_>>()?
        } else {
            candidates.iter().map(evaluate).collect::<Result<_>>()?
        };

        let graph = ParcelGraph::new(parcels, adjacency::from_pairs(adjacent.into_iter().flatten()));

        log::info!(
            "Built parcel graph: {} vertices, {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );

        Ok(graph)
    }

    /// Build the owner graph, which keeps the parcel graph it was derived from
    pub fn build_owner_graph<'a>(&self, parcels: &'a [Parcel]) -> Result<OwnerGraph<'a>> {
        let graph = OwnerGraph::from_parcel_graph(self.build_parcel_graph(parcels)?);

        log::info!(
            "Built owner graph: {} vertices, {} edges",
            graph.owner_vertex_count(),
            graph.owner_edge_count()
        );

        Ok(graph)
    }

    fn check_input(parcels: &[Parcel]) -> Result<()> {
        if parcels.is_empty() {
            return Err(GraphError::EmptyInput);
        }
        let mut seen = HashSet::with_capacity(parcels.len());
        for parcel in parcels {
            if !seen.insert(parcel.id) {
                return Err(GraphError::DuplicateParcel(parcel.id));
            }
        }
        Ok(())
    }

    fn validate_shapes(&self, parcels: &[Parcel]) -> Result<()> {
        let mut shapeless = 0usize;
        for parcel in parcels {
            match &parcel.shape {
                Some(shape) => self
                    .oracle
                    .validate(shape)
                    .map_err(|source| GraphError::InvalidShape {
                        parcel: parcel.id,
                        source,
                    })?,
                None => shapeless += 1,
            }
        }
        if shapeless > 0 {
            log::debug!("{shapeless} parcels have no shape and cannot be adjacent");
        }
        Ok(())
    }

    fn exhaustive_candidates(parcels: &[Parcel]) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for i in 0..parcels.len() {
            if parcels[i].shape.is_none() {
                continue;
            }
            for j in (i + 1)..parcels.len() {
                if parcels[j].shape.is_some() {
                    candidates.push((i, j));
                }
            }
        }
        candidates
    }

    /// Pairs whose bounding rectangles meet, boundaries included.
    ///
    /// Touching shapes always have touching envelopes, so no adjacent pair
    /// is lost.
    fn indexed_candidates(parcels: &[Parcel]) -> Vec<Candidate> {
        let envelopes: Vec<Option<AABB<[f64; 2]>>> = parcels
            .iter()
            .map(|p| {
                p.shape
                    .as_ref()
                    .and_then(|shape| shape.bounding_rect())
                    .map(|r| AABB::from_corners([r.min().x, r.min().y], [r.max().x, r.max().y]))
            })
            .collect();

        let entries: Vec<IndexedEnvelope> = envelopes
            .iter()
            .enumerate()
            .filter_map(|(idx, env)| {
                env.as_ref()
                    .map(|env| GeomWithData::new(Rectangle::from_aabb(env.clone()), idx))
            })
            .collect();
        let tree = RTree::bulk_load(entries);

        let mut candidates = Vec::new();
        for (i, env) in envelopes.iter().enumerate() {
            let Some(env) = env else { continue };
            let mut hits: Vec<usize> = tree
                .locate_in_envelope_intersecting(env)
                .map(|entry| entry.data)
                .filter(|&j| j > i)
                .collect();
            hits.sort_unstable();
            candidates.extend(hits.into_iter().map(|j| (i, j)));
        }
        candidates
    }
}
