//! # Cadastre Graph
//!
//! Physical adjacency between cadastral parcels and, through them, between
//! owners.
//!
//! ## Features
//!
//! - **Parcel graph** - which parcels touch or overlap without nesting
//! - **Owner graph** - which owners share a boundary
//! - **Average area** - location-scoped means, optionally merging adjacent
//!   parcels of the same owner
//! - **Exchange suggestions** - ranked swaps of adjacent parcels between
//!   neighboring owners
//!
//! ## Architecture
//!
//! ```text
//! Parcel[]
//!     │
//!     ├──> Graph Builder
//!     │      ├─ Validate shapes (GeometryOracle)
//!     │      ├─ Candidate pairs (exhaustive or R-tree)
//!     │      └─ Adjacency predicate per pair (optionally rayon)
//!     │
//!     ├──> Parcel Graph ──> plain average area
//!     │
//!     ├──> Owner Graph (keeps the parcel graph)
//!     │      └─ merged average area
//!     │
//!     └──> Exchange Suggestion Engine
//!            ├─ Group parcels by owner
//!            ├─ Adjacent cross-owner parcel pairs
//!            └─ Score, rank, truncate
//! ```
//!
//! ## Example
//!
//! ```
//! use cadastre_graph::{ExchangeSuggestionEngine, GeoOracle, GraphBuilder, Parcel};
//! use geo::{polygon, MultiPolygon};
//!
//! let square = |x: f64| {
//!     MultiPolygon::new(vec![polygon![
//!         (x: x, y: 0.0),
//!         (x: x, y: 1.0),
//!         (x: x + 1.0, y: 1.0),
//!         (x: x + 1.0, y: 0.0),
//!     ]])
//! };
//! let parcels = vec![
//!     Parcel::new(1, 10, 100.0).with_shape(square(0.0)),
//!     Parcel::new(2, 20, 200.0).with_shape(square(1.0)),
//! ];
//!
//! let graph = GraphBuilder::new(GeoOracle::new()).build_owner_graph(&parcels)?;
//! assert!(graph.are_adjacent(&parcels[0], &parcels[1]));
//!
//! let suggestions = ExchangeSuggestionEngine::new(&graph).generate_suggestions(5)?;
//! assert_eq!(suggestions.len(), 1);
//! # Ok::<(), cadastre_graph::GraphError>(())
//! ```

pub mod adjacency;

mod aggregate;
mod builder;
mod error;
mod exchange;
mod geometry;
mod location;
mod owner_graph;
mod parcel_graph;
mod predicate;
mod types;

pub use aggregate::AreaStatistics;
pub use builder::{BuildOptions, GraphBuilder};
pub use error::{ErrorKind, GraphError, Result};
pub use exchange::{ExchangeSuggestion, ExchangeSuggestionEngine, SuggestionSummary};
pub use geometry::{GeoOracle, GeometryOracle, Relation, TopologyError};
pub use location::LocationFilter;
pub use owner_graph::{GraphStats, OwnerGraph};
pub use parcel_graph::ParcelGraph;
pub use predicate::is_physically_adjacent;
pub use types::{Location, OwnerId, Parcel, ParcelId, Shape};
