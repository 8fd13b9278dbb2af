//! Pure helpers over an undirected adjacency map.
//!
//! Both the parcel graph and the owner graph compose an [`AdjacencyMap`];
//! these functions are the only way edges get in, which keeps the maps
//! symmetric and free of self-loops.

use petgraph::graphmap::{NodeTrait, UnGraphMap};
use std::collections::BTreeSet;

/// Undirected, deduplicated adjacency keyed by a comparable vertex type
pub type AdjacencyMap<V> = UnGraphMap<V, ()>;

/// Build a map from vertex pairs. Self-pairs and repeats are dropped.
pub fn from_pairs<V, I>(pairs: I) -> AdjacencyMap<V>
where
    V: NodeTrait,
    I: IntoIterator<Item = (V, V)>,
{
    let mut map = AdjacencyMap::new();
    for (a, b) in pairs {
        add_edge(&mut map, a, b);
    }
    map
}

/// Insert an undirected edge; returns `true` if it was not present before
pub fn add_edge<V: NodeTrait>(map: &mut AdjacencyMap<V>, a: V, b: V) -> bool {
    if a == b {
        return false;
    }
    map.add_edge(a, b, ()).is_none()
}

/// Neighbors of `vertex`, empty if it is not in the map
pub fn neighbors<V: NodeTrait>(map: &AdjacencyMap<V>, vertex: V) -> BTreeSet<V> {
    map.neighbors(vertex).collect()
}

pub fn are_adjacent<V: NodeTrait>(map: &AdjacencyMap<V>, a: V, b: V) -> bool {
    a != b && map.contains_edge(a, b)
}

pub fn vertex_count<V: NodeTrait>(map: &AdjacencyMap<V>) -> usize {
    map.node_count()
}

/// Undirected edge count (each edge counted once)
pub fn edge_count<V: NodeTrait>(map: &AdjacencyMap<V>) -> usize {
    map.edge_count()
}

/// Sum of neighbor-set sizes over all vertices
pub fn degree_sum<V: NodeTrait>(map: &AdjacencyMap<V>) -> usize {
    map.nodes().map(|v| map.neighbors(v).count()).sum()
}

/// Every neighbor relation is mirrored and no vertex neighbors itself
pub fn is_symmetric<V: NodeTrait>(map: &AdjacencyMap<V>) -> bool {
    map.nodes().all(|v| {
        map.neighbors(v)
            .all(|n| n != v && map.neighbors(n).any(|back| back == v))
    })
}
