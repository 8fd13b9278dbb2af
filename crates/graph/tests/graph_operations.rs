//! Tests for parcel and owner graph construction and queries

use cadastre_graph::{
    adjacency, BuildOptions, ErrorKind, GeoOracle, GraphBuilder, GraphError, Location,
    LocationFilter, OwnerGraph, OwnerId, Parcel, ParcelGraph,
};
use geo::{polygon, MultiPolygon};
use pretty_assertions::assert_eq;

fn unit_square(x: f64, y: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: x, y: y),
        (x: x, y: y + 1.0),
        (x: x + 1.0, y: y + 1.0),
        (x: x + 1.0, y: y),
    ]])
}

fn make_parcel(id: u64, owner: u64, area: f64, x: f64) -> Parcel {
    Parcel::new(id, owner, area)
        .with_length(4.0)
        .with_shape(unit_square(x, 0.0))
        .with_location(Location::new("Trnje", "Zagreb", "Grad Zagreb"))
}

fn parcel_graph(parcels: &[Parcel]) -> ParcelGraph<'_> {
    GraphBuilder::new(GeoOracle::new())
        .build_parcel_graph(parcels)
        .expect("parcel graph")
}

fn owner_graph(parcels: &[Parcel]) -> OwnerGraph<'_> {
    GraphBuilder::new(GeoOracle::new())
        .build_owner_graph(parcels)
        .expect("owner graph")
}

/// 5x5 grid with a handful of owners and uneven areas
fn grid() -> Vec<Parcel> {
    let mut parcels = Vec::new();
    for row in 0..5u64 {
        for col in 0..5u64 {
            let id = row * 5 + col + 1;
            parcels.push(
                Parcel::new(id, (row + col) % 4 + 1, 50.0 + (id * 37 % 11) as f64 * 10.0)
                    .with_shape(unit_square(col as f64, row as f64))
                    .with_location(Location::new(
                        if row < 2 { "Sjever" } else { "Jug" },
                        "Zagreb",
                        "Grad Zagreb",
                    )),
            );
        }
    }
    parcels
}

#[test]
fn test_two_squares_different_owners() {
    let parcels = vec![make_parcel(1, 1, 1.0, 0.0), make_parcel(2, 2, 1.0, 1.0)];
    let graph = owner_graph(&parcels);

    assert!(graph.are_adjacent(&parcels[0], &parcels[1]));
    assert_eq!(graph.parcel_graph().edge_count(), 1);
    assert_eq!(graph.owner_edge_count(), 1);
    assert!(graph.owners_are_adjacent(OwnerId(1), OwnerId(2)).unwrap());
}

#[test]
fn test_two_squares_same_owner() {
    let parcels = vec![make_parcel(1, 1, 1.0, 0.0), make_parcel(2, 1, 1.0, 1.0)];
    let graph = owner_graph(&parcels);

    assert_eq!(graph.parcel_graph().edge_count(), 1);
    assert_eq!(graph.owner_vertex_count(), 0);
    assert_eq!(graph.owner_edge_count(), 0);
}

#[test]
fn test_three_in_a_row_merged_average() {
    let parcels = vec![
        make_parcel(1, 1, 1.0, 0.0),
        make_parcel(2, 1, 1.0, 1.0),
        make_parcel(3, 2, 1.0, 2.0),
    ];
    let graph = owner_graph(&parcels);
    let filter = LocationFilter::new().county("Grad Zagreb");

    let stats = graph.area_statistics(&filter).unwrap();
    assert_eq!(stats.units, 2);
    assert!((stats.total_area - 3.0).abs() < 1e-9);
    assert!((graph.average_area(&filter).unwrap() - 1.5).abs() < 1e-9);

    // Plain variant averages parcels, not owners
    assert!((graph.parcel_graph().average_area(&filter).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_average_area_rejections() {
    let parcels = vec![make_parcel(1, 1, 1.0, 0.0)];
    let graph = owner_graph(&parcels);

    let err = graph.average_area(&LocationFilter::new()).unwrap_err();
    assert!(matches!(err, GraphError::MissingLocationFilter));

    let err = graph
        .average_area(&LocationFilter::new().district("X"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RejectedInput);
    assert!(err.to_string().contains("\"X\""), "{err}");

    let err = graph
        .parcel_graph()
        .average_area(&LocationFilter::new().district("X"))
        .unwrap_err();
    assert!(matches!(err, GraphError::NoMatchingParcels(_)));
}

#[test]
fn test_average_area_is_idempotent() {
    let parcels = grid();
    let graph = owner_graph(&parcels);
    let filter = LocationFilter::new().district("Jug").municipality("Zagreb");

    let first = graph.average_area(&filter).unwrap();
    let second = graph.average_area(&filter).unwrap();
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_empty_input_is_rejected() {
    let builder = GraphBuilder::new(GeoOracle::new());
    let err = builder.build_owner_graph(&[]).unwrap_err();
    assert!(matches!(err, GraphError::EmptyInput));
    assert!(err.is_rejected_input());
}

#[test]
fn test_symmetry_and_no_self_adjacency() {
    let parcels = grid();
    let graph = parcel_graph(&parcels);

    for a in &parcels {
        assert!(!graph.are_adjacent(a, a));
        for b in &parcels {
            assert_eq!(graph.are_adjacent(a, b), graph.are_adjacent(b, a));
        }
    }
    assert!(adjacency::is_symmetric(graph.adjacency()));
}

#[test]
fn test_edge_count_matches_neighbor_sets() {
    let parcels = grid();
    let graph = parcel_graph(&parcels);

    let degree_sum: usize = parcels.iter().map(|p| graph.adjacent_to(p).len()).sum();
    assert_eq!(graph.edge_count() * 2, degree_sum);
    // 5x5 grid: 40 shared edges + 32 corner contacts
    assert_eq!(graph.edge_count(), 72);
    assert_eq!(graph.vertex_count(), 25);
}

#[test]
fn test_owner_graph_never_links_owner_to_itself() {
    let parcels = grid();
    let graph = owner_graph(&parcels);

    for owner in 1..=4 {
        let owner = OwnerId(owner);
        assert!(!graph.owners_are_adjacent(owner, owner).unwrap());
        assert!(!graph.adjacent_owners(owner).unwrap().contains(&owner));
    }
    assert!(adjacency::is_symmetric(graph.owner_adjacency()));
}

#[test]
fn test_build_options_do_not_change_result() {
    let parcels = grid();
    let exhaustive = GraphBuilder::new(GeoOracle::new())
        .with_options(BuildOptions::exhaustive())
        .build_owner_graph(&parcels)
        .unwrap();
    let indexed = owner_graph(&parcels);

    assert_eq!(exhaustive.stats(), indexed.stats());
    for p in &parcels {
        let a: Vec<u64> = exhaustive.adjacent_to(p).iter().map(|n| n.id.0).collect();
        let b: Vec<u64> = indexed.adjacent_to(p).iter().map(|n| n.id.0).collect();
        assert_eq!(a, b);
    }
}

#[test]
fn test_nested_parcel_is_not_adjacent() {
    let outer = Parcel::new(1, 1, 100.0).with_shape(MultiPolygon::new(vec![polygon![
        (x: 0.0, y: 0.0),
        (x: 0.0, y: 10.0),
        (x: 10.0, y: 10.0),
        (x: 10.0, y: 0.0),
    ]]));
    let inner = Parcel::new(2, 2, 1.0).with_shape(unit_square(4.0, 4.0));
    let parcels = vec![outer, inner];
    let graph = owner_graph(&parcels);

    assert!(!graph.are_adjacent(&parcels[0], &parcels[1]));
    assert_eq!(graph.owner_edge_count(), 0);
}

#[test]
fn test_graphs_are_shareable_across_threads() {
    let parcels = grid();
    let graph = owner_graph(&parcels);
    let filter = LocationFilter::new().district("Sjever");
    let expected = graph.average_area(&filter).unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(graph.average_area(&filter).unwrap().to_bits(), expected.to_bits());
                assert_eq!(graph.parcel_graph().edge_count(), 72);
            });
        }
    });
}
