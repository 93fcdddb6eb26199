use std::collections::HashMap;

use planeweaver::{config::Scenario, generator, store::PlaneStore, PlaneRecord};

fn scenario(seed: u64) -> Scenario {
    Scenario {
        name: "persisted".into(),
        description: None,
        seed,
        num_circles: 2,
        innermost_centers: 1,
        centers_per_stratum: 2,
        min_support: 2,
        max_support: 4,
        stratum_radii: 2.0,
        boundary_margin: 0.3,
        max_placement_attempts: 10_000,
    }
}

/// Counts connected components over a stored record's node/edge collections.
fn component_count(record: &PlaneRecord) -> usize {
    let index: HashMap<u64, usize> = record
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.raw(), i))
        .collect();
    let mut adjacency = vec![Vec::new(); record.nodes.len()];
    for edge in &record.edges {
        let a = index[&edge.start.raw()];
        let b = index[&edge.end.raw()];
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    let mut visited = vec![false; record.nodes.len()];
    let mut components = 0;
    for start in 0..record.nodes.len() {
        if visited[start] {
            continue;
        }
        components += 1;
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(current) = stack.pop() {
            for &next in &adjacency[current] {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    components
}

#[test]
fn reload_preserves_ids_coordinates_and_connectivity() {
    let dir = tempfile::tempdir().unwrap();
    let store = PlaneStore::new(dir.path());
    let plane = generator::generate(&scenario(17)).unwrap();

    store.save(&plane).unwrap();
    let record = store.load("persisted").unwrap();

    assert_eq!(record.nodes.len(), plane.nodes.len());
    assert_eq!(record.edges.len(), plane.edges.len());
    for (stored, original) in record.nodes.iter().zip(&plane.nodes) {
        assert_eq!(stored.id, original.id);
        assert!((stored.x - original.x).abs() < 1e-12);
        assert!((stored.y - original.y).abs() < 1e-12);
    }
    for (stored, original) in record.edges.iter().zip(&plane.edges) {
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.start, original.start);
        assert_eq!(stored.end, original.end);
    }
    assert_eq!(component_count(&record), 1);
}

#[test]
fn max_stratum_query_recovers_num_circles() {
    let dir = tempfile::tempdir().unwrap();
    let store = PlaneStore::new(dir.path());
    let plane = generator::generate(&scenario(23)).unwrap();

    store.save(&plane).unwrap();
    assert_eq!(store.max_stratum("persisted").unwrap(), plane.num_circles);
}

#[test]
fn resaving_a_label_overwrites_its_document() {
    let dir = tempfile::tempdir().unwrap();
    let store = PlaneStore::new(dir.path());
    let first = generator::generate(&scenario(1)).unwrap();
    let second = generator::generate(&scenario(2)).unwrap();

    store.save(&first).unwrap();
    store.save(&second).unwrap();

    let record = store.load("persisted").unwrap();
    assert_eq!(record.seed, 2);
    assert_eq!(store.list().unwrap(), vec!["persisted"]);
}
