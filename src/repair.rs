//! Connectivity repair over the cluster meta-graph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use log::debug;

use crate::plane::{NodeId, Plane};

/// Undirected graph whose vertices are cluster ids and whose edges are the
/// inter-cluster links recorded so far. Backed by ordered maps so component
/// enumeration is deterministic.
pub(crate) struct MetaGraph {
    adjacency: BTreeMap<NodeId, BTreeSet<NodeId>>,
}

impl MetaGraph {
    pub(crate) fn with_vertices(vertices: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            adjacency: vertices.into_iter().map(|id| (id, BTreeSet::new())).collect(),
        }
    }

    pub(crate) fn add_link(&mut self, a: NodeId, b: NodeId) {
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
    }

    /// Connected components, each sorted ascending, ordered by their lowest
    /// cluster id.
    pub(crate) fn components(&self) -> Vec<Vec<NodeId>> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::new();
        for &start in self.adjacency.keys() {
            if seen.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            seen.insert(start);
            while let Some(current) = queue.pop_front() {
                component.push(current);
                if let Some(neighbors) = self.adjacency.get(&current) {
                    for &next in neighbors {
                        if seen.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }
            component.sort();
            components.push(component);
        }
        components
    }
}

/// Adds edges until the meta-graph is a single component. The anchor is
/// always the component holding the lowest cluster id; each step scans every
/// other component for the globally nearest node pair to the anchor and
/// repairs that pair. Each step merges at least two components, so the loop
/// runs at most `#clusters - 1` times.
pub(crate) fn repair_connectivity(plane: &mut Plane, meta: &mut MetaGraph) {
    loop {
        let components = meta.components();
        if components.len() <= 1 {
            break;
        }
        debug!(
            "meta-graph has {} components, repairing nearest gap",
            components.len()
        );

        let anchor_nodes = component_nodes(plane, &components[0]);
        let mut best: Option<(NodeId, NodeId, f64)> = None;
        for other in &components[1..] {
            for v in component_nodes(plane, other) {
                for &u in &anchor_nodes {
                    let distance = plane.node(u).distance_to(plane.node(v));
                    if best.map_or(true, |(_, _, shortest)| distance < shortest) {
                        best = Some((u, v, distance));
                    }
                }
            }
        }

        // Every cluster holds at least its center, so two components always
        // expose a candidate pair.
        let Some((u, v, _)) = best else { break };
        plane.connect(u, v);
        meta.add_link(plane.node(u).cluster_id, plane.node(v).cluster_id);
    }
}

fn component_nodes(plane: &Plane, component: &[NodeId]) -> Vec<NodeId> {
    component
        .iter()
        .filter_map(|&cluster_id| plane.cluster(cluster_id))
        .flat_map(|cluster| cluster.node_ids())
        .collect()
}
