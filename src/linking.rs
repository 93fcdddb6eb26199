//! Inter-cluster linking: each cluster reaches out to its nearest neighbor.

use log::debug;

use crate::plane::{NodeId, Plane};
use crate::repair::MetaGraph;

/// For every cluster, finds the closest pair `(u, v)` with `u` among the
/// cluster's own nodes (supports first, center last) and `v` among the
/// supporting nodes of every other cluster, then connects it. Other clusters'
/// population centers are deliberately not candidates for the far endpoint.
/// Each cluster gains exactly one outgoing link; incoming links are whatever
/// the other clusters happen to pick. Skips clusters with nothing to link to.
pub(crate) fn link_nearest_clusters(plane: &mut Plane, meta: &mut MetaGraph) {
    let mut links: Vec<(NodeId, NodeId)> = Vec::with_capacity(plane.clusters.len());
    for cluster in &plane.clusters {
        let local: Vec<NodeId> = cluster.node_ids().collect();
        let mut best: Option<(NodeId, NodeId, f64)> = None;
        for other in &plane.clusters {
            if other.center == cluster.center {
                continue;
            }
            for &far in &other.supporting {
                for &near in &local {
                    let distance = plane.node(near).distance_to(plane.node(far));
                    if best.map_or(true, |(_, _, shortest)| distance < shortest) {
                        best = Some((near, far, distance));
                    }
                }
            }
        }
        match best {
            Some((near, far, _)) => links.push((near, far)),
            None => debug!(
                "cluster {} has no linkable neighbor, leaving it to repair",
                cluster.cluster_id().raw()
            ),
        }
    }

    for (near, far) in links {
        plane.connect(near, far);
        meta.add_link(plane.node(near).cluster_id, plane.node(far).cluster_id);
    }
}
