//! Orchestration of a full generation run.

use log::{debug, info};
use thiserror::Error;

use crate::config::{ConfigError, Scenario};
use crate::linking;
use crate::placement::{ClusterPlacer, PlacementError};
use crate::plane::Plane;
use crate::repair::{self, MetaGraph};
use crate::rng::RngManager;
use crate::strata;
use crate::wiring;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Synthesizes a plane from the scenario using its own seed.
pub fn generate(scenario: &Scenario) -> Result<Plane, GenerationError> {
    generate_seeded(scenario, scenario.seed)
}

/// Synthesizes a plane with an explicit seed. Pure: the same scenario and
/// seed always produce the same plane, and the returned value is the only
/// state a run ever had.
pub fn generate_seeded(scenario: &Scenario, seed: u64) -> Result<Plane, GenerationError> {
    scenario.validate()?;

    let mut rng = RngManager::new(seed);
    let mut plane = Plane::new(&scenario.name, seed, scenario.num_circles, scenario.stratum_radii);
    let placer = ClusterPlacer {
        boundary_margin: scenario.boundary_margin,
        max_attempts: scenario.max_placement_attempts,
        min_support: scenario.min_support,
        max_support: scenario.max_support,
    };

    for stratum in strata::plan_strata(scenario.num_circles, scenario.stratum_radii) {
        let count = if stratum.number == 1 {
            scenario.innermost_centers
        } else {
            scenario.centers_per_stratum
        };
        debug!("stratum {}: placing {} population centers", stratum.number, count);
        placer.populate_stratum(&mut plane, stratum, count, &mut rng.stream("placement"))?;
    }

    wiring::wire_cluster_stars(&mut plane);

    let mut meta = MetaGraph::with_vertices(plane.clusters.iter().map(|c| c.cluster_id()));
    linking::link_nearest_clusters(&mut plane, &mut meta);
    repair::repair_connectivity(&mut plane, &mut meta);

    info!(
        "plane '{}' (seed {}): {} nodes, {} edges, {} clusters",
        plane.label,
        seed,
        plane.nodes.len(),
        plane.edges.len(),
        plane.clusters.len()
    );
    Ok(plane)
}
