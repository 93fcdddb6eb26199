//! Cluster placement: population centers under a per-stratum separation
//! constraint, then supporting nodes scattered around each center.

use std::f64::consts::PI;

use rand::Rng;
use thiserror::Error;

use crate::plane::{Cluster, NodeId, Plane};
use crate::rng::StreamRng;
use crate::strata::Stratum;

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("no valid center position found in stratum {stratum} after {attempts} attempts")]
    Exhausted { stratum: u32, attempts: u32 },
}

pub(crate) struct ClusterPlacer {
    pub boundary_margin: f64,
    pub max_attempts: u32,
    pub min_support: u32,
    pub max_support: u32,
}

impl ClusterPlacer {
    /// Places `count` population centers in `stratum` and scatters each
    /// cluster's supporting nodes. Appends one cluster per accepted center.
    pub(crate) fn populate_stratum(
        &self,
        plane: &mut Plane,
        stratum: Stratum,
        count: u32,
        rng: &mut StreamRng<'_>,
    ) -> Result<(), PlacementError> {
        // The origin acts as an always-present previous point, keeping the
        // innermost centers off the exact middle of the plane.
        let mut accepted: Vec<(f64, f64)> = vec![(0.0, 0.0)];
        for _ in 0..count {
            let (radius, angle) = self.sample_center(stratum, &accepted, rng)?;
            let (x, y) = (radius * angle.cos(), radius * angle.sin());
            accepted.push((x, y));

            let center_yield = rng.gen_range(100..200u32);
            let center = plane.push_center(x, y, stratum.number, center_yield);
            let supporting =
                self.scatter_support(plane, stratum.number, center, radius, angle, center_yield, rng);
            plane.add_cluster(Cluster { center, supporting });
        }
        Ok(())
    }

    /// Rejection-samples a polar position until it clears every previously
    /// accepted point of this stratum, or the attempt cap runs out.
    fn sample_center(
        &self,
        stratum: Stratum,
        accepted: &[(f64, f64)],
        rng: &mut StreamRng<'_>,
    ) -> Result<(f64, f64), PlacementError> {
        let lo = stratum.inner + self.boundary_margin;
        let hi = stratum.outer - self.boundary_margin;
        let min_separation = stratum.min_center_separation();
        for _ in 0..self.max_attempts {
            let radius = rng.gen_range(lo..hi);
            let angle = rng.gen_range(0.0..2.0 * PI);
            let (x, y) = (radius * angle.cos(), radius * angle.sin());
            let clear = accepted
                .iter()
                .all(|&(px, py)| ((x - px).powi(2) + (y - py).powi(2)).sqrt() >= min_separation);
            if clear {
                return Ok((radius, angle));
            }
        }
        Err(PlacementError::Exhausted {
            stratum: stratum.number,
            attempts: self.max_attempts,
        })
    }

    /// Scatters supporting nodes by perturbing the center's own polar
    /// coordinates. Yields are a fraction of the center's yield.
    fn scatter_support(
        &self,
        plane: &mut Plane,
        stratum_number: u32,
        cluster_id: NodeId,
        radius: f64,
        angle: f64,
        center_yield: u32,
        rng: &mut StreamRng<'_>,
    ) -> Vec<NodeId> {
        let count = rng.gen_range(self.min_support..=self.max_support);
        let yield_lo = (center_yield as f64 * 0.1) as u32;
        let yield_hi = (center_yield as f64 * 0.6) as u32;
        let mut supporting = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let r = rng.gen_range(radius - 0.1..radius + 0.1);
            let a = rng.gen_range(angle - PI / 8.0..angle + PI / 8.0);
            let resource_yield = rng.gen_range(yield_lo..yield_hi);
            supporting.push(plane.push_support(
                r * a.cos(),
                r * a.sin(),
                stratum_number,
                cluster_id,
                resource_yield,
            ));
        }
        supporting
    }
}
