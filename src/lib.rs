pub mod config;
pub mod generator;
pub mod linking;
pub mod placement;
pub mod plane;
pub mod repair;
pub mod rng;
pub mod store;
pub mod strata;
pub mod web;
pub mod wiring;

pub use config::Scenario;
pub use generator::{generate, generate_seeded, GenerationError};
pub use plane::{Cluster, Edge, EdgeId, Node, NodeId, Plane};
pub use store::{PlaneRecord, PlaneStore};
