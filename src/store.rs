//! File-backed plane persistence: one JSON document per plane label.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plane::{Edge, Node, Plane};

/// On-disk document for one persisted plane. Node and edge ids are stored
/// verbatim and act as the stable primary keys across save/load cycles.
/// Cluster membership is not stored separately; it is fully recoverable from
/// each node's `cluster_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaneRecord {
    pub label: String,
    pub seed: u64,
    pub generated_at: String,
    pub stratum_radii: f64,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl PlaneRecord {
    pub fn max_stratum(&self) -> u32 {
        self.nodes.iter().map(|n| n.stratum_id).max().unwrap_or(0)
    }

    /// Circle count of the stored plane, recovered without regenerating it.
    pub fn num_circles(&self) -> u32 {
        self.max_stratum()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("plane store io error")]
    Io(#[from] std::io::Error),
    #[error("plane document error")]
    Json(#[from] serde_json::Error),
    #[error("no stored plane named '{0}'")]
    UnknownPlane(String),
}

pub struct PlaneStore {
    root: PathBuf,
}

impl PlaneStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn document_path(&self, label: &str) -> PathBuf {
        self.root.join(label).join("plane.json")
    }

    pub fn save(&self, plane: &Plane) -> Result<PathBuf, StoreError> {
        let record = PlaneRecord {
            label: plane.label.clone(),
            seed: plane.seed,
            generated_at: Local::now().format("%Y-%m-%d-%H-%M-%S").to_string(),
            stratum_radii: plane.stratum_radii,
            nodes: plane.nodes.clone(),
            edges: plane.edges.clone(),
        };
        let path = self.document_path(&plane.label);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        info!(
            "stored plane '{}' ({} nodes, {} edges) at {}",
            plane.label,
            record.nodes.len(),
            record.edges.len(),
            path.display()
        );
        Ok(path)
    }

    pub fn load(&self, label: &str) -> Result<PlaneRecord, StoreError> {
        let path = self.document_path(label);
        if !path.exists() {
            return Err(StoreError::UnknownPlane(label.to_string()));
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The contract query that recovers `num_circles` for a stored plane.
    pub fn max_stratum(&self, label: &str) -> Result<u32, StoreError> {
        Ok(self.load(label)?.max_stratum())
    }

    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut labels = Vec::new();
        if !self.root.exists() {
            return Ok(labels);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.path().join("plane.json").exists() {
                if let Ok(name) = entry.file_name().into_string() {
                    labels.push(name);
                }
            }
        }
        labels.sort();
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plane::Cluster;

    fn sample_plane(label: &str) -> Plane {
        let mut plane = Plane::new(label, 3, 2, 2.0);
        let center = plane.push_center(1.0, 0.5, 1, 140);
        let support = plane.push_support(1.1, 0.6, 2, center, 30);
        plane.add_cluster(Cluster {
            center,
            supporting: vec![support],
        });
        plane.connect(center, support);
        plane
    }

    #[test]
    fn save_then_load_preserves_keys_and_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlaneStore::new(dir.path());
        let plane = sample_plane("roundtrip");

        store.save(&plane).unwrap();
        let record = store.load("roundtrip").unwrap();

        assert_eq!(record.label, "roundtrip");
        assert_eq!(record.seed, 3);
        assert_eq!(record.nodes, plane.nodes);
        assert_eq!(record.edges, plane.edges);
    }

    #[test]
    fn max_stratum_recovers_circle_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlaneStore::new(dir.path());
        store.save(&sample_plane("strata")).unwrap();
        assert_eq!(store.max_stratum("strata").unwrap(), 2);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlaneStore::new(dir.path());
        assert!(matches!(
            store.load("missing"),
            Err(StoreError::UnknownPlane(_))
        ));
    }

    #[test]
    fn list_returns_sorted_labels() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlaneStore::new(dir.path());
        store.save(&sample_plane("zeta")).unwrap();
        store.save(&sample_plane("alpha")).unwrap();
        assert_eq!(store.list().unwrap(), vec!["alpha", "zeta"]);
    }
}
