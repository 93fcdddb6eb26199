use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

fn default_num_circles() -> u32 {
    4
}

fn default_innermost_centers() -> u32 {
    2
}

fn default_centers_per_stratum() -> u32 {
    3
}

fn default_min_support() -> u32 {
    3
}

fn default_max_support() -> u32 {
    10
}

fn default_stratum_radii() -> f64 {
    2.0
}

fn default_boundary_margin() -> f64 {
    0.3
}

fn default_max_placement_attempts() -> u32 {
    10_000
}

/// One plane-generation scenario. The `name` doubles as the plane label under
/// which the result is persisted; it has no effect on generation itself.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_num_circles")]
    pub num_circles: u32,
    /// Population centers in the innermost stratum. Kept separate from
    /// `centers_per_stratum` so the middle of the plane stays sparse.
    #[serde(default = "default_innermost_centers")]
    pub innermost_centers: u32,
    #[serde(default = "default_centers_per_stratum")]
    pub centers_per_stratum: u32,
    #[serde(default = "default_min_support")]
    pub min_support: u32,
    #[serde(default = "default_max_support")]
    pub max_support: u32,
    /// Radial width of each stratum, in plane units.
    #[serde(default = "default_stratum_radii")]
    pub stratum_radii: f64,
    /// Centers are kept this far away from both stratum boundaries.
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin: f64,
    #[serde(default = "default_max_placement_attempts")]
    pub max_placement_attempts: u32,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read scenario file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid scenario: {0}")]
    Validation(String),
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario: Scenario =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Fails fast on parameters that would corrupt a run, before any sampling
    /// happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_circles < 1 {
            return Err(ConfigError::Validation(
                "num_circles must be at least 1".into(),
            ));
        }
        if self.min_support > self.max_support {
            return Err(ConfigError::Validation(format!(
                "min_support ({}) exceeds max_support ({})",
                self.min_support, self.max_support
            )));
        }
        if self.stratum_radii <= 0.0 {
            return Err(ConfigError::Validation(
                "stratum_radii must be positive".into(),
            ));
        }
        if self.boundary_margin < 0.0 {
            return Err(ConfigError::Validation(
                "boundary_margin must not be negative".into(),
            ));
        }
        if self.boundary_margin * 2.0 >= self.stratum_radii {
            return Err(ConfigError::Validation(format!(
                "boundary_margin ({}) leaves no room to place centers within a stratum of width {}",
                self.boundary_margin, self.stratum_radii
            )));
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::Validation(
                "max_placement_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        "name: test_plane\nseed: 11\n"
    }

    #[test]
    fn defaults_fill_in_unspecified_fields() {
        let scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        assert_eq!(scenario.name, "test_plane");
        assert_eq!(scenario.seed, 11);
        assert_eq!(scenario.num_circles, 4);
        assert_eq!(scenario.innermost_centers, 2);
        assert_eq!(scenario.centers_per_stratum, 3);
        assert_eq!(scenario.min_support, 3);
        assert_eq!(scenario.max_support, 10);
        assert!((scenario.stratum_radii - 2.0).abs() < f64::EPSILON);
        scenario.validate().unwrap();
    }

    #[test]
    fn rejects_zero_circles() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.num_circles = 0;
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_inverted_support_range() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.min_support = 5;
        scenario.max_support = 2;
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_margin_wider_than_stratum() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.boundary_margin = 1.0;
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn rejects_zero_attempt_cap() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.max_placement_attempts = 0;
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::Validation(_))
        ));
    }
}
