//! Configuration loading and typed config structures for Wayfarer.
//!
//! The canonical configuration lives in `wayfarer-config.yaml` at the
//! project root. Every section is optional; a missing section (or an empty
//! file) yields the defaults documented on each field.

use std::path::Path;

use serde::Deserialize;
use wayfarer_types::{LocationRef, TraversalContext};
use wayfarer_world::{DwellPolicy, PathfinderOptions};

/// Environment variable that overrides the configuration file path.
pub const CONFIG_PATH_ENV: &str = "WAYFARER_CONFIG";

/// Configuration file name used when [`CONFIG_PATH_ENV`] is not set.
pub const DEFAULT_CONFIG_FILE: &str = "wayfarer-config.yaml";

/// Why a [`WayfarerConfig`] could not be produced.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The Wayfarer config file exists but could not be read.
    #[error("cannot read wayfarer config: {source}")]
    Io {
        /// Cause reported by the filesystem.
        #[from]
        source: std::io::Error,
    },

    /// The file is not YAML, or a section does not match its schema
    /// (e.g. a query location missing `region` or `local`).
    #[error("invalid wayfarer config: {source}")]
    Yaml {
        /// Cause reported by the YAML deserializer.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `wayfarer-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WayfarerConfig {
    /// World-level settings.
    #[serde(default)]
    pub world: WorldConfig,

    /// Route-cost settings.
    #[serde(default)]
    pub pathfinding: PathfindingConfig,

    /// Validation pass settings.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Route queries answered at startup.
    #[serde(default)]
    pub queries: Vec<QueryConfig>,
}

impl WayfarerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string. An empty string yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Path to load: `$WAYFARER_CONFIG` if set, else [`DEFAULT_CONFIG_FILE`].
    pub fn default_path() -> std::path::PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| std::path::PathBuf::from(DEFAULT_CONFIG_FILE), std::path::PathBuf::from)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable world name.
    #[serde(default = "default_world_name")]
    pub name: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
        }
    }
}

/// Route-cost configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PathfindingConfig {
    /// Charge the goal's dwell time on arrival (default: only intermediate
    /// nodes are charged).
    #[serde(default)]
    pub dwell_at_goal: bool,
}

impl PathfindingConfig {
    /// Path finder options matching this configuration.
    pub const fn options(&self) -> PathfinderOptions {
        PathfinderOptions {
            dwell_policy: if self.dwell_at_goal {
                DwellPolicy::Always
            } else {
                DwellPolicy::PassThrough
            },
        }
    }
}

/// Validation pass configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ValidationConfig {
    /// List every unused location id in id audits.
    #[serde(default)]
    pub check_empty_slots: bool,

    /// Drop dangling region edges after every bulk edit.
    #[serde(default = "default_true")]
    pub clean_region_edges_after_edit: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_empty_slots: false,
            clean_region_edges_after_edit: default_true(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// One route query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryConfig {
    /// Start location.
    pub from: LocationRef,
    /// Goal location.
    pub to: LocationRef,
    /// Capability tags the traveler carries.
    #[serde(default)]
    pub tags: TraversalContext,
}

fn default_world_name() -> String {
    "Wayfarer".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WayfarerConfig::default();
        assert_eq!(config.world.name, "Wayfarer");
        assert!(!config.pathfinding.dwell_at_goal);
        assert!(!config.validation.check_empty_slots);
        assert!(config.validation.clean_region_edges_after_edit);
        assert_eq!(config.logging.level, "info");
        assert!(config.queries.is_empty());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test World"

pathfinding:
  dwell_at_goal: true

validation:
  check_empty_slots: true
  clean_region_edges_after_edit: false

logging:
  level: "debug"

queries:
  - from: { region: 1, local: 0 }
    to: { region: 3, local: 1 }
  - from: { region: 3, local: 2 }
    to: { region: 3, local: 3 }
    tags:
      vault_key: 1
"#;

        let config = WayfarerConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.name, "Test World");
        assert!(config.pathfinding.dwell_at_goal);
        assert_eq!(config.pathfinding.options().dwell_policy, DwellPolicy::Always);
        assert!(config.validation.check_empty_slots);
        assert!(!config.validation.clean_region_edges_after_edit);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.queries.len(), 2);
        assert_eq!(
            config.queries.first().map(|q| q.to),
            Some(LocationRef::of(3, 1))
        );
        assert!(config.queries.first().is_some_and(|q| q.tags.is_empty()));
        assert_eq!(config.queries.get(1).map(|q| q.tags.value("vault_key")), Some(1));
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "pathfinding:\n  dwell_at_goal: false\n";
        let config = WayfarerConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(
            config.pathfinding.options().dwell_policy,
            DwellPolicy::PassThrough
        );
        // Everything else uses defaults
        assert_eq!(config.world.name, "Wayfarer");
        assert!(config.validation.clean_region_edges_after_edit);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = WayfarerConfig::parse("");
        assert!(config.is_ok_and(|c| c == WayfarerConfig::default()));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let config = WayfarerConfig::parse("queries: [ { from: 3 } ]");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            let config = WayfarerConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
