use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::symmetry::SymmetryMode;

/// What to do when a repeat compound does not embed into its registered
/// structure, or the search for it runs out of budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InconsistencyPolicy {
    /// Log the problem, leave that occurrence unmapped and link whatever
    /// atoms of the reaction remain mapped.
    #[default]
    LinkSubset,
    /// Log the problem and drop the whole reaction.
    SkipReaction,
    /// Stop the build.
    Abort,
}

/// Name suffixes that mark high-concentration pool compounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSuffixes {
    pub educt: String,
    pub product: String,
}

impl Default for PoolSuffixes {
    fn default() -> Self {
        Self {
            educt: "_in".to_string(),
            product: "_out".to_string(),
        }
    }
}

impl PoolSuffixes {
    /// Whether `name` carries either suffix.
    pub fn matches(&self, name: &str) -> bool {
        [&self.educt, &self.product]
            .into_iter()
            .any(|s| !s.is_empty() && name.ends_with(s.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub map_hydrogens: bool,
    pub symmetry: SymmetryMode,
    pub on_inconsistency: InconsistencyPolicy,
    /// Candidate pairs a single isomorphism or automorphism search may try.
    pub search_step_limit: u64,
    /// Drop chemical bond edges from the flattened graph.
    pub filter_bonds: bool,
    pub skip_transport: bool,
    pub pool_suffixes: PoolSuffixes,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            map_hydrogens: false,
            symmetry: SymmetryMode::Orbit,
            on_inconsistency: InconsistencyPolicy::LinkSubset,
            search_step_limit: 1_000_000,
            filter_bonds: true,
            skip_transport: true,
            pool_suffixes: PoolSuffixes::default(),
        }
    }
}

impl BuildConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(BuildConfig::from_toml_str("").unwrap(), BuildConfig::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = BuildConfig::from_toml_str(
            r#"
            map_hydrogens = true
            symmetry = "full"
            on_inconsistency = "skip-reaction"

            [pool_suffixes]
            product = "_buffer"
            "#,
        )
        .unwrap();
        assert!(config.map_hydrogens);
        assert_eq!(config.symmetry, SymmetryMode::Full);
        assert_eq!(config.on_inconsistency, InconsistencyPolicy::SkipReaction);
        assert_eq!(config.pool_suffixes.educt, "_in");
        assert_eq!(config.pool_suffixes.product, "_buffer");
        assert_eq!(config.search_step_limit, 1_000_000);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            BuildConfig::from_toml_str("map_hydrogen = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = BuildConfig::load(Path::new("/nonexistent/atn.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/atn.toml"));
    }

    #[test]
    fn pool_suffix_matching() {
        let suffixes = PoolSuffixes::default();
        assert!(suffixes.matches("h2o_in"));
        assert!(suffixes.matches("h2o_out"));
        assert!(!suffixes.matches("h2o"));
        let empty = PoolSuffixes {
            educt: String::new(),
            product: String::new(),
        };
        assert!(!empty.matches("anything"));
    }
}
