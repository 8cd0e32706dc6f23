//! Error types shared across the network build.
//!
//! SMILES and reaction-record errors live next to their parsers
//! ([`SmilesError`], [`ReactionParseError`](crate::reaction::ReactionParseError));
//! this module holds the errors of the search, registry, build and export
//! stages.

use std::path::PathBuf;

use thiserror::Error;

use crate::smiles::SmilesError;

/// Failure of a bounded graph search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The search tried more candidate pairs than its step budget allows.
    #[error("search exceeded its budget of {limit} steps")]
    BudgetExhausted { limit: u64 },
}

/// Errors raised while registering a reaction participant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The participant's SMILES could not be parsed.
    #[error("cannot parse SMILES of compound '{name}': {source}")]
    Smiles {
        name: String,
        #[source]
        source: SmilesError,
    },

    /// A compound name was seen before with a structure that does not embed
    /// into this occurrence.
    #[error("compound naming inconsistency: '{name}' does not match {smiles}")]
    NamingInconsistency { name: String, smiles: String },

    /// Matching or symmetry search for the compound ran out of budget.
    #[error("structure search for compound '{name}' gave up: {source}")]
    SearchExhausted {
        name: String,
        #[source]
        source: SearchError,
    },
}

impl RegistryError {
    /// Whether the build may continue under an inconsistency policy.
    /// SMILES failures are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RegistryError::Smiles { .. })
    }

    pub fn compound_name(&self) -> &str {
        match self {
            RegistryError::Smiles { name, .. }
            | RegistryError::NamingInconsistency { name, .. }
            | RegistryError::SearchExhausted { name, .. } => name,
        }
    }
}

/// Errors that abort a network build.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Reading the reaction stream failed.
    #[error("failed to read reactions: {0}")]
    Io(#[from] std::io::Error),

    /// Registering a participant of reaction `reaction` failed fatally.
    #[error("reaction {reaction}: {source}")]
    Registry {
        reaction: usize,
        #[source]
        source: RegistryError,
    },
}

/// Errors raised when reading or writing GML.
#[derive(Debug, Error)]
pub enum GmlError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not well-formed GML.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A required key is missing from a node or edge block.
    #[error("{block} block is missing '{key}'")]
    MissingKey { block: &'static str, key: &'static str },

    /// An edge refers to a node id that was never declared.
    #[error("edge refers to unknown node {id}")]
    UnknownNode { id: i64 },

    /// A node id was declared twice.
    #[error("duplicate node id {id}")]
    DuplicateNode { id: i64 },

    /// An attribute has a value that cannot be interpreted.
    #[error("invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
}

/// Errors raised while loading a build configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smiles_errors_are_fatal() {
        let err = RegistryError::Smiles {
            name: "ATP".into(),
            source: SmilesError::EmptyInput,
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.compound_name(), "ATP");
    }

    #[test]
    fn inconsistencies_are_recoverable() {
        let naming = RegistryError::NamingInconsistency {
            name: "ATP".into(),
            smiles: "C".into(),
        };
        let budget = RegistryError::SearchExhausted {
            name: "ATP".into(),
            source: SearchError::BudgetExhausted { limit: 5 },
        };
        assert!(naming.is_recoverable());
        assert!(budget.is_recoverable());
    }

    #[test]
    fn messages_name_the_compound() {
        let err = RegistryError::NamingInconsistency {
            name: "glc".into(),
            smiles: "OCC".into(),
        };
        assert_eq!(
            err.to_string(),
            "compound naming inconsistency: 'glc' does not match OCC"
        );
    }
}
