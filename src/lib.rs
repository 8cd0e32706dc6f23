pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod build;
pub mod config;
pub mod element;
pub mod error;
pub mod flatten;
pub mod hydrogen;
pub mod io;
pub mod mol;
pub mod network;
pub mod reaction;
pub mod registry;
pub mod rings;
pub mod smiles;
pub mod substruct;
pub mod symmetry;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use build::{build, BuildReport, BuiltNetwork, NetworkBuilder, ReactionOutcome};
pub use config::{BuildConfig, InconsistencyPolicy, PoolSuffixes};
pub use element::Element;
pub use error::{BuildError, ConfigError, GmlError, RegistryError, SearchError};
pub use flatten::{flatten, FlatEdge, FlatGraph, FlatNode};
pub use io::PoolSet;
pub use mol::Mol;
pub use network::{Directedness, Direction, Network, TransitionType};
pub use reaction::{Reaction, ReactionParseError};
pub use registry::CompoundRegistry;
pub use smiles::{parse_mapped, parse_smiles, MappedMol, SmilesError};
pub use symmetry::SymmetryMode;
