//! Atom-mapped SMILES reading and writing.
//!
//! The reader covers the subset of OpenSMILES found in mapped reaction
//! files: organic-subset and bracket atoms, isotopes, charges, hydrogen
//! counts, atom-map classes, branches, ring closures and bond orders.
//! Stereo markers are accepted and discarded.

mod assemble;
pub mod error;
mod tokenizer;
mod writer;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::Mol;
pub use error::SmilesError;
pub use writer::to_smiles;

/// A parsed molecule plus the atom-map class of every atom.
///
/// `classes[i]` belongs to the atom at `NodeIndex::new(i)`; `None` marks an
/// unmapped atom (no class, or class `0`).
#[derive(Debug, Clone, PartialEq)]
pub struct MappedMol {
    pub mol: Mol<Atom, Bond>,
    pub classes: Vec<Option<u32>>,
}

impl MappedMol {
    pub fn class_of(&self, idx: NodeIndex) -> Option<u32> {
        self.classes.get(idx.index()).copied().flatten()
    }

    /// Atoms that carry a class, in atom order.
    pub fn mapped_atoms(&self) -> impl Iterator<Item = (NodeIndex, u32)> + '_ {
        self.classes
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (NodeIndex::new(i), c)))
    }
}

pub fn parse_mapped(s: &str) -> Result<MappedMol, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    assemble::assemble(&tokens)
}

/// Parses a SMILES string, discarding atom-map classes.
pub fn parse_smiles(s: &str) -> Result<Mol<Atom, Bond>, SmilesError> {
    parse_mapped(s).map(|m| m.mol)
}

/// Removes stereo markers (`@`, `/`, `\`) from a mapped reaction line.
pub fn strip_stereo(line: &str) -> String {
    line.chars()
        .filter(|c| !matches!(c, '@' | '/' | '\\'))
        .collect()
}
