//! Reaction records read from the mapped-reaction stream.
//!
//! Each record is a triplet of lines: whitespace-separated metadata with the
//! reversibility flag in field 7, an equation `A + B = C`, and the
//! atom-mapped reaction SMILES `a.b>>c`.

pub mod error;
mod parser;
mod reader;

use std::collections::BTreeSet;
use std::fmt;

pub use error::ReactionParseError;
pub use parser::parse_triplet;
pub use reader::{RawTriplet, TripletReader};

use crate::network::ReactionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Educt,
    Product,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Educt => f.write_str("educt"),
            Side::Product => f.write_str("product"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionMeta {
    /// All whitespace-separated fields of the metadata line.
    pub fields: Vec<String>,
    pub reversible: bool,
    pub source_id: Option<String>,
    pub xref_id: Option<String>,
    /// Enzyme classification codes.
    pub ec_codes: Vec<String>,
}

/// A compound occurrence on one side of a reaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub smiles: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub id: ReactionId,
    pub meta: ReactionMeta,
    pub equation: String,
    /// Mapped reaction SMILES with stereo markers removed.
    pub mapped: String,
    pub educt_names: Vec<String>,
    pub product_names: Vec<String>,
    /// Names paired with SMILES components in order.
    pub educts: Vec<Participant>,
    pub products: Vec<Participant>,
}

impl Reaction {
    pub fn is_reversible(&self) -> bool {
        self.meta.reversible
    }

    /// True when both sides name the same set of compounds, i.e. the
    /// reaction only moves compounds between compartments.
    pub fn is_transport(&self) -> bool {
        let left: BTreeSet<&str> = self.educt_names.iter().map(String::as_str).collect();
        let right: BTreeSet<&str> = self.product_names.iter().map(String::as_str).collect();
        left == right
    }

    pub fn participants(&self, side: Side) -> &[Participant] {
        match side {
            Side::Educt => &self.educts,
            Side::Product => &self.products,
        }
    }

    /// Compound names of one side with their multiplicity, in first-seen
    /// order.
    pub fn stoichiometry(&self, side: Side) -> Vec<(String, usize)> {
        let names = match side {
            Side::Educt => &self.educt_names,
            Side::Product => &self.product_names,
        };
        let mut counts: Vec<(String, usize)> = Vec::new();
        for name in names {
            match counts.iter_mut().find(|(n, _)| n == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name.clone(), 1)),
            }
        }
        counts
    }
}
