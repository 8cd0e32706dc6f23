use std::fmt;
use std::sync::Arc;

use crate::atom::Atom;
use crate::element::Element;

/// Ordinal of a reaction triplet in the input stream.
pub type ReactionId = usize;

/// Dense compound identifier, assigned in first-seen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompoundId(pub usize);

impl fmt::Display for CompoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Globally unique node identity. Atom keys are namespaced by their compound
/// so indices of different compounds never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKey {
    Atom { compound: CompoundId, index: usize },
    /// Per-reaction pool that absorbs or releases unbalanced hydrogens.
    FreeHydrogen { reaction: ReactionId },
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Atom { compound, index } => write!(f, "{compound}_{index}"),
            NodeKey::FreeHydrogen { reaction } => write!(f, "react_{reaction}_free_H"),
        }
    }
}

/// The compound an atom or bond belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner {
    pub id: CompoundId,
    pub name: Arc<str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    CompoundAtom { atom: Atom, owner: Owner },
    FreeHydrogenPool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtnNode {
    pub key: NodeKey,
    pub kind: NodeKind,
}

impl AtnNode {
    pub fn atom(key: NodeKey, atom: Atom, owner: Owner) -> Self {
        Self {
            key,
            kind: NodeKind::CompoundAtom { atom, owner },
        }
    }

    pub fn free_hydrogen(reaction: ReactionId) -> Self {
        Self {
            key: NodeKey::FreeHydrogen { reaction },
            kind: NodeKind::FreeHydrogenPool,
        }
    }

    pub fn element(&self) -> Element {
        match &self.kind {
            NodeKind::CompoundAtom { atom, .. } => atom.element,
            NodeKind::FreeHydrogenPool => Element::H,
        }
    }

    pub fn owner(&self) -> Option<&Owner> {
        match &self.kind {
            NodeKind::CompoundAtom { owner, .. } => Some(owner),
            NodeKind::FreeHydrogenPool => None,
        }
    }

    pub fn compound_atom(&self) -> Option<&Atom> {
        match &self.kind {
            NodeKind::CompoundAtom { atom, .. } => Some(atom),
            NodeKind::FreeHydrogenPool => None,
        }
    }

    pub fn is_hydrogen(&self) -> bool {
        self.element().is_hydrogen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_labels() {
        let atom = NodeKey::Atom {
            compound: CompoundId(3),
            index: 12,
        };
        assert_eq!(atom.to_string(), "3_12");
        assert_eq!(
            NodeKey::FreeHydrogen { reaction: 7 }.to_string(),
            "react_7_free_H"
        );
    }

    #[test]
    fn pool_node_is_hydrogen() {
        let node = AtnNode::free_hydrogen(2);
        assert_eq!(node.element(), Element::H);
        assert!(node.owner().is_none());
    }
}
