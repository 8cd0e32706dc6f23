use std::fmt;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// A compound's structure: atoms on the nodes, bonds on the edges.
///
/// Atoms are only ever appended, so a `NodeIndex` handed out by
/// [`Mol::add_atom`] stays valid for the lifetime of the molecule. The
/// registry relies on this when it stores per-atom network handles.
#[derive(Clone)]
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct access for petgraph algorithms.
    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.neighbors(idx).count()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    /// Bond ids incident to `idx`.
    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|edge| edge.id())
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// `(a, b, bond)` for every bond, in the order bonds were added.
    pub fn bond_triples(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &B)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
    }
}

/// Structural equality under identical numbering; no isomorphism check.
impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        self.atom_count() == other.atom_count()
            && self.bond_count() == other.bond_count()
            && self.graph.node_weights().eq(other.graph.node_weights())
            && self.bond_triples().eq(other.bond_triples())
    }
}

impl<A, B> fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mol({} atoms, {} bonds)", self.atom_count(), self.bond_count())
    }
}
