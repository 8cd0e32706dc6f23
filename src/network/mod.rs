//! The atom transition network.
//!
//! One undirected petgraph graph holds every atom of every registered
//! compound plus per-reaction hydrogen pools. At most one edge exists per
//! node pair and transition type; repeated contributions are folded into
//! the edge's [`Contributions`].

mod edge;
mod node;

use std::collections::HashMap;

use petgraph::algo::has_path_connecting;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::{EdgeFiltered, EdgeRef};

pub use edge::{AtnEdge, Contributions, Directedness, Direction, TransitionType};
pub use node::{AtnNode, CompoundId, NodeKey, NodeKind, Owner, ReactionId};

type EdgeKey = (NodeIndex, NodeIndex, TransitionType);

#[derive(Debug, Clone, Default)]
pub struct Network {
    graph: UnGraph<AtnNode, AtnEdge>,
    nodes: HashMap<NodeKey, NodeIndex>,
    edges: HashMap<EdgeKey, EdgeIndex>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &UnGraph<AtnNode, AtnEdge> {
        &self.graph
    }

    pub fn node(&self, idx: NodeIndex) -> &AtnNode {
        &self.graph[idx]
    }

    pub fn edge(&self, idx: EdgeIndex) -> &AtnEdge {
        &self.graph[idx]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_index(&self, key: NodeKey) -> Option<NodeIndex> {
        self.nodes.get(&key).copied()
    }

    /// Inserts a node, or returns the existing one with the same key.
    pub fn add_node(&mut self, node: AtnNode) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&node.key) {
            return idx;
        }
        let key = node.key;
        let idx = self.graph.add_node(node);
        self.nodes.insert(key, idx);
        idx
    }

    pub fn find_edge(&self, a: NodeIndex, b: NodeIndex, transition: TransitionType) -> Option<EdgeIndex> {
        self.edges.get(&edge_key(a, b, transition)).copied()
    }

    /// Returns the `transition` edge between `a` and `b`, creating it with
    /// `make` if absent. A new edge is stored as `(a, b)`. Self-loops are
    /// refused.
    pub fn ensure_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        transition: TransitionType,
        make: impl FnOnce() -> AtnEdge,
    ) -> Option<EdgeIndex> {
        if a == b {
            return None;
        }
        let key = edge_key(a, b, transition);
        if let Some(&idx) = self.edges.get(&key) {
            return Some(idx);
        }
        let idx = self.graph.add_edge(a, b, make());
        self.edges.insert(key, idx);
        Some(idx)
    }

    /// Direction of travel `from -> to` relative to the edge's stored
    /// endpoints.
    pub fn direction(&self, edge: EdgeIndex, from: NodeIndex) -> Direction {
        match self.graph.edge_endpoints(edge) {
            Some((source, _)) if source == from => Direction::Forward,
            _ => Direction::Backward,
        }
    }

    /// Records that `reaction` moves atoms `from -> to` along `edge`. A
    /// directed edge that gains its second direction becomes bidirected.
    pub fn record(&mut self, edge: EdgeIndex, from: NodeIndex, reaction: ReactionId) {
        let direction = self.direction(edge, from);
        let weight = &mut self.graph[edge];
        weight.contributions.add(direction, reaction);
        if weight.directedness == Directedness::Directed && weight.contributions.key_count() > 1 {
            weight.directedness = Directedness::Bidirected;
        }
    }

    /// Whether `from` reaches `to` using only edges of one transition type.
    pub fn has_path(&self, from: NodeIndex, to: NodeIndex, transition: TransitionType) -> bool {
        if from == to {
            return true;
        }
        let filtered = EdgeFiltered::from_fn(&self.graph, |e| e.weight().transition == transition);
        has_path_connecting(&filtered, from, to, None)
    }

    pub fn count_edges(&self, transition: TransitionType) -> usize {
        self.graph
            .edge_references()
            .filter(|e| e.weight().transition == transition)
            .count()
    }

    /// Resolves the directedness of reaction and hydrogen-reaction edges:
    /// one recorded direction means directed, two mean bidirected.
    pub fn resolve_directedness(&mut self) {
        for edge in self.graph.edge_weights_mut() {
            if !edge.transition.resolves_from_contributions() {
                continue;
            }
            edge.directedness = match edge.contributions.key_count() {
                1 => Directedness::Directed,
                _ => Directedness::Bidirected,
            };
        }
    }
}

fn edge_key(a: NodeIndex, b: NodeIndex, transition: TransitionType) -> EdgeKey {
    (a.min(b), a.max(b), transition)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::atom::Atom;
    use crate::element::Element;

    fn atom_node(compound: usize, index: usize, element: Element) -> AtnNode {
        AtnNode::atom(
            NodeKey::Atom {
                compound: CompoundId(compound),
                index,
            },
            Atom::new(element),
            Owner {
                id: CompoundId(compound),
                name: Arc::from(format!("c{compound}")),
            },
        )
    }

    #[test]
    fn nodes_are_keyed() {
        let mut net = Network::new();
        let a = net.add_node(atom_node(0, 0, Element::C));
        let again = net.add_node(atom_node(0, 0, Element::C));
        assert_eq!(a, again);
        assert_eq!(net.node_count(), 1);
        assert_eq!(
            net.node_index(NodeKey::Atom {
                compound: CompoundId(0),
                index: 0
            }),
            Some(a)
        );
    }

    #[test]
    fn one_edge_per_pair_and_type() {
        let mut net = Network::new();
        let a = net.add_node(atom_node(0, 0, Element::C));
        let b = net.add_node(atom_node(1, 0, Element::C));
        let e1 = net.ensure_edge(a, b, TransitionType::Reaction, || AtnEdge::new(TransitionType::Reaction));
        let e2 = net.ensure_edge(b, a, TransitionType::Reaction, || AtnEdge::new(TransitionType::Reaction));
        assert_eq!(e1, e2);
        let e3 = net.ensure_edge(a, b, TransitionType::Symmetry, || AtnEdge::new(TransitionType::Symmetry));
        assert_ne!(e1, e3);
        assert_eq!(net.edge_count(), 2);
        assert!(net
            .ensure_edge(a, a, TransitionType::Reaction, || AtnEdge::new(TransitionType::Reaction))
            .is_none());
    }

    #[test]
    fn directions_follow_stored_endpoints() {
        let mut net = Network::new();
        let a = net.add_node(atom_node(0, 0, Element::C));
        let b = net.add_node(atom_node(1, 0, Element::C));
        let e = net
            .ensure_edge(b, a, TransitionType::Reaction, || AtnEdge::new(TransitionType::Reaction))
            .unwrap();
        net.record(e, b, 4);
        net.record(e, a, 9);
        let c = &net.edge(e).contributions;
        assert_eq!(c.get(Direction::Forward), &[4]);
        assert_eq!(c.get(Direction::Backward), &[9]);
    }

    #[test]
    fn typed_reachability() {
        let mut net = Network::new();
        let h: Vec<NodeIndex> = (0..4)
            .map(|i| net.add_node(atom_node(0, i, Element::H)))
            .collect();
        let group = || AtnEdge::new(TransitionType::HydrogenGroup);
        net.ensure_edge(h[0], h[1], TransitionType::HydrogenGroup, group);
        net.ensure_edge(h[1], h[2], TransitionType::HydrogenGroup, group);
        net.ensure_edge(h[2], h[3], TransitionType::Symmetry, || {
            AtnEdge::new(TransitionType::Symmetry)
        });
        assert!(net.has_path(h[0], h[2], TransitionType::HydrogenGroup));
        assert!(!net.has_path(h[0], h[3], TransitionType::HydrogenGroup));
        assert!(net.has_path(h[3], h[3], TransitionType::HydrogenGroup));
    }

    #[test]
    fn directed_edge_used_both_ways_becomes_bidirected() {
        let mut net = Network::new();
        let a = net.add_node(atom_node(0, 0, Element::H));
        let b = net.add_node(atom_node(1, 0, Element::H));
        let e = net
            .ensure_edge(a, b, TransitionType::HydrogenFreedReaction, || AtnEdge {
                directedness: Directedness::Directed,
                ..AtnEdge::new(TransitionType::HydrogenFreedReaction)
            })
            .unwrap();
        net.record(e, a, 2);
        assert_eq!(net.edge(e).directedness, Directedness::Directed);
        net.record(e, b, 2);
        assert_eq!(net.edge(e).directedness, Directedness::Bidirected);

        let group = net
            .ensure_edge(a, b, TransitionType::HydrogenGroup, || {
                AtnEdge::new(TransitionType::HydrogenGroup)
            })
            .unwrap();
        net.record(group, a, 0);
        net.record(group, b, 0);
        assert_eq!(net.edge(group).directedness, Directedness::Undirected);
    }

    #[test]
    fn resolve_directedness_from_contributions() {
        let mut net = Network::new();
        let a = net.add_node(atom_node(0, 0, Element::C));
        let b = net.add_node(atom_node(1, 0, Element::C));
        let c = net.add_node(atom_node(2, 0, Element::C));
        let make = || AtnEdge::new(TransitionType::Reaction);
        let ab = net.ensure_edge(a, b, TransitionType::Reaction, make).unwrap();
        let bc = net.ensure_edge(b, c, TransitionType::Reaction, make).unwrap();
        net.record(ab, a, 0);
        net.record(bc, b, 1);
        net.record(bc, c, 1);
        net.resolve_directedness();
        assert_eq!(net.edge(ab).directedness, Directedness::Directed);
        assert_eq!(net.edge(bc).directedness, Directedness::Bidirected);
    }
}
