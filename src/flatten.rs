//! Conversion of the atom transition network into a directed graph.
//!
//! Every undirected network edge becomes one or two directed edges: a
//! directed edge follows its single recorded direction, any other edge is
//! emitted both ways. Each copy carries the reaction ids of its own
//! direction only.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::bond::BondOrder;
use crate::element::Element;
use crate::network::{AtnEdge, CompoundId, Directedness, Direction, Network, NodeKind, TransitionType};

#[derive(Debug, Clone, PartialEq)]
pub struct FlatNode {
    /// Stable node name, `<compound>_<atom>` or `react_<id>_free_H`.
    pub label: String,
    pub element: Element,
    pub charge: Option<i8>,
    pub isotope: Option<u16>,
    pub hcount: Option<u8>,
    pub compound_id: Option<CompoundId>,
    pub compound_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatEdge {
    pub transition: TransitionType,
    pub order: Option<BondOrder>,
    pub compound_id: Option<CompoundId>,
    pub compound_name: Option<String>,
    pub moving_atom: Option<u32>,
    /// Comma-joined ids of the reactions moving atoms along this copy.
    pub reaction_ids: Option<String>,
}

pub type FlatGraph = DiGraph<FlatNode, FlatEdge>;

/// Flattens `network`. Node `i` of the result is node `i` of the network.
pub fn flatten(network: &Network, filter_bonds: bool) -> FlatGraph {
    let graph = network.graph();
    let mut flat = FlatGraph::with_capacity(graph.node_count(), graph.edge_count() * 2);

    for idx in graph.node_indices() {
        let node = &graph[idx];
        let flat_node = match &node.kind {
            NodeKind::CompoundAtom { atom, owner } => FlatNode {
                label: node.key.to_string(),
                element: atom.element,
                charge: Some(atom.formal_charge),
                isotope: (atom.isotope != 0).then_some(atom.isotope),
                hcount: Some(atom.hydrogen_count),
                compound_id: Some(owner.id),
                compound_name: Some(owner.name.to_string()),
            },
            NodeKind::FreeHydrogenPool => FlatNode {
                label: node.key.to_string(),
                element: Element::H,
                charge: None,
                isotope: None,
                hcount: None,
                compound_id: None,
                compound_name: None,
            },
        };
        flat.add_node(flat_node);
    }

    for edge in graph.edge_references() {
        let weight = edge.weight();
        if filter_bonds && weight.transition == TransitionType::ChemicalBond {
            continue;
        }
        let (source, target) = (edge.source(), edge.target());
        let directions: &[Direction] = match weight.directedness {
            Directedness::Directed => match weight.contributions.keys().next() {
                Some(Direction::Backward) => &[Direction::Backward],
                _ => &[Direction::Forward],
            },
            Directedness::Bidirected | Directedness::Undirected => &[Direction::Forward, Direction::Backward],
        };
        for &direction in directions {
            let (from, to) = orient(source, target, direction);
            flat.add_edge(from, to, flat_edge(weight, direction));
        }
    }

    debug!(
        nodes = flat.node_count(),
        edges = flat.edge_count(),
        filter_bonds,
        "network flattened"
    );
    flat
}

fn orient(source: NodeIndex, target: NodeIndex, direction: Direction) -> (NodeIndex, NodeIndex) {
    match direction {
        Direction::Forward => (source, target),
        Direction::Backward => (target, source),
    }
}

fn flat_edge(edge: &AtnEdge, direction: Direction) -> FlatEdge {
    FlatEdge {
        transition: edge.transition,
        order: edge.order,
        compound_id: edge.owner.as_ref().map(|o| o.id),
        compound_name: edge.owner.as_ref().map(|o| o.name.to_string()),
        moving_atom: edge.moving_atoms,
        reaction_ids: edge.contributions.joined(direction),
    }
}

/// Edge count of `graph` per transition type, in [`TransitionType::ALL`]
/// order.
pub fn count_by_transition(graph: &FlatGraph) -> Vec<(TransitionType, usize)> {
    TransitionType::ALL
        .into_iter()
        .map(|t| (t, graph.edge_weights().filter(|e| e.transition == t).count()))
        .collect()
}
