//! Hydrogen reconciliation across one reaction.
//!
//! Hydrogens are grouped by the atom-map class of the heavy atom they sit
//! on. Per class, one representative hydrogen of each side is linked by a
//! `HydrogenReaction` edge and the other hydrogens of the class hang off
//! their side's representative through `HydrogenGroup` edges. Hydrogens
//! that cannot be paired are attached to a per-reaction pool node with
//! `HydrogenFreedReaction` edges.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::network::{AtnEdge, AtnNode, Directedness, Network, ReactionId, TransitionType};
use crate::registry::Compound;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HydrogenClass {
    /// The hydrogen's heavy neighbour carries no class in this reaction.
    Unassigned,
    Mapped(u32),
}

/// Hydrogen nodes of one reaction side, by class, in collection order.
pub type HydrogenTable = BTreeMap<HydrogenClass, Vec<NodeIndex>>;

/// Appends the hydrogens of one compound occurrence to `table`, keyed by the
/// class that `classes` assigns to their heavy neighbour.
pub fn collect_hydrogens(compound: &Compound, classes: &HashMap<u32, NodeIndex>, table: &mut HydrogenTable) {
    // several classes may land on one node; the lowest wins
    let mut class_of: HashMap<NodeIndex, u32> = HashMap::with_capacity(classes.len());
    for (&class, &node) in classes {
        class_of
            .entry(node)
            .and_modify(|c| *c = (*c).min(class))
            .or_insert(class);
    }

    for (hydrogen, parent) in compound.hydrogens() {
        let key = parent
            .and_then(|p| class_of.get(&p))
            .map_or(HydrogenClass::Unassigned, |&c| HydrogenClass::Mapped(c));
        table.entry(key).or_default().push(hydrogen);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrogenLinks {
    pub freed: usize,
    pub paired: usize,
    pub grouped: usize,
}

/// Links the hydrogens of one reaction.
pub fn map_hydrogens(
    network: &mut Network,
    reaction: ReactionId,
    reversible: bool,
    educts: &HydrogenTable,
    products: &HydrogenTable,
) -> HydrogenLinks {
    let mut links = HydrogenLinks::default();
    let mut pool: Option<NodeIndex> = None;
    let empty = Vec::new();

    let keys: BTreeSet<HydrogenClass> = educts.keys().chain(products.keys()).copied().collect();
    for key in keys {
        let educt_hs = educts.get(&key).unwrap_or(&empty);
        let product_hs = products.get(&key).unwrap_or(&empty);
        let (ce, cp) = (educt_hs.len(), product_hs.len());
        let mapped = matches!(key, HydrogenClass::Mapped(_));

        if !mapped || ce != cp {
            let pool = *pool.get_or_insert_with(|| network.add_node(AtnNode::free_hydrogen(reaction)));
            let moving = ce.abs_diff(cp) as u32;
            let paired = mapped && ce > 0 && cp > 0;

            // only the surplus of the larger side is freed when both sides
            // have hydrogens of a mapped class
            let freed_educts = match (paired, ce > cp) {
                (true, true) => &educt_hs[cp..],
                (true, false) => &educt_hs[..0],
                (false, _) => &educt_hs[..],
            };
            let freed_products = match (paired, cp > ce) {
                (true, true) => &product_hs[ce..],
                (true, false) => &product_hs[..0],
                (false, _) => &product_hs[..],
            };

            for &h in freed_educts {
                links.freed += link_freed(network, h, pool, reaction, reversible, moving);
            }
            for &h in freed_products {
                links.freed += link_freed(network, pool, h, reaction, reversible, moving);
            }
        }

        if !mapped || ce == 0 || cp == 0 {
            continue;
        }

        let rep_educt = educt_hs[0];
        let rep_product = product_hs[0];
        if let Some(edge) = network.ensure_edge(rep_educt, rep_product, TransitionType::HydrogenReaction, || {
            AtnEdge::new(TransitionType::HydrogenReaction)
        }) {
            network.record(edge, rep_educt, reaction);
            if reversible {
                network.record(edge, rep_product, reaction);
            }
            links.paired += 1;
        }

        for (rep, group) in [(rep_educt, &educt_hs[1..]), (rep_product, &product_hs[1..])] {
            for &h in group {
                if network.has_path(rep, h, TransitionType::HydrogenGroup) {
                    continue;
                }
                if network
                    .ensure_edge(rep, h, TransitionType::HydrogenGroup, || {
                        AtnEdge::new(TransitionType::HydrogenGroup)
                    })
                    .is_some()
                {
                    links.grouped += 1;
                }
            }
        }
    }

    debug!(
        reaction,
        freed = links.freed,
        paired = links.paired,
        grouped = links.grouped,
        "hydrogens mapped"
    );
    links
}

fn link_freed(
    network: &mut Network,
    from: NodeIndex,
    to: NodeIndex,
    reaction: ReactionId,
    reversible: bool,
    moving: u32,
) -> usize {
    let directedness = if reversible {
        Directedness::Bidirected
    } else {
        Directedness::Directed
    };
    let Some(edge) = network.ensure_edge(from, to, TransitionType::HydrogenFreedReaction, || AtnEdge {
        directedness,
        moving_atoms: Some(moving),
        ..AtnEdge::new(TransitionType::HydrogenFreedReaction)
    }) else {
        return 0;
    };
    network.record(edge, from, reaction);
    if reversible {
        network.record(edge, to, reaction);
    }
    1
}
