use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::config::PoolSuffixes;
use crate::network::{AtnEdge, Network, ReactionId, TransitionType};

/// Creates or extends a `Reaction` edge for every atom-map class mapped on
/// both sides. Returns the number of edges touched.
///
/// Reverse contributions are only recorded for reversible reactions whose
/// endpoints both belong to non-pool compounds.
pub fn link_reaction(
    network: &mut Network,
    reaction: ReactionId,
    reversible: bool,
    educts: &HashMap<u32, NodeIndex>,
    products: &HashMap<u32, NodeIndex>,
    pools: &PoolSuffixes,
) -> usize {
    let mut classes: Vec<u32> = educts
        .keys()
        .filter(|c| products.contains_key(c))
        .copied()
        .collect();
    classes.sort_unstable();

    let mut linked = 0;
    for class in classes {
        let (n1, n2) = (educts[&class], products[&class]);
        let (Some(o1), Some(o2)) = (network.node(n1).owner(), network.node(n2).owner()) else {
            continue;
        };
        if o1.id == o2.id {
            continue;
        }
        let both_ways = reversible && !pools.matches(&o1.name) && !pools.matches(&o2.name);

        let Some(edge) = network.ensure_edge(n1, n2, TransitionType::Reaction, || {
            AtnEdge::new(TransitionType::Reaction)
        }) else {
            continue;
        };
        network.record(edge, n1, reaction);
        if both_ways {
            network.record(edge, n2, reaction);
        }
        linked += 1;
    }

    debug!(reaction, linked, "reaction linked");
    linked
}
