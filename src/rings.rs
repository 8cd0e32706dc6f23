//! Smallest set of smallest rings.
//!
//! Every bond closes at most one candidate: the shortest path between its
//! endpoints that avoids the bond itself. Candidates are taken shortest
//! first while their bond sets stay linearly independent over GF(2), until
//! the cycle rank is reached.

use std::collections::{BTreeMap, VecDeque};

use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// Rings of a molecule, each listed in walk order around the ring.
#[derive(Debug, Clone, Default)]
pub struct RingSet {
    rings: Vec<Vec<NodeIndex>>,
}

impl RingSet {
    pub fn sssr<A, B>(mol: &Mol<A, B>) -> Self {
        let wanted = cycle_rank(mol);
        if wanted == 0 {
            return Self::default();
        }

        let mut candidates: Vec<Vec<NodeIndex>> = mol
            .bonds()
            .filter_map(|bond| shortest_cycle_through(mol, bond))
            .collect();
        candidates.sort_by_key(Vec::len);

        let mut basis = CycleBasis::default();
        let mut rings = Vec::with_capacity(wanted);
        for ring in candidates {
            if rings.len() == wanted {
                break;
            }
            if basis.insert(bond_set(mol, &ring)) {
                rings.push(ring);
            }
        }
        Self { rings }
    }

    pub fn rings(&self) -> &[Vec<NodeIndex>] {
        &self.rings
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// `bonds - atoms + components`: the number of independent rings.
pub fn cycle_rank<A, B>(mol: &Mol<A, B>) -> usize {
    (mol.bond_count() + connected_components(mol.graph())).saturating_sub(mol.atom_count())
}

/// Consecutive atom pairs of a ring, closing pair included.
pub(crate) fn ring_pairs(ring: &[NodeIndex]) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
    ring.iter()
        .copied()
        .zip(ring.iter().copied().cycle().skip(1))
}

fn shortest_cycle_through<A, B>(mol: &Mol<A, B>, bond: EdgeIndex) -> Option<Vec<NodeIndex>> {
    let (start, goal) = mol.bond_endpoints(bond)?;
    let mut parent: Vec<Option<NodeIndex>> = vec![None; mol.atom_count()];
    parent[start.index()] = Some(start);

    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        if current == goal {
            break;
        }
        for edge in mol.bonds_of(current) {
            if edge == bond {
                continue;
            }
            let Some((a, b)) = mol.bond_endpoints(edge) else {
                continue;
            };
            let next = if a == current { b } else { a };
            if parent[next.index()].is_none() {
                parent[next.index()] = Some(current);
                queue.push_back(next);
            }
        }
    }

    // walk back from the goal; the removed bond closes the ring
    let mut ring = vec![goal];
    let mut current = goal;
    while current != start {
        current = parent[current.index()]?;
        ring.push(current);
    }
    Some(ring)
}

fn bond_set<A, B>(mol: &Mol<A, B>, ring: &[NodeIndex]) -> Vec<u64> {
    let mut set = vec![0u64; mol.bond_count().div_ceil(64)];
    for (a, b) in ring_pairs(ring) {
        if let Some(bond) = mol.bond_between(a, b) {
            set[bond.index() / 64] |= 1 << (bond.index() % 64);
        }
    }
    set
}

/// Bond sets reduced over GF(2), keyed by their highest set bit.
#[derive(Default)]
struct CycleBasis {
    rows: BTreeMap<usize, Vec<u64>>,
}

impl CycleBasis {
    /// Adds `set` unless it is a sum of rows already present.
    fn insert(&mut self, mut set: Vec<u64>) -> bool {
        for (&pivot, row) in self.rows.iter().rev() {
            if set[pivot / 64] & (1 << (pivot % 64)) != 0 {
                for (word, bits) in set.iter_mut().zip(row) {
                    *word ^= bits;
                }
            }
        }
        let Some(pivot) = highest_bit(&set) else {
            return false;
        };
        self.rows.insert(pivot, set);
        true
    }
}

fn highest_bit(set: &[u64]) -> Option<usize> {
    set.iter()
        .enumerate()
        .rev()
        .find(|&(_, &word)| word != 0)
        .map(|(i, word)| i * 64 + 63 - word.leading_zeros() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smiles::parse_smiles;

    fn ring_sizes(smiles: &str) -> Vec<usize> {
        let mol = parse_smiles(smiles).unwrap();
        let mut sizes: Vec<usize> = RingSet::sssr(&mol).rings().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        sizes
    }

    #[test]
    fn acyclic_has_no_rings() {
        assert!(ring_sizes("CC(C)(C)C").is_empty());
    }

    #[test]
    fn single_and_fused_rings() {
        assert_eq!(ring_sizes("c1ccccc1"), vec![6]);
        assert_eq!(ring_sizes("c1ccc2ccccc2c1"), vec![6, 6]);
        assert_eq!(ring_sizes("C1CC2CCC1CC2"), vec![6, 6]);
        assert_eq!(ring_sizes("C12C3C1C23"), vec![3, 3, 3]);
    }

    #[test]
    fn rings_are_walkable() {
        let mol = parse_smiles("C1CCC2CC2C1").unwrap();
        let rings = RingSet::sssr(&mol);
        assert_eq!(rings.len(), cycle_rank(&mol));
        for ring in rings.rings() {
            assert!(ring_pairs(ring).all(|(a, b)| mol.bond_between(a, b).is_some()));
        }
    }

    #[test]
    fn disconnected_parts_count_separately() {
        assert_eq!(ring_sizes("C1CC1.C1CCC1"), vec![3, 4]);
    }
}
