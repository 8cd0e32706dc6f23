//! Budgeted subgraph monomorphism search.
//!
//! A match maps every query atom to a distinct target atom such that atoms
//! satisfy `atom_match` and every query bond lands on a target bond that
//! satisfies `bond_match`. Extra target atoms and bonds are allowed.

use petgraph::graph::NodeIndex;
use tracing::{instrument, trace};

use crate::error::SearchError;
use crate::mol::Mol;

/// `(query atom, target atom)` pairs, ordered by query atom index.
pub type AtomMapping = Vec<(NodeIndex, NodeIndex)>;

/// Finds the first embedding of `query` in `target`, or `None` if there is
/// none. Fails once more than `step_limit` candidate pairs have been tried.
#[instrument(skip_all, fields(query_atoms = query.atom_count(), target_atoms = target.atom_count()))]
pub fn find_monomorphism<A1, B1, A2, B2>(
    target: &Mol<A1, B1>,
    query: &Mol<A2, B2>,
    atom_match: impl Fn(&A1, &A2) -> bool,
    bond_match: impl Fn(&B1, &B2) -> bool,
    step_limit: u64,
) -> Result<Option<AtomMapping>, SearchError> {
    let mut vf2 = Vf2::new(target, query, atom_match, bond_match, step_limit);
    let mut results = Vec::new();
    vf2.recurse(0, &mut results, true)?;
    trace!(steps = vf2.steps, found = !results.is_empty(), "monomorphism search done");
    Ok(results.into_iter().next())
}

/// Enumerates every embedding of `query` in `target`.
#[instrument(skip_all, fields(query_atoms = query.atom_count(), target_atoms = target.atom_count()))]
pub fn find_all_monomorphisms<A1, B1, A2, B2>(
    target: &Mol<A1, B1>,
    query: &Mol<A2, B2>,
    atom_match: impl Fn(&A1, &A2) -> bool,
    bond_match: impl Fn(&B1, &B2) -> bool,
    step_limit: u64,
) -> Result<Vec<AtomMapping>, SearchError> {
    let mut vf2 = Vf2::new(target, query, atom_match, bond_match, step_limit);
    let mut results = Vec::new();
    vf2.recurse(0, &mut results, false)?;
    trace!(steps = vf2.steps, matches = results.len(), "monomorphism enumeration done");
    Ok(results)
}

struct Vf2<'a, A1, B1, A2, B2, FA, FB> {
    target: &'a Mol<A1, B1>,
    query: &'a Mol<A2, B2>,
    atom_match: FA,
    bond_match: FB,
    query_order: Vec<NodeIndex>,
    query_map: Vec<Option<NodeIndex>>,
    target_used: Vec<bool>,
    steps: u64,
    step_limit: u64,
}

impl<'a, A1, B1, A2, B2, FA, FB> Vf2<'a, A1, B1, A2, B2, FA, FB>
where
    FA: Fn(&A1, &A2) -> bool,
    FB: Fn(&B1, &B2) -> bool,
{
    fn new(
        target: &'a Mol<A1, B1>,
        query: &'a Mol<A2, B2>,
        atom_match: FA,
        bond_match: FB,
        step_limit: u64,
    ) -> Self {
        Self {
            target,
            query,
            atom_match,
            bond_match,
            query_order: connected_order(query),
            query_map: vec![None; query.atom_count()],
            target_used: vec![false; target.atom_count()],
            steps: 0,
            step_limit,
        }
    }

    fn recurse(
        &mut self,
        depth: usize,
        results: &mut Vec<AtomMapping>,
        first_only: bool,
    ) -> Result<(), SearchError> {
        if depth == self.query_order.len() {
            let mapping = self
                .query_map
                .iter()
                .enumerate()
                .filter_map(|(q, t)| t.map(|t| (NodeIndex::new(q), t)))
                .collect();
            results.push(mapping);
            return Ok(());
        }

        let query_node = self.query_order[depth];

        for target_node in self.candidates(query_node) {
            self.steps += 1;
            if self.steps > self.step_limit {
                return Err(SearchError::BudgetExhausted {
                    limit: self.step_limit,
                });
            }

            if !self.is_feasible(query_node, target_node) {
                continue;
            }

            self.query_map[query_node.index()] = Some(target_node);
            self.target_used[target_node.index()] = true;

            self.recurse(depth + 1, results, first_only)?;

            self.query_map[query_node.index()] = None;
            self.target_used[target_node.index()] = false;

            if first_only && !results.is_empty() {
                return Ok(());
            }
        }

        Ok(())
    }

    /// Unused target atoms adjacent to the image of an already mapped query
    /// neighbour, or every unused target atom when there is none.
    fn candidates(&self, query_node: NodeIndex) -> Vec<NodeIndex> {
        let anchor = self
            .query
            .neighbors(query_node)
            .find_map(|q| self.query_map[q.index()]);
        let mut candidates: Vec<NodeIndex> = match anchor {
            Some(image) => self.target.neighbors(image).collect(),
            None => self.target.atoms().collect(),
        };
        candidates.retain(|t| !self.target_used[t.index()]);
        candidates.sort();
        candidates.dedup();
        candidates
    }

    fn is_feasible(&self, query_node: NodeIndex, target_node: NodeIndex) -> bool {
        if self.target.degree(target_node) < self.query.degree(query_node) {
            return false;
        }
        if !(self.atom_match)(self.target.atom(target_node), self.query.atom(query_node)) {
            return false;
        }

        for q_bond in self.query.bonds_of(query_node) {
            let Some((a, b)) = self.query.bond_endpoints(q_bond) else {
                continue;
            };
            let q_neighbor = if a == query_node { b } else { a };
            let Some(t_mapped) = self.query_map[q_neighbor.index()] else {
                continue;
            };
            match self.target.bond_between(target_node, t_mapped) {
                Some(t_bond) => {
                    if !(self.bond_match)(self.target.bond(t_bond), self.query.bond(q_bond)) {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}

/// Breadth-first order over each connected component, starting from its
/// highest-degree atom, so every atom after the first of a component has a
/// mapped neighbour when it is reached.
fn connected_order<A, B>(mol: &Mol<A, B>) -> Vec<NodeIndex> {
    let mut roots: Vec<NodeIndex> = mol.atoms().collect();
    roots.sort_by(|&a, &b| mol.degree(b).cmp(&mol.degree(a)).then(a.cmp(&b)));

    let mut seen = vec![false; mol.atom_count()];
    let mut order = Vec::with_capacity(mol.atom_count());
    for root in roots {
        if seen[root.index()] {
            continue;
        }
        seen[root.index()] = true;
        let start = order.len();
        order.push(root);
        let mut head = start;
        while head < order.len() {
            let node = order[head];
            head += 1;
            let mut next: Vec<NodeIndex> = mol
                .neighbors(node)
                .filter(|n| !seen[n.index()])
                .collect();
            next.sort();
            next.dedup();
            for n in next {
                seen[n.index()] = true;
                order.push(n);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::smiles::parse_smiles;

    fn species(t: &Atom, q: &Atom) -> bool {
        t.same_species(q)
    }

    fn same_order(t: &Bond, q: &Bond) -> bool {
        t.order == q.order
    }

    fn first(target: &str, query: &str) -> Option<AtomMapping> {
        let t = parse_smiles(target).unwrap();
        let q = parse_smiles(query).unwrap();
        find_monomorphism(&t, &q, species, same_order, u64::MAX).unwrap()
    }

    fn count(target: &str, query: &str) -> usize {
        let t = parse_smiles(target).unwrap();
        let q = parse_smiles(query).unwrap();
        find_all_monomorphisms(&t, &q, species, same_order, u64::MAX)
            .unwrap()
            .len()
    }

    #[test]
    fn identical_molecules_match() {
        let mapping = first("CCO", "CCO").unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping[2], (NodeIndex::new(2), NodeIndex::new(2)));
    }

    #[test]
    fn mapping_is_ordered_by_query_index() {
        let mapping = first("OCC", "CCO").unwrap();
        let queries: Vec<usize> = mapping.iter().map(|(q, _)| q.index()).collect();
        assert_eq!(queries, vec![0, 1, 2]);
        assert_eq!(mapping[0].1, NodeIndex::new(2));
        assert_eq!(mapping[2].1, NodeIndex::new(0));
    }

    #[test]
    fn species_mismatch_fails() {
        // hydrogen counts differ: CH3 vs CH2
        assert!(first("CCC", "CC").is_none());
        assert!(first("CO", "CN").is_none());
    }

    #[test]
    fn bond_order_mismatch_fails() {
        assert!(first("C=CC", "CCC").is_none());
    }

    #[test]
    fn extra_target_atoms_are_allowed() {
        let t = crate::hydrogen::add_hs(&crate::smiles::parse_mapped("CO").unwrap()).mol;
        let q = crate::hydrogen::add_hs(&crate::smiles::parse_mapped("CO").unwrap()).mol;
        let heavy_only = parse_smiles("[C][O]").unwrap();
        let found = find_monomorphism(&t, &heavy_only, species, same_order, u64::MAX).unwrap();
        assert!(found.is_some());
        assert!(find_monomorphism(&t, &q, species, same_order, u64::MAX)
            .unwrap()
            .is_some());
    }

    #[test]
    fn extra_target_bonds_are_allowed() {
        // a path embeds into a ring of the same atoms
        assert_eq!(count("[CH2]1[CH2][CH2]1", "[CH2][CH2][CH2]"), 6);
    }

    #[test]
    fn benzene_self_matches() {
        assert_eq!(count("c1ccccc1", "c1ccccc1"), 12);
    }

    #[test]
    fn disconnected_query() {
        assert_eq!(count("O.O", "O.O"), 2);
        assert_eq!(count("O", "O.O"), 0);
    }

    #[test]
    fn budget_is_enforced() {
        let t = parse_smiles("C1CCCCCCCCCCC1").unwrap();
        let result = find_all_monomorphisms(&t, &t, species, same_order, 10);
        assert_eq!(result, Err(SearchError::BudgetExhausted { limit: 10 }));
    }

    #[test]
    fn empty_query_has_one_empty_match() {
        let t = parse_smiles("C").unwrap();
        let q: Mol<Atom, Bond> = Mol::new();
        let found = find_monomorphism(&t, &q, species, same_order, 10).unwrap();
        assert_eq!(found, Some(Vec::new()));
    }
}
